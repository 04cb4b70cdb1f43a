//! People routes — create/list/get/update/delete under `/api/v1/people`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use people_core::Error;
use people_store::{Page, PersonFilter, PersonInput, PersonRecord};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/people", get(list_people).post(create_person))
        .route(
            "/people/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}

// ---------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------

/// Raw list query. Everything arrives as text so that a bad `age` can be
/// reported as a 400 and bad paging values can be coerced.
#[derive(Debug, Default)]
struct ListQuery {
    name: Option<String>,
    surname: Option<String>,
    patronymic: Option<String>,
    age: Option<String>,
    gender: Option<String>,
    nationality: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl ListQuery {
    /// Collect known keys from raw pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "surname" => &mut query.surname,
                "patronymic" => &mut query.patronymic,
                "age" => &mut query.age,
                "gender" => &mut query.gender,
                "nationality" => &mut query.nationality,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    fn filter(&self) -> people_core::Result<PersonFilter> {
        let age = match present(&self.age) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|e| {
                debug!("Invalid age parameter {:?}: {}", raw, e);
                Error::Validation("Invalid age parameter".into())
            })?),
            None => None,
        };
        Ok(PersonFilter {
            name: present(&self.name),
            surname: present(&self.surname),
            patronymic: present(&self.patronymic),
            age,
            gender: present(&self.gender),
            nationality: present(&self.nationality),
        })
    }

    fn page(&self) -> Page {
        Page::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Empty query values mean "no constraint".
fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(String::from)
}

fn parse_id(raw: &str) -> people_core::Result<i64> {
    raw.parse::<i64>().map_err(|e| {
        debug!("Invalid ID parameter {:?}: {}", raw, e);
        Error::Validation("Invalid ID parameter".into())
    })
}

fn parse_body(body: Result<Json<PersonInput>, JsonRejection>) -> people_core::Result<PersonInput> {
    let Json(input) = body.map_err(|e| {
        debug!("Invalid request body: {}", e);
        Error::Validation("Invalid request body".into())
    })?;
    input.validate()?;
    Ok(input)
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /api/v1/people — enrich and store a new person.
async fn create_person(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<PersonRecord>), ApiError> {
    let fail = |e| ApiError::new("Failed to create person", e);
    let input = parse_body(body).map_err(fail)?;
    debug!("Creating person: {:?}", input);

    let ctx = state.request_context();
    let person = state
        .orchestrator
        .create(&ctx, &state.store, input)
        .await
        .map_err(fail)?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/v1/people — filtered, paginated listing.
async fn list_people(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<PersonRecord>>, ApiError> {
    let fail = |e| ApiError::new("Failed to get people", e);
    let Query(pairs) = query.map_err(|e| fail(Error::Validation(e.body_text())))?;
    let query = ListQuery::from_pairs(pairs);
    let filter = query.filter().map_err(fail)?;
    let page = query.page();
    debug!(
        "Getting people with filter: {:?}, page: {}, limit: {}",
        filter, page.number, page.size
    );

    let ctx = state.request_context();
    let people = state
        .store
        .find_all(&ctx, &filter, page.offset(), page.limit())
        .map_err(fail)?;
    Ok(Json(people))
}

/// GET /api/v1/people/{id}
async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PersonRecord>, ApiError> {
    let fail = |e| ApiError::new("Failed to get person", e);
    let id = parse_id(&id).map_err(fail)?;

    let ctx = state.request_context();
    let person = state.store.find_by_id(&ctx, id).map_err(fail)?;
    Ok(Json(person))
}

/// PUT /api/v1/people/{id} — re-enrich from the new name and overwrite.
async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<PersonRecord>, ApiError> {
    let fail = |e| ApiError::new("Failed to update person", e);
    let id = parse_id(&id).map_err(fail)?;
    let input = parse_body(body).map_err(fail)?;
    debug!("Updating person {} with {:?}", id, input);

    let ctx = state.request_context();
    let person = state
        .orchestrator
        .update(&ctx, &state.store, id, input)
        .await
        .map_err(fail)?;
    Ok(Json(person))
}

/// DELETE /api/v1/people/{id}
async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let fail = |e| ApiError::new("Failed to delete person", e);
    let id = parse_id(&id).map_err(fail)?;

    let ctx = state.request_context();
    state.store.delete(&ctx, id).map_err(fail)?;
    debug!("Deleted person {}", id);
    Ok(StatusCode::NO_CONTENT)
}
