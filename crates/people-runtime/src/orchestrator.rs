//! Orchestrator — sequences the three prediction calls and persists the
//! merged record.

use people_core::config::PredictorUrls;
use people_core::{RequestContext, Result};
use people_predict::{AgeClient, GenderClient, NationalityClient, Predictor};
use people_store::{PersonInput, PersonRecord, SqliteStore};
use tracing::{debug, error, info};

use crate::types::Enrichment;

/// Orchestrator wired to the real HTTP prediction endpoints.
pub type HttpOrchestrator = Orchestrator<AgeClient, GenderClient, NationalityClient>;

/// Enriches person input from the given name and writes the result.
///
/// Calls are strictly sequential (age, gender, nationality) and the first
/// failure voids the whole operation: nothing reaches the store unless all
/// three guesses came back.
pub struct Orchestrator<A, G, N> {
    age: A,
    gender: G,
    nationality: N,
}

impl HttpOrchestrator {
    /// Build the three HTTP clients over one shared connection pool.
    pub fn from_urls(http: reqwest::Client, urls: &PredictorUrls) -> Self {
        info!(
            "Orchestrator initialized: agify={}, genderize={}, nationalize={}",
            urls.agify, urls.genderize, urls.nationalize
        );
        Self::new(
            AgeClient::new(http.clone(), urls.agify.clone()),
            GenderClient::new(http.clone(), urls.genderize.clone()),
            NationalityClient::new(http, urls.nationalize.clone()),
        )
    }
}

impl<A, G, N> Orchestrator<A, G, N>
where
    A: Predictor<Output = u32>,
    G: Predictor<Output = String>,
    N: Predictor<Output = String>,
{
    pub fn new(age: A, gender: G, nationality: N) -> Self {
        Self {
            age,
            gender,
            nationality,
        }
    }

    /// Run age → gender → nationality for `name`.
    pub async fn enrich(&self, ctx: &RequestContext, name: &str) -> Result<Enrichment> {
        let age = self.age.predict(ctx, name).await.map_err(|e| {
            error!("Failed to get age: {}", e);
            e
        })?;
        let gender = self.gender.predict(ctx, name).await.map_err(|e| {
            error!("Failed to get gender: {}", e);
            e
        })?;
        let nationality = self.nationality.predict(ctx, name).await.map_err(|e| {
            error!("Failed to get nationality: {}", e);
            e
        })?;

        debug!(
            "Enriched {}: age={}, gender={:?}, nationality={:?}",
            name, age, gender, nationality
        );
        Ok(Enrichment {
            age,
            gender,
            nationality,
        })
    }

    /// Enrich and insert a new person. Returns the stored record.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        store: &SqliteStore,
        input: PersonInput,
    ) -> Result<PersonRecord> {
        let enrichment = self.enrich(ctx, &input.name).await?;
        let person = enrichment.merge(input);
        let id = store.create(ctx, &person)?;
        info!("Created person {} ({} {})", id, person.name, person.surname);
        Ok(PersonRecord::from_parts(id, person))
    }

    /// Re-enrich from the new name and overwrite an existing person.
    ///
    /// Fails with `NotFound` before any prediction call when `id` is absent.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        store: &SqliteStore,
        id: i64,
        input: PersonInput,
    ) -> Result<PersonRecord> {
        store.find_by_id(ctx, id)?;

        let enrichment = self.enrich(ctx, &input.name).await?;
        let person = enrichment.merge(input);
        store.update(ctx, id, &person)?;
        info!("Updated person {} ({} {})", id, person.name, person.surname);
        Ok(PersonRecord::from_parts(id, person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use people_core::Error;
    use tempfile::TempDir;

    type CallLog = Arc<Mutex<Vec<(&'static str, String)>>>;

    /// Predictor returning a fixed value, or failing when `value` is `None`.
    struct Stub<T> {
        label: &'static str,
        value: Option<T>,
        calls: CallLog,
    }

    impl<T: Clone + Send + Sync> Predictor for Stub<T> {
        type Output = T;

        async fn predict(&self, _ctx: &RequestContext, name: &str) -> Result<T> {
            self.calls.lock().unwrap().push((self.label, name.to_string()));
            self.value
                .clone()
                .ok_or_else(|| Error::PredictionUnavailable(format!("{} is down", self.label)))
        }
    }

    type StubOrchestrator = Orchestrator<Stub<u32>, Stub<String>, Stub<String>>;

    fn orchestrator(
        age: Option<u32>,
        gender: Option<&str>,
        nationality: Option<&str>,
    ) -> (StubOrchestrator, CallLog) {
        let calls = CallLog::default();
        let orch = Orchestrator::new(
            Stub {
                label: "age",
                value: age,
                calls: calls.clone(),
            },
            Stub {
                label: "gender",
                value: gender.map(String::from),
                calls: calls.clone(),
            },
            Stub {
                label: "nationality",
                value: nationality.map(String::from),
                calls: calls.clone(),
            },
        );
        (orch, calls)
    }

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("people.db")).unwrap();
        (store, dir)
    }

    fn input(name: &str, surname: &str) -> PersonInput {
        PersonInput {
            name: name.into(),
            surname: surname.into(),
            patronymic: None,
        }
    }

    #[tokio::test]
    async fn test_create_merges_predictions() {
        let (store, _dir) = test_store();
        let (orch, calls) = orchestrator(Some(34), Some("male"), Some("RU"));
        let ctx = RequestContext::new();

        let record = orch
            .create(&ctx, &store, input("Dmitriy", "Ushakov"))
            .await
            .unwrap();

        assert_eq!(
            record,
            PersonRecord {
                id: 1,
                name: "Dmitriy".into(),
                surname: "Ushakov".into(),
                patronymic: None,
                age: 34,
                gender: "male".into(),
                nationality: "RU".into(),
            }
        );
        assert_eq!(store.find_by_id(&ctx, record.id).unwrap(), record);

        let calls = calls.lock().unwrap();
        let order: Vec<&str> = calls.iter().map(|(label, _)| *label).collect();
        assert_eq!(order, ["age", "gender", "nationality"]);
        assert!(calls.iter().all(|(_, name)| name == "Dmitriy"));
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let (store, _dir) = test_store();
        let (orch, _) = orchestrator(Some(30), Some("female"), Some("UA"));
        let ctx = RequestContext::new();

        let mut ids = Vec::new();
        for name in ["Anna", "Olga", "Irina"] {
            ids.push(orch.create(&ctx, &store, input(name, "K")).await.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_create_failure_persists_nothing() {
        let (store, _dir) = test_store();
        let (orch, calls) = orchestrator(Some(34), None, Some("RU"));
        let ctx = RequestContext::new();

        let result = orch.create(&ctx, &store, input("Dmitriy", "Ushakov")).await;
        assert!(matches!(result, Err(Error::PredictionUnavailable(_))));
        assert_eq!(store.count(&ctx).unwrap(), 0);

        // Nationality is never asked once gender failed.
        let order: Vec<&str> = calls.lock().unwrap().iter().map(|(l, _)| *l).collect();
        assert_eq!(order, ["age", "gender"]);
    }

    #[tokio::test]
    async fn test_each_failure_aborts_create() {
        let cases = [
            (None, Some("male"), Some("RU")),
            (Some(34), None, Some("RU")),
            (Some(34), Some("male"), None),
        ];
        for (age, gender, nationality) in cases {
            let (store, _dir) = test_store();
            let (orch, _) = orchestrator(age, gender, nationality);
            let ctx = RequestContext::new();
            assert!(orch.create(&ctx, &store, input("Dmitriy", "Ushakov")).await.is_err());
            assert_eq!(store.count(&ctx).unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_update_uses_new_name() {
        let (store, _dir) = test_store();
        let (orch, calls) = orchestrator(Some(41), Some("female"), Some("KZ"));
        let ctx = RequestContext::new();

        let created = orch.create(&ctx, &store, input("Ivan", "Petrov")).await.unwrap();
        calls.lock().unwrap().clear();

        let replacement = PersonInput {
            name: "Aigerim".into(),
            surname: "Petrova".into(),
            patronymic: Some("Ivanovna".into()),
        };
        let updated = orch
            .update(&ctx, &store, created.id, replacement)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Aigerim");
        assert_eq!(updated.patronymic.as_deref(), Some("Ivanovna"));
        assert_eq!(updated.age, 41);
        assert_eq!(store.find_by_id(&ctx, created.id).unwrap(), updated);
        assert!(calls.lock().unwrap().iter().all(|(_, name)| name == "Aigerim"));
    }

    #[tokio::test]
    async fn test_update_missing_skips_predictions() {
        let (store, _dir) = test_store();
        let (orch, calls) = orchestrator(Some(34), Some("male"), Some("RU"));
        let ctx = RequestContext::new();

        let result = orch.update(&ctx, &store, 999, input("Ivan", "Petrov")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_leaves_record_unchanged() {
        let (store, _dir) = test_store();
        let ctx = RequestContext::new();

        let (good, _) = orchestrator(Some(34), Some("male"), Some("RU"));
        let created = good.create(&ctx, &store, input("Ivan", "Petrov")).await.unwrap();

        let (bad, _) = orchestrator(Some(50), Some("male"), None);
        let result = bad.update(&ctx, &store, created.id, input("Boris", "Petrov")).await;
        assert!(matches!(result, Err(Error::PredictionUnavailable(_))));
        assert_eq!(store.find_by_id(&ctx, created.id).unwrap(), created);
    }

    #[tokio::test]
    async fn test_enrich() {
        let (orch, _) = orchestrator(Some(0), Some(""), Some(""));
        let enrichment = orch.enrich(&RequestContext::new(), "Zzzx").await.unwrap();
        assert_eq!(
            enrichment,
            Enrichment {
                age: 0,
                gender: String::new(),
                nationality: String::new(),
            }
        );
    }
}
