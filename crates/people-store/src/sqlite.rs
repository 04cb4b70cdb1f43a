//! SQLite-backed person record store.
//!
//! Filter values, ids, and page bounds are always bound as positional
//! parameters (`?1`, `?2`, ...); only column names from a fixed list are
//! ever spliced into query text.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use people_core::{Error, RequestContext, Result};

const SELECT_COLUMNS: &str =
    "SELECT id, name, surname, patronymic, age, gender, nationality FROM people";

/// SQLite store for person records. Safe to share across concurrent
/// requests; statements are serialized on a single connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the database file at `db_path`, creating parent
    /// directories as needed.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self::with_connection(conn, Some(db_path.to_path_buf()))?;
        info!(
            "SqliteStore initialized: {} people, path={}",
            store.count(&RequestContext::new())?,
            db_path.display()
        );
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Insert a person. Returns the new id.
    pub fn create(&self, ctx: &RequestContext, person: &NewPerson) -> Result<i64> {
        ctx.ensure_active()?;
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO people (name, surname, patronymic, age, gender, nationality) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                person.name,
                person.surname,
                person.patronymic,
                person.age,
                person.gender,
                person.nationality,
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Inserted person {}", id);
        Ok(id)
    }

    /// List people matching every present filter field, ordered by id.
    pub fn find_all(
        &self,
        ctx: &RequestContext,
        filter: &PersonFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonRecord>> {
        ctx.ensure_active()?;
        let (mut sql, mut args) = filter_clause(filter);
        sql.push_str(&format!(
            " ORDER BY id ASC LIMIT ?{} OFFSET ?{}",
            args.len() + 1,
            args.len() + 2
        ));
        args.push(Value::Integer(to_i64(limit)));
        args.push(Value::Integer(to_i64(offset)));

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), row_to_person)
            .map_err(|e| Error::Database(e.to_string()))?;
        let people = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!("find_all matched {} people", people.len());
        Ok(people)
    }

    /// Get a person by id.
    pub fn find_by_id(&self, ctx: &RequestContext, id: i64) -> Result<PersonRecord> {
        ctx.ensure_active()?;
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], row_to_person)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        row.ok_or_else(|| not_found(id))
    }

    /// Overwrite every mutable column of an existing person.
    pub fn update(&self, ctx: &RequestContext, id: i64, person: &NewPerson) -> Result<()> {
        ctx.ensure_active()?;
        let conn = self.conn.lock();
        let count = conn
            .prepare_cached(
                "UPDATE people SET name = ?1, surname = ?2, patronymic = ?3, age = ?4, \
                 gender = ?5, nationality = ?6 WHERE id = ?7",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![
                person.name,
                person.surname,
                person.patronymic,
                person.age,
                person.gender,
                person.nationality,
                id,
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        if count == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Delete a person by id.
    pub fn delete(&self, ctx: &RequestContext, id: i64) -> Result<()> {
        ctx.ensure_active()?;
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM people WHERE id = ?1", params![id])
            .map_err(|e| Error::Database(e.to_string()))?;
        if count == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Count all stored people.
    pub fn count(&self, ctx: &RequestContext) -> Result<i64> {
        ctx.ensure_active()?;
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }
}

/// Build the `SELECT ... WHERE` prefix for `filter` and its bound values.
fn filter_clause(filter: &PersonFilter) -> (String, Vec<Value>) {
    let text = |v: &Option<String>| v.clone().map(Value::Text);
    let constraints = [
        ("name", text(&filter.name)),
        ("surname", text(&filter.surname)),
        ("patronymic", text(&filter.patronymic)),
        ("age", filter.age.map(Value::Integer)),
        ("gender", text(&filter.gender)),
        ("nationality", text(&filter.nationality)),
    ];

    let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
    let mut args = Vec::new();
    for (column, value) in constraints {
        if let Some(value) = value {
            args.push(value);
            sql.push_str(&format!(" AND {} = ?{}", column, args.len()));
        }
    }
    (sql, args)
}

fn row_to_person(row: &Row<'_>) -> rusqlite::Result<PersonRecord> {
    Ok(PersonRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        patronymic: row.get("patronymic")?,
        age: row.get("age")?,
        gender: row.get("gender")?,
        nationality: row.get("nationality")?,
    })
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("person {}", id))
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
