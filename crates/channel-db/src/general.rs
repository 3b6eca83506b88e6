//! The `general` record: one row per schema version holding the scraped
//! InnerTube API key.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, OptionalExt};

/// Version key of the live record. Only this row is ever read or written.
pub const GENERAL_VERSION: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralRecord {
    pub version: i64,
    pub innertube_api_key: Option<String>,
    pub updated_at: i64,
}

impl Database {
    pub fn get_general(&self, version: i64) -> Result<Option<GeneralRecord>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT version, innertube_api_key, updated_at FROM general WHERE version = ?1",
            )?;
            let record = stmt
                .query_row([version], |row| {
                    Ok(GeneralRecord {
                        version: row.get(0)?,
                        innertube_api_key: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(record)
        })
    }

    /// Insert or overwrite the key for `version`. Last write wins.
    pub fn upsert_innertube_api_key(&self, version: i64, api_key: &str) -> Result<(), DbError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO general (version, innertube_api_key, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(version) DO UPDATE SET
                    innertube_api_key = excluded.innertube_api_key,
                    updated_at = excluded.updated_at",
                rusqlite::params![version, api_key, now],
            )?;
            Ok(())
        })
    }

    /// Convenience accessor for the live key; `None` when the row is missing
    /// or holds an empty/NULL key.
    pub fn get_innertube_api_key(&self) -> Result<Option<String>, DbError> {
        let record = self.get_general(GENERAL_VERSION)?;
        Ok(record
            .and_then(|r| r.innertube_api_key)
            .filter(|key| !key.is_empty()))
    }
}
