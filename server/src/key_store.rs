//! SQLite-backed [`KeyStore`] over the `general` record.

use channel_db::general::GENERAL_VERSION;
use channel_db::{Database, DbError};
use innertube_client::{InnertubeError, KeyStore};

pub struct DbKeyStore {
    db: Database,
}

impl DbKeyStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn store_error(e: DbError) -> InnertubeError {
    tracing::error!("Key store error: {e}");
    InnertubeError::Store(e.to_string())
}

impl KeyStore for DbKeyStore {
    fn load_key(&self) -> Result<Option<String>, InnertubeError> {
        self.db.get_innertube_api_key().map_err(store_error)
    }

    fn save_key(&self, key: &str) -> Result<(), InnertubeError> {
        self.db
            .upsert_innertube_api_key(GENERAL_VERSION, key)
            .map_err(store_error)
    }
}
