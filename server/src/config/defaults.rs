//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

use channel_db::Database;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
}

const DEFS: &[SettingDef] = &[
    SettingDef {
        key: "SERVER_PORT",
        default: "8080",
    },
    SettingDef {
        key: "INNERTUBE_KEY_PAGE_URL",
        default: innertube_client::api::DEFAULT_KEY_PAGE_URL,
    },
    SettingDef {
        key: "INNERTUBE_BROWSE_URL",
        default: innertube_client::api::DEFAULT_BROWSE_URL,
    },
    SettingDef {
        key: "UPSTREAM_TIMEOUT_SECS",
        default: "30",
    },
    SettingDef {
        key: "CHANNEL_CACHE_TTL_SECS",
        default: "1200",
    },
    SettingDef {
        key: "CHANNEL_CACHE_MAX_ENTRIES",
        default: "200",
    },
];

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, &'static SettingDef>> =
    LazyLock::new(|| DEFS.iter().map(|def| (def.key, def)).collect());

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Write every missing setting with its default so the table lists all
/// tunables. Existing rows are never overwritten.
pub fn initialize_defaults(db: &Database) -> Result<(), anyhow::Error> {
    for def in DEFS {
        if db.get_setting(def.key)?.is_some() {
            continue;
        }
        db.set_setting(def.key, def.default)?;
        tracing::debug!(key = def.key, "Seeded default setting");
    }
    Ok(())
}
