use crate::storage::{StorageKeys, DEFAULT_KEY_PREFIX};
use log::LevelFilter;
use std::str::FromStr;

/// Runtime configuration supplied by the hosting page through `window.ENV`.
///
/// ```html
/// <script>window.ENV = { STORAGE_PREFIX: "my-notes", SEED_SAMPLE_DATA: false };</script>
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Namespace for the local storage keys.
    pub storage_prefix: String,
    /// Write sample notes and collections on first run.
    pub seed_sample_data: bool,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_KEY_PREFIX.to_string(),
            seed_sample_data: true,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(env) = window_env() {
                return Self::from_lookup(|key| read_env(&env, key));
            }
        }

        Self::default()
    }

    /// Build a config from a key lookup.
    ///
    /// Each key is read upper-case first, then lower-case (`STORAGE_PREFIX`, then
    /// `storage_prefix`). Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str, lower: &str| lookup(upper).or_else(|| lookup(lower));
        let mut config = Self::default();

        if let Some(prefix) = get("STORAGE_PREFIX", "storage_prefix") {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                config.storage_prefix = prefix.to_string();
            }
        }

        if let Some(seed) = get("SEED_SAMPLE_DATA", "seed_sample_data").and_then(|v| parse_flag(&v))
        {
            config.seed_sample_data = seed;
        }

        if let Some(level) =
            get("LOG_LEVEL", "log_level").and_then(|v| LevelFilter::from_str(v.trim()).ok())
        {
            config.log_level = level;
        }

        config
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.storage_prefix)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
fn window_env() -> Option<wasm_bindgen::JsValue> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    Some(env.into())
}

#[cfg(target_arch = "wasm32")]
fn read_env(env: &wasm_bindgen::JsValue, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(env, &key.into()).ok()?;
    value
        .as_string()
        .or_else(|| value.as_bool().map(|b| b.to_string()))
}
