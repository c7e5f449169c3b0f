//! Build-time configuration for the API endpoint with an optional runtime
//! override. Native builds read the override from the process environment
//! (`CAMPUSDESK_API_URL`); browser builds read `window.CAMPUSDESK_CONFIG` so
//! static deployments can change endpoints without rebuilding.
//! Configuration values are public; do not store secrets here.

/// Used when neither the build nor the runtime provides a base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";
/// Environment variable read at build time and, on native targets, at runtime.
pub const API_URL_ENV: &str = "CAMPUSDESK_API_URL";
/// Suffix removed from the API base to reach the media files.
const API_SUFFIX: &str = "/api/";

/// Console configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl AppConfig {
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    /// Loads config from build-time environment variables and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = option_env!("CAMPUSDESK_API_URL")
            .and_then(normalize_runtime_value)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let mut config = Self { api_base_url };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Base URL for report files. A trailing `/api/` is stripped so files are
    /// fetched from the sibling media path.
    #[must_use]
    pub fn report_base(&self) -> &str {
        self.api_base_url
            .strip_suffix(API_SUFFIX)
            .unwrap_or(&self.api_base_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    let value = std::env::var(API_URL_ENV).ok()?;
    Some(RuntimeConfig {
        api_base_url: normalize_runtime_value(&value),
    })
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("CAMPUSDESK_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);
    let value = Reflect::get(&object, &JsValue::from_str("api_base_url"))
        .ok()?
        .as_string()?;

    Some(RuntimeConfig {
        api_base_url: normalize_runtime_value(&value),
    })
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
