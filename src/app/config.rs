use serde::{Deserialize, Serialize};
use size_format::SizeTiers;
use wasm_bindgen::JsValue;

use crate::app::error::AppError;
use crate::app::types::ReloadPolicy;

/// Page configuration handed to the exported entry points. Every key is
/// optional on the JS side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Prefix joined in front of every endpoint path, empty for same-origin.
    pub base_url: String,
    pub size_endpoint: String,
    pub size_id_prefix: String,
    pub provider_type_attr: String,
    pub provider_name_attr: String,
    pub size_tiers: SizeTiers,
    pub settings: Vec<SettingBinding>,
    pub player: PlayerConfig,
    pub request_timeout_ms: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            size_endpoint: "/size".to_string(),
            size_id_prefix: "size".to_string(),
            provider_type_attr: "provider-type".to_string(),
            provider_name_attr: "provider-name".to_string(),
            size_tiers: SizeTiers::default(),
            settings: default_bindings(),
            player: PlayerConfig::default(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingBinding {
    pub selector: String,
    pub endpoint: String,
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub reload: ReloadPolicy,
    #[serde(default)]
    pub optional: bool,
}

impl SettingBinding {
    pub fn new(selector: &str, endpoint: &str, reload: ReloadPolicy) -> Self {
        Self {
            selector: selector.to_string(),
            endpoint: endpoint.to_string(),
            field: default_field(),
            reload,
            optional: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    pub video_id: String,
    pub ready_event: String,
    /// `data-*` key holding the source URL.
    pub source_key: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_id: "video".to_string(),
            ready_event: "shaka-ui-loaded".to_string(),
            source_key: "src".to_string(),
        }
    }
}

fn default_field() -> String {
    "value".to_string()
}

fn default_bindings() -> Vec<SettingBinding> {
    vec![
        SettingBinding::new("#public-network", "/settings/public-network", ReloadPolicy::Reload),
        SettingBinding::new("#host", "/settings/host-set", ReloadPolicy::None),
        SettingBinding {
            optional: true,
            ..SettingBinding::new("#theme-toggle", "/settings/theme-toggle", ReloadPolicy::Reload)
        },
    ]
}

impl AppConfig {
    pub fn from_js(value: JsValue) -> Result<Self, AppError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.size_id_prefix.is_empty() {
            return Err(AppError::Config("sizeIdPrefix must not be empty".into()));
        }
        if let Some(binding) = self.settings.iter().find(|b| b.selector.is_empty() || b.endpoint.is_empty()) {
            return Err(AppError::Config(format!(
                "setting binding needs a selector and an endpoint: {:?}",
                binding
            )));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(AppError::Config("requestTimeoutMs must be positive".into()));
        }
        Ok(())
    }

    pub fn size_selector(&self) -> String {
        format!("[id^=\"{}\"]", self.size_id_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_markup() {
        let config = AppConfig::default();
        assert_eq!(config.size_endpoint, "/size");
        assert_eq!(config.size_selector(), "[id^=\"size\"]");
        assert_eq!(config.size_tiers, SizeTiers::Decimal);
        assert_eq!(config.request_timeout_ms, None);

        let public = &config.settings[0];
        assert_eq!(public.selector, "#public-network");
        assert_eq!(public.endpoint, "/settings/public-network");
        assert_eq!(public.field, "value");
        assert_eq!(public.reload, ReloadPolicy::Reload);
        assert!(!public.optional);

        let host = &config.settings[1];
        assert_eq!(host.endpoint, "/settings/host-set");
        assert_eq!(host.reload, ReloadPolicy::None);

        assert!(config.settings[2].optional);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"baseUrl": "http://localhost:12345", "sizeTiers": "legacy", "requestTimeoutMs": 5000}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:12345");
        assert_eq!(config.size_tiers, SizeTiers::Legacy);
        assert_eq!(config.request_timeout_ms, Some(5000));
        assert_eq!(config.settings, default_bindings());
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_binding_defaults_field_and_policy() {
        let config: AppConfig = serde_json::from_str(
            r##"{"settings": [{"selector": "#host", "endpoint": "/settings/host-set"}]}"##,
        )
        .unwrap();
        assert_eq!(config.settings.len(), 1);
        assert_eq!(config.settings[0].field, "value");
        assert_eq!(config.settings[0].reload, ReloadPolicy::None);
        assert!(!config.settings[0].optional);
    }

    #[test]
    fn test_host_binding_can_post_host_field() {
        let config: AppConfig = serde_json::from_str(
            r##"{"settings": [{"selector": "#host", "endpoint": "/settings/host-set", "field": "host"}]}"##,
        )
        .unwrap();
        assert_eq!(config.settings[0].field, "host");
    }

    #[test]
    fn test_validate_rejects_empty_binding() {
        let config = AppConfig {
            settings: vec![SettingBinding::new("", "/settings/host-set", ReloadPolicy::None)],
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AppConfig { request_timeout_ms: Some(0), ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
