use serde::{Deserialize, Serialize};

/// Body returned by the size endpoint. Providers that cannot report a quota
/// omit `space_total`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeData {
    pub space_used: f64,
    #[serde(default)]
    pub space_total: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderRef {
    pub account_type: String,
    pub account_username: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn to_form_value(&self) -> String {
        match self {
            SettingValue::Bool(checked) => checked.to_string(),
            SettingValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadPolicy {
    #[default]
    None,
    Reload,
}

/// What the page should do once a setting update went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterChange {
    Stay,
    Reload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_data_requires_space_used() {
        assert!(serde_json::from_str::<VolumeData>(r#"{"space_total": 10}"#).is_err());
        assert!(serde_json::from_str::<VolumeData>(r#"{"space_used": "10"}"#).is_err());
    }

    #[test]
    fn test_volume_data_total_is_optional() {
        let data: VolumeData = serde_json::from_str(r#"{"space_used": 500}"#).unwrap();
        assert_eq!(data, VolumeData { space_used: 500.0, space_total: None });

        let data: VolumeData =
            serde_json::from_str(r#"{"space_used": 1, "space_total": null}"#).unwrap();
        assert_eq!(data.space_total, None);
    }

    #[test]
    fn test_setting_value_form_encoding() {
        assert_eq!(SettingValue::Bool(true).to_form_value(), "true");
        assert_eq!(SettingValue::Bool(false).to_form_value(), "false");
        assert_eq!(SettingValue::Text("192.168.1.4".into()).to_form_value(), "192.168.1.4");
    }
}
