use wasm_bindgen::prelude::*;

pub mod app;

pub use app::config::{AppConfig, PlayerConfig, SettingBinding};
pub use app::error::AppError;
pub use app::types::{ProviderRef, ReloadPolicy, SettingValue, VolumeData};
pub use size_format::{format_bytes, format_size, SizeError, SizeTiers};

/// Account list page: fills every `[id^=size]` element with used/total space.
#[wasm_bindgen(js_name = accountListMain)]
pub fn account_list_main(config: JsValue) -> Result<(), JsValue> {
    app::start_account_list(AppConfig::from_js(config)?)?;
    Ok(())
}

/// Settings page: posts control changes back to the server.
#[wasm_bindgen(js_name = settingsMain)]
pub fn settings_main(config: JsValue) -> Result<(), JsValue> {
    app::start_settings(AppConfig::from_js(config)?)?;
    Ok(())
}

/// DASH player page.
#[wasm_bindgen(js_name = dashMain)]
pub fn dash_main(config: JsValue) -> Result<(), JsValue> {
    app::start_dash(AppConfig::from_js(config)?)?;
    Ok(())
}

/// `sizeToString` for pages that still format sizes from script.
#[wasm_bindgen(js_name = sizeToString)]
pub fn size_to_string(bytes: f64, legacy: Option<bool>) -> Result<String, JsValue> {
    let tiers = if legacy.unwrap_or(false) { SizeTiers::Legacy } else { SizeTiers::Decimal };
    Ok(format_size(bytes, tiers).map_err(AppError::from)?)
}
