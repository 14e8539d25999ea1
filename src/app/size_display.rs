use std::rc::Rc;

use leptos::task::spawn_local;
use size_format::{format_size, SizeTiers};
use web_sys::{Document, Element};

use crate::app::api::Remote;
use crate::app::config::AppConfig;
use crate::app::dom;
use crate::app::error::AppError;
use crate::app::types::{ProviderRef, VolumeData};

/// `used` or `used / total`.
pub fn render_volume(data: &VolumeData, tiers: SizeTiers) -> Result<String, AppError> {
    let mut text = format_size(data.space_used, tiers)?;
    if let Some(total) = data.space_total {
        text.push_str(" / ");
        text.push_str(&format_size(total, tiers)?);
    }
    Ok(text)
}

pub async fn load_size_text<R: Remote + ?Sized>(
    remote: &R,
    config: &AppConfig,
    provider: &ProviderRef,
) -> Result<String, AppError> {
    let body = remote
        .get_text(
            &config.size_endpoint,
            &[
                ("account_type", provider.account_type.as_str()),
                ("account_username", provider.account_username.as_str()),
            ],
        )
        .await?;
    let data: VolumeData = serde_json::from_str(&body)?;
    render_volume(&data, config.size_tiers)
}

pub fn provider_of(el: &Element, config: &AppConfig) -> Option<ProviderRef> {
    Some(ProviderRef {
        account_type: el.get_attribute(&config.provider_type_attr)?,
        account_username: el.get_attribute(&config.provider_name_attr)?,
    })
}

/// Starts one size lookup per marked element and returns how many were
/// started. Each element is only touched once its own lookup succeeds.
pub fn init_size_displays<R: Remote + 'static>(
    remote: Rc<R>,
    doc: &Document,
    config: Rc<AppConfig>,
) -> Result<usize, AppError> {
    let mut started = 0;
    for el in dom::query_all(doc, &config.size_selector())? {
        let Some(provider) = provider_of(&el, &config) else {
            web_sys::console::warn_1(&format!("[Size] #{} has no provider attributes", el.id()).into());
            continue;
        };
        let remote = remote.clone();
        let config = config.clone();
        spawn_local(async move {
            match load_size_text(remote.as_ref(), &config, &provider).await {
                Ok(text) => el.set_text_content(Some(&text)),
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("[Size] {}/{}: {}", provider.account_type, provider.account_username, e).into(),
                    );
                }
            }
        });
        started += 1;
    }
    web_sys::console::log_1(&format!("[Size] started {} lookups", started).into());
    Ok(started)
}
