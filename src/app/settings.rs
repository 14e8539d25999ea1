use std::rc::Rc;

use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::app::api::Remote;
use crate::app::config::SettingBinding;
use crate::app::dom;
use crate::app::error::{js_detail, AppError};
use crate::app::types::{AfterChange, ReloadPolicy, SettingValue};

/// Sends one setting update and reports what the page should do next.
pub async fn apply_change<R: Remote + ?Sized>(
    remote: &R,
    binding: &SettingBinding,
    value: &SettingValue,
) -> Result<AfterChange, AppError> {
    let value = value.to_form_value();
    remote
        .post_form(&binding.endpoint, &[(binding.field.as_str(), value.as_str())])
        .await?;
    Ok(match binding.reload {
        ReloadPolicy::Reload => AfterChange::Reload,
        ReloadPolicy::None => AfterChange::Stay,
    })
}

/// Pairs each binding with its element. Missing required controls fail the
/// whole page before any listener is attached; missing optional ones are dropped.
pub fn resolve_bindings(
    doc: &Document,
    bindings: &[SettingBinding],
) -> Result<Vec<(SettingBinding, Element)>, AppError> {
    let mut resolved = Vec::with_capacity(bindings.len());
    for binding in bindings {
        match dom::query_optional(doc, &binding.selector)? {
            Some(el) => resolved.push((binding.clone(), el)),
            None if binding.optional => {
                web_sys::console::log_1(&format!("[Settings] skipping absent {}", binding.selector).into());
            }
            None => return Err(AppError::ElementNotFound(binding.selector.clone())),
        }
    }
    Ok(resolved)
}

pub fn bind_settings<R: Remote + 'static>(
    remote: Rc<R>,
    doc: &Document,
    bindings: &[SettingBinding],
) -> Result<(), AppError> {
    for (binding, el) in resolve_bindings(doc, bindings)? {
        bind_setting(remote.clone(), binding, &el)?;
    }
    Ok(())
}

pub fn bind_setting<R: Remote + 'static>(
    remote: Rc<R>,
    binding: SettingBinding,
    el: &Element,
) -> Result<(), AppError> {
    let binding = Rc::new(binding);
    let on_change = Closure::<dyn FnMut(_)>::new(move |ev: web_sys::Event| {
        let Some(value) = ev
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| dom::read_control(&el))
        else {
            web_sys::console::warn_1(&format!("[Settings] {} is not a form control", binding.selector).into());
            return;
        };
        let remote = remote.clone();
        let binding = binding.clone();
        spawn_local(async move {
            match apply_change(remote.as_ref(), &binding, &value).await {
                Ok(AfterChange::Reload) => reload_page(),
                Ok(AfterChange::Stay) => {
                    web_sys::console::log_1(&format!("[Settings] {} updated", binding.endpoint).into());
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("[Settings] {} failed: {}", binding.endpoint, e).into());
                }
            }
        });
    });
    el.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        .map_err(|e| AppError::Config(js_detail(&e)))?;
    on_change.forget();
    Ok(())
}

fn reload_page() {
    if let Some(win) = web_sys::window() {
        if let Err(e) = win.location().reload() {
            web_sys::console::error_1(&format!("[Settings] reload failed: {}", js_detail(&e)).into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{Call, MockRemote};
    use futures::executor::block_on;

    #[test]
    fn test_checkbox_toggle_posts_once() {
        let remote = MockRemote::default();
        let binding = SettingBinding::new("#public-network", "/settings/public-network", ReloadPolicy::Reload);

        let next = block_on(apply_change(&remote, &binding, &SettingValue::Bool(true))).unwrap();

        assert_eq!(next, AfterChange::Reload);
        assert_eq!(
            remote.calls(),
            vec![Call::Post {
                path: "/settings/public-network".into(),
                fields: vec![("value".into(), "true".into())],
            }]
        );
    }

    #[test]
    fn test_unchecked_posts_false() {
        let remote = MockRemote::default();
        let binding = SettingBinding::new("#public-network", "/settings/public-network", ReloadPolicy::Reload);

        block_on(apply_change(&remote, &binding, &SettingValue::Bool(false))).unwrap();

        assert_eq!(remote.calls().len(), 1);
        assert!(matches!(
            &remote.calls()[0],
            Call::Post { fields, .. } if fields == &vec![("value".to_string(), "false".to_string())]
        ));
    }

    #[test]
    fn test_text_setting_without_reload() {
        let remote = MockRemote::default();
        let binding = SettingBinding::new("#host", "/settings/host-set", ReloadPolicy::None);

        let next = block_on(apply_change(&remote, &binding, &SettingValue::Text("10.0.0.2".into()))).unwrap();

        assert_eq!(next, AfterChange::Stay);
        assert_eq!(
            remote.calls(),
            vec![Call::Post {
                path: "/settings/host-set".into(),
                fields: vec![("value".into(), "10.0.0.2".into())],
            }]
        );
    }

    #[test]
    fn test_custom_field_name() {
        let remote = MockRemote::default();
        let binding = SettingBinding {
            field: "host".into(),
            ..SettingBinding::new("#host", "/settings/host-set", ReloadPolicy::None)
        };

        block_on(apply_change(&remote, &binding, &SettingValue::Text(String::new()))).unwrap();

        assert_eq!(
            remote.calls(),
            vec![Call::Post {
                path: "/settings/host-set".into(),
                fields: vec![("host".into(), String::new())],
            }]
        );
    }

    #[test]
    fn test_failed_post_does_not_reload() {
        let remote = MockRemote::failing();
        let binding = SettingBinding::new("#public-network", "/settings/public-network", ReloadPolicy::Reload);

        let result = block_on(apply_change(&remote, &binding, &SettingValue::Bool(true)));

        assert!(matches!(result, Err(AppError::Network(_))));
        assert_eq!(remote.calls().len(), 1);
    }
}
