use std::rc::Rc;

use leptos::task::Executor;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod api;
pub mod config;
pub mod dash;
pub mod dom;
pub mod error;
pub mod settings;
pub mod size_display;
pub mod types;

#[cfg(test)]
mod testing;

use crate::app::api::FetchRemote;
use crate::app::config::AppConfig;
use crate::app::error::AppError;

fn boot() {
    console_error_panic_hook::set_once();
    // a second entry point on the same page finds the executor already set
    let _ = Executor::init_wasm_bindgen();
}

/// Runs `f` now if the page has finished loading, otherwise on `load`.
/// Errors after a deferred start can only be reported to the console.
fn when_ready<F>(label: &'static str, f: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), AppError> + 'static,
{
    let window = web_sys::window().ok_or_else(|| AppError::ElementNotFound("window".into()))?;
    let doc = dom::document()?;
    if doc.ready_state() == "complete" {
        return f();
    }
    let on_load = Closure::<dyn FnMut(web_sys::Event)>::once(move |_ev: web_sys::Event| {
        if let Err(e) = f() {
            web_sys::console::error_1(&format!("[{}] startup failed: {}", label, e).into());
        }
    });
    window
        .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
        .map_err(|e| AppError::Config(error::js_detail(&e)))?;
    on_load.forget();
    Ok(())
}

pub fn start_account_list(config: AppConfig) -> Result<(), AppError> {
    boot();
    when_ready("Size", move || {
        let doc = dom::document()?;
        let remote = Rc::new(FetchRemote::new(&config));
        size_display::init_size_displays(remote, &doc, Rc::new(config))?;
        Ok(())
    })
}

pub fn start_settings(config: AppConfig) -> Result<(), AppError> {
    boot();
    when_ready("Settings", move || {
        let doc = dom::document()?;
        let remote = Rc::new(FetchRemote::new(&config));
        settings::bind_settings(remote, &doc, &config.settings)
    })
}

/// Not deferred to `load`: the player UI may announce itself before then.
pub fn start_dash(config: AppConfig) -> Result<(), AppError> {
    boot();
    let doc = dom::document()?;
    dash::init_player(&doc, config.player)
}
