use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlVideoElement};

use crate::app::config::PlayerConfig;
use crate::app::dom;
use crate::app::error::{js_detail, AppError};

/// Loads the video source once the player UI is attached to the video
/// element. The UI script may have announced itself before the wasm module
/// finished loading, so an already present UI is used straight away.
pub fn init_player(doc: &Document, config: PlayerConfig) -> Result<(), AppError> {
    if player_ui_present(doc, &config) {
        spawn_load(config);
        return Ok(());
    }
    let event = config.ready_event.clone();
    let on_ready = Closure::<dyn FnMut(web_sys::Event)>::once(move |_: web_sys::Event| {
        spawn_load(config);
    });
    doc.add_event_listener_with_callback(&event, on_ready.as_ref().unchecked_ref())
        .map_err(|e| AppError::Config(js_detail(&e)))?;
    on_ready.forget();
    Ok(())
}

fn player_ui_present(doc: &Document, config: &PlayerConfig) -> bool {
    doc.get_element_by_id(&config.video_id)
        .and_then(|video| js_sys::Reflect::get(&video, &JsValue::from_str("ui")).ok())
        .is_some_and(|ui| !ui.is_undefined() && !ui.is_null())
}

fn spawn_load(config: PlayerConfig) {
    spawn_local(async move {
        match load_video(&config).await {
            Ok(src) => web_sys::console::log_1(&format!("[Player] loaded {}", src).into()),
            Err(e) => web_sys::console::error_1(&format!("[Player] {}", e).into()),
        }
    });
}

async fn load_video(config: &PlayerConfig) -> Result<String, AppError> {
    let doc = dom::document()?;
    let selector = format!("#{}", config.video_id);
    let video = dom::query_required(&doc, &selector)?
        .dyn_into::<HtmlVideoElement>()
        .map_err(|_| AppError::ElementNotFound(format!("{} (video)", selector)))?;
    let src = video
        .dataset()
        .get(&config.source_key)
        .or_else(|| video.get_attribute("src"))
        .ok_or_else(|| AppError::Player(format!("no data-{} on the video element", config.source_key)))?;

    let ui = property(&video, "ui")?;
    let controls = present(call_method(&ui, "getControls", &[])?, "getControls()")?;
    let player = present(call_method(&controls, "getPlayer", &[])?, "getPlayer()")?;
    let pending = call_method(&player, "load", &[JsValue::from_str(&src)])?;
    if let Ok(promise) = pending.dyn_into::<js_sys::Promise>() {
        JsFuture::from(promise)
            .await
            .map_err(|e| AppError::Player(format!("load {}: {}", src, js_detail(&e))))?;
    }
    Ok(src)
}

fn property(target: &JsValue, name: &str) -> Result<JsValue, AppError> {
    let value = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| AppError::Player(js_detail(&e)))?;
    present(value, name)
}

fn present(value: JsValue, what: &str) -> Result<JsValue, AppError> {
    if value.is_undefined() || value.is_null() {
        return Err(AppError::Player(format!("missing `{}`", what)));
    }
    Ok(value)
}

fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, AppError> {
    let method: js_sys::Function = property(target, name)?
        .dyn_into()
        .map_err(|_| AppError::Player(format!("`{}` is not a function", name)))?;
    let args: js_sys::Array = args.iter().collect();
    method
        .apply(target, &args)
        .map_err(|e| AppError::Player(format!("{}(): {}", name, js_detail(&e))))
}
