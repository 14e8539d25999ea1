use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use crate::app::config::AppConfig;
use crate::app::error::{js_detail, AppError};

/// The HTTP calls the page scripts make against the account manager.
#[async_trait(?Send)]
pub trait Remote {
    /// GET `path` with the given query pairs and return the body text.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, AppError>;

    /// POST the fields as `application/x-www-form-urlencoded`; the response
    /// body is ignored.
    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), AppError>;
}

/// `Remote` backed by `window.fetch`.
pub struct FetchRemote {
    base_url: String,
    timeout_ms: Option<u32>,
}

impl FetchRemote {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    fn url(&self, path: &str, pairs: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&encode_pairs(pairs));
        }
        url
    }

    async fn fetch(&self, url: &str, init: RequestInit) -> Result<String, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::Network("no window".into()))?;

        let timer = match self.timeout_ms {
            Some(ms) => Some(Timeout::arm(&window, &init, ms)?),
            None => None,
        };

        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| AppError::Network(format!("{}: {}", url, js_detail(&e))))?;

        let result = send(&window, &request, url).await;

        match timer {
            Some(timer) => timer.finish(result),
            None => result,
        }
    }
}

async fn send(window: &web_sys::Window, request: &Request, url: &str) -> Result<String, AppError> {
    let failed = |e: JsValue| AppError::Network(format!("{}: {}", url, js_detail(&e)));
    let value = JsFuture::from(window.fetch_with_request(request)).await.map_err(failed)?;
    let response: Response = value
        .dyn_into()
        .map_err(|_| AppError::Network(format!("{}: not a Response", url)))?;
    if !response.ok() {
        return Err(AppError::Status { url: url.to_string(), status: response.status() });
    }
    let text = JsFuture::from(response.text().map_err(failed)?).await.map_err(failed)?;
    Ok(text.as_string().unwrap_or_default())
}

#[async_trait(?Send)]
impl Remote for FetchRemote {
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, AppError> {
        let init = RequestInit::new();
        init.set_method("GET");
        self.fetch(&self.url(path, query), init).await
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), AppError> {
        let headers = Headers::new().map_err(|e| AppError::Network(js_detail(&e)))?;
        headers
            .set("Content-Type", "application/x-www-form-urlencoded")
            .map_err(|e| AppError::Network(js_detail(&e)))?;
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&encode_pairs(fields)));
        self.fetch(&self.url(path, &[]), init).await.map(|_| ())
    }
}

/// Aborts the request through an `AbortController` once `ms` elapse. The
/// timer is cleared and its callback freed when this is dropped.
struct Timeout {
    ms: u32,
    handle: i32,
    fired: Rc<Cell<bool>>,
    _on_timeout: Closure<dyn FnMut()>,
}

impl Timeout {
    fn arm(window: &web_sys::Window, init: &RequestInit, ms: u32) -> Result<Self, AppError> {
        let controller = AbortController::new().map_err(|e| AppError::Network(js_detail(&e)))?;
        init.set_signal(Some(&controller.signal()));
        let fired = Rc::new(Cell::new(false));
        let fired2 = fired.clone();
        let cb = Closure::wrap(Box::new(move || {
            fired2.set(true);
            controller.abort();
        }) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms as i32)
            .map_err(|e| AppError::Network(js_detail(&e)))?;
        Ok(Self { ms, handle, fired, _on_timeout: cb })
    }

    fn finish<T>(self, result: Result<T, AppError>) -> Result<T, AppError> {
        match result {
            Err(_) if self.fired.get() => Err(AppError::Timeout(self.ms)),
            other => other,
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        // the callback must not fire after its closure is freed
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                String::from(js_sys::encode_uri_component(key)),
                String::from(js_sys::encode_uri_component(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
