use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use crate::app::error::{js_detail, AppError};
use crate::app::types::SettingValue;

pub fn document() -> Result<Document, AppError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::ElementNotFound("document".into()))
}

pub fn query_optional(doc: &Document, selector: &str) -> Result<Option<Element>, AppError> {
    doc.query_selector(selector)
        .map_err(|e| AppError::Config(format!("bad selector {}: {}", selector, js_detail(&e))))
}

pub fn query_required(doc: &Document, selector: &str) -> Result<Element, AppError> {
    query_optional(doc, selector)?.ok_or_else(|| AppError::ElementNotFound(selector.to_string()))
}

pub fn query_all(doc: &Document, selector: &str) -> Result<Vec<Element>, AppError> {
    let list = doc
        .query_selector_all(selector)
        .map_err(|e| AppError::Config(format!("bad selector {}: {}", selector, js_detail(&e))))?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// Current value of a form control: checked state for checkboxes and radios,
/// text for everything else.
pub fn read_control(el: &Element) -> Option<SettingValue> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(match input.type_().as_str() {
            "checkbox" | "radio" => SettingValue::Bool(input.checked()),
            _ => SettingValue::Text(input.value()),
        });
    }
    el.dyn_ref::<HtmlSelectElement>()
        .map(|select| SettingValue::Text(select.value()))
}
