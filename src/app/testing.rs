use std::cell::RefCell;

use async_trait::async_trait;

use crate::app::api::Remote;
use crate::app::error::AppError;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Get { path: String, query: Vec<(String, String)> },
    Post { path: String, fields: Vec<(String, String)> },
}

#[derive(Default)]
pub struct MockRemote {
    calls: RefCell<Vec<Call>>,
    body: Option<String>,
    fail: bool,
}

impl MockRemote {
    pub fn with_body(body: &str) -> Self {
        Self { body: Some(body.to_string()), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[async_trait(?Send)]
impl Remote for MockRemote {
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, AppError> {
        self.calls.borrow_mut().push(Call::Get { path: path.to_string(), query: owned(query) });
        if self.fail {
            return Err(AppError::Network("connection refused".into()));
        }
        Ok(self.body.clone().unwrap_or_default())
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), AppError> {
        self.calls.borrow_mut().push(Call::Post { path: path.to_string(), fields: owned(fields) });
        if self.fail {
            return Err(AppError::Network("connection refused".into()));
        }
        Ok(())
    }
}
