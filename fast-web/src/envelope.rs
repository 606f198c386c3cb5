//! Response envelope and common wire models
//!
//! Every dispatched request answers with exactly one [`Envelope`]:
//!
//! ```json
//! { "code": 200, "message": "success", "data": { ... } }
//! ```
//!
//! Code 200 means success. Any other code is a failure and carries no `data`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{Validate, ValidationResult, ValidationRules};

/// Envelope code for a successful call.
pub const CODE_SUCCESS: i32 = 200;
/// Envelope code for decode, validation and handler errors.
pub const CODE_FAILURE: i32 = 500;
/// Envelope code for a recovered panic.
pub const CODE_PANIC: i32 = 501;
/// Envelope code when no access token was presented.
pub const CODE_UNAUTHENTICATED: i32 = 401;
/// Envelope code when the access token is unknown or expired.
pub const CODE_TOKEN_EXPIRED: i32 = 402;
/// Envelope code when a rate limiter denies the request.
pub const CODE_BUSY: i32 = 403;

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Business status code, 200 on success.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Payload, only present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Success carrying `data`, using the configured success message.
    ///
    /// A payload that fails to serialize yields a failure envelope instead.
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self::success_no_data(),
            Ok(value) => Self {
                code: CODE_SUCCESS,
                message: crate::config().success_message.clone(),
                data: Some(value),
            },
            Err(e) => Self::error(CODE_FAILURE, e.to_string()),
        }
    }

    /// Success without data.
    pub fn success_no_data() -> Self {
        Self::ok(crate::config().success_message.clone())
    }

    /// Success without data and with a custom message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: message.into(),
            data: None,
        }
    }

    /// Failure with the given code. Failures never carry data.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Whether this envelope reports success.
    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = crate::config().status_policy.status_for(self.code);
        (status, Json(self)).into_response()
    }
}

/// Paging request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageParams {
    /// 1-based page number.
    pub page_num: u32,
    /// Rows per page.
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 10,
        }
    }
}

impl PageParams {
    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_num.max(1) - 1) * u64::from(self.page_size)
    }
}

impl Validate for PageParams {
    fn validate(&self) -> ValidationResult {
        ValidationRules::new()
            .range("pageSize", i64::from(self.page_size), 1, 1000)
            .build()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Total rows across all pages.
    pub total: u64,
    /// Rows on this page.
    pub list: Vec<T>,
}

impl<T> PageResult<T> {
    /// Create a page.
    pub fn new(total: u64, list: Vec<T>) -> Self {
        Self { total, list }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_omits_data() {
        let body = serde_json::to_value(Envelope::error(500, "boom")).unwrap();
        assert_eq!(body, json!({"code": 500, "message": "boom"}));
    }

    #[test]
    fn test_success_carries_data() {
        let envelope = Envelope::success(json!({"id": 7}));
        assert!(envelope.is_success());
        assert_eq!(envelope.message, "success");
        assert_eq!(envelope.data, Some(json!({"id": 7})));
    }

    #[test]
    fn test_success_with_unit_has_no_data() {
        let envelope = Envelope::success(());
        assert_eq!(envelope, Envelope::success_no_data());
    }

    #[test]
    fn test_page_params_offset() {
        let page = PageParams {
            page_num: 3,
            page_size: 20,
        };
        assert_eq!(page.offset(), 40);
        assert_eq!(PageParams { page_num: 0, page_size: 20 }.offset(), 0);
    }

    #[test]
    fn test_page_params_from_camel_case() {
        let page: PageParams = serde_json::from_value(json!({"pageNum": 2})).unwrap();
        assert_eq!(page.page_num, 2);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(PageParams::default().validate().is_valid());
        let page = PageParams {
            page_num: 1,
            page_size: 0,
        };
        assert!(!page.validate().is_valid());
    }
}
