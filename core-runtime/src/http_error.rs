//! Uniform failure messages for non-2xx HTTP responses.
//!
//! Google's OAuth and Drive endpoints answer errors in several shapes: the
//! `{"error": {"message": ...}}` envelope, the bare OAuth
//! `{"error": "invalid_grant"}` form, HTML from proxies, or nothing at all.
//! Every network operation in the core funnels its failures through
//! [`describe_failure`] so callers see one consistent message format:
//!
//! | Body                                  | Message                 |
//! |---------------------------------------|-------------------------|
//! | unreadable (not UTF-8)                | `prefix`                |
//! | empty                                 | `prefix`                |
//! | `{"error":{"message":"m"}}`           | `prefix: m`             |
//! | JSON string `"m"`                     | `prefix: m`             |
//! | any other text, JSON or not           | `prefix: <raw body>`    |

use bridge_traits::http::HttpResponse;
use serde_json::Value;

/// Build the failure message for a non-success `response`.
///
/// `prefix` names the operation, e.g. `"Failed to create Drive file"`.
pub fn describe_failure(response: &HttpResponse, prefix: &str) -> String {
    match response.text() {
        Ok(text) => describe_failure_text(prefix, &text),
        Err(_) => prefix.to_string(),
    }
}

/// Same policy as [`describe_failure`] for a body that was already read.
pub fn describe_failure_text(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        return prefix.to_string();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::String(message)) => with_detail(prefix, &message),
        Ok(payload) => match payload.pointer("/error/message").and_then(Value::as_str) {
            Some(message) if !message.is_empty() => with_detail(prefix, message),
            _ => with_detail(prefix, text),
        },
        Err(_) => with_detail(prefix, text),
    }
}

fn with_detail(prefix: &str, detail: &str) -> String {
    format!("{}: {}", prefix, detail)
}
