//! # Custom Error Messages
//!
//! A schema may carry an `errorMessages` object mapping parameter names to
//! operator-written text:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {"userId": {"pattern": "^[1-9]\\d*$"}},
//!   "errorMessages": {"userId": "must be a positive integer"}
//! }
//! ```
//!
//! When a violation concerns a parameter with a non-blank text entry, the
//! client sees that text. Otherwise the engine's default wording is used.
//! Resolution is total: a missing or oddly-typed `errorMessages` node never
//! fails the request, it only falls back.

use serde_json::Value;

use crate::config::MessageLocale;
use crate::engine::Violation;

/// JSON Pointer of the custom message table inside a schema document.
pub const ERROR_MESSAGES_POINTER: &str = "/errorMessages";

/// Resolve the client-facing message for one violation.
pub fn resolve_message(schema: &Value, violation: &Violation, locale: MessageLocale) -> String {
    custom_message(schema, violation, locale).unwrap_or_else(|| violation.default_message())
}

fn custom_message(schema: &Value, violation: &Violation, locale: MessageLocale) -> Option<String> {
    let table = schema.pointer(ERROR_MESSAGES_POINTER)?;
    let field = violation.field_name()?;
    let text = table.get(&field)?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(format_custom(&field, text, locale))
}

/// Format operator text for a field.
pub fn format_custom(field: &str, text: &str, locale: MessageLocale) -> String {
    match locale {
        MessageLocale::En => format!("parameter '{field}' failed validation: '{text}'"),
        MessageLocale::Zh => format!("参数 '{field}' 验证失败 ： '{text}'"),
    }
}
