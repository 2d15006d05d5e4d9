use serde::Deserialize;

/// Error payload returned by the dashboard API on any non-success status.
///
/// Both delete flows share this one shape; any other field is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    /// Extracts the human-readable message from a raw error body.
    ///
    /// Returns `None` for empty bodies, non-JSON bodies, bodies without a
    /// string `message` field, and blank messages.
    pub fn message_from_body(body: &[u8]) -> Option<String> {
        if body.is_empty() {
            return None;
        }
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        // Derived struct decoding would also accept `["..."]`.
        if !value.is_object() {
            return None;
        }
        let err = ApiError::deserialize(value).ok()?;
        let message = err.message.trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        }
    }
}
