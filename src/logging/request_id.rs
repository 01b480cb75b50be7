//! Request correlation ids

use uuid::Uuid;

/// Generate a new request ID using UUID v4
///
/// Sent as `x-request-id` on every proxy call and recorded on the call's
/// tracing span, so client and backend logs can be joined.
///
/// # Examples
///
/// ```
/// use llm_console::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert_eq!(request_id.len(), 36);
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
