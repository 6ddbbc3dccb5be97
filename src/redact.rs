//! Secret scrubbing for log lines and error messages.
//!
//! The upstream API key travels as a URL query parameter, so any error that
//! echoes the request URL (or a response body that reflects it) would leak the
//! key. Every string that leaves the upstream client passes through
//! [`redact`] with the key supplied explicitly.

/// Placeholder substituted for the secret value.
pub const REDACTED: &str = "[REDACTED]";

/// Replaces every occurrence of `secret` in `text` with [`REDACTED`].
///
/// An empty secret leaves the text untouched.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() || text.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}
