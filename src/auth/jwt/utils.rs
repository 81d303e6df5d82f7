//! JWT utility functions

/// Extract the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively. An empty token yields `None`.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
