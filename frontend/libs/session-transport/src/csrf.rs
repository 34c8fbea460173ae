//! Anti-forgery token lookup
//!
//! The cookie jar hands back a `Cookie` header value (`a=1; b=2`); the token
//! is the value of the configured cookie inside it.

/// Find a cookie's value inside a `Cookie` header string
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
