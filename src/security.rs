use subtle::ConstantTimeEq;

/// Header carrying the admin API key on mutating endpoints.
pub const ADMIN_API_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Whether `provided` grants admin access. With no key configured, nothing does.
pub fn is_authorized_admin(configured: Option<&str>, provided: Option<&str>) -> bool {
    match (configured, provided) {
        (Some(expected), Some(provided)) => constant_time_compare(expected, provided),
        _ => false,
    }
}
