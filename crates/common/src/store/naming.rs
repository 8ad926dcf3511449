use uuid::Uuid;

use super::StoreError;

const MAX_IDENTIFIER_LEN: usize = 255;

/// Check that `identifier` names exactly one entry directly under its
/// parent directory.
pub fn validate_identifier(identifier: &str) -> Result<(), StoreError> {
    let reason = if identifier.is_empty() {
        "identifier cannot be empty"
    } else if identifier.len() > MAX_IDENTIFIER_LEN {
        "identifier is too long"
    } else if identifier.starts_with('.') {
        "identifier cannot start with '.'"
    } else if identifier.contains(['/', '\\', '\0']) {
        "identifier cannot contain path separators"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidName(format!("{identifier:?}: {reason}")))
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Lowercase ASCII slug of a display name: alphanumeric runs joined by `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
