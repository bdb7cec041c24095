//! Request field validation helpers.

use crate::Error;

/// Validate a required string field: it must be present and non-empty after
/// trimming.
pub fn non_empty(value: Option<String>, field: &'static str) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::MissingField(field)),
    }
}

/// Normalize an optional string field for a partial update.
///
/// Absent and empty values both mean "leave the stored value unchanged",
/// matching the coalesce-on-null update semantics.
pub fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{non_empty, optional_trimmed};

    #[test]
    fn non_empty_trims_and_accepts() {
        assert_eq!(
            non_empty(Some("  groceries ".to_string()), "category"),
            Ok("groceries".to_string())
        );
    }

    #[test]
    fn non_empty_rejects_missing_and_blank() {
        assert_eq!(non_empty(None, "title"), Err(Error::MissingField("title")));
        assert_eq!(
            non_empty(Some("   ".to_string()), "title"),
            Err(Error::MissingField("title"))
        );
    }

    #[test]
    fn optional_trimmed_maps_blank_to_none() {
        assert_eq!(optional_trimmed(None), None);
        assert_eq!(optional_trimmed(Some("".to_string())), None);
        assert_eq!(optional_trimmed(Some(" \t".to_string())), None);
        assert_eq!(
            optional_trimmed(Some(" rent ".to_string())),
            Some("rent".to_string())
        );
    }
}
