//! Identifier grammar and required-field validation shared by the entities

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{FetchError, FetchResult};

/// Resource identifier grammar: a non-empty run of word characters
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Trailing dot-suffix of a URL-ish metadata value; capture excludes the dot
pub(crate) static DOT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([^.\s]+)$").unwrap());

/// Check an identifier against the grammar before any network activity
pub fn validate_identifier(identifier: &str) -> FetchResult<String> {
    if IDENTIFIER.is_match(identifier) {
        Ok(identifier.to_string())
    } else {
        Err(FetchError::InvalidIdentifier {
            identifier: identifier.to_string(),
        })
    }
}

/// A named accessor whose success marks one required field as present
pub type Accessor<T> = fn(&T) -> FetchResult<()>;

/// Evaluate every accessor in order, eagerly, right after metadata
/// collection. The first failure aborts the entity's construction.
pub fn validate_required<T>(entity: &T, fields: &[(&str, Accessor<T>)]) -> FetchResult<()> {
    for (name, accessor) in fields {
        tracing::trace!("validating required field {}", name);
        accessor(entity)?;
    }
    Ok(())
}

/// Shared one-line description used by both entity `Display` impls
pub fn describe_entity(kind: &str, identifier: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{} {} ({:?})", kind, identifier, title),
        None => format!("{} {}", kind, identifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_grammar_accepts_word_runs() {
        for ok in ["abc123", "X", "under_score", "0", "___"] {
            assert!(validate_identifier(ok).is_ok(), "{:?} should pass", ok);
        }
    }

    #[test]
    fn test_identifier_grammar_rejections() {
        for bad in ["", "a b", "a-b", "a/b", "café", "a.b", " abc", "abc\n"] {
            let result = validate_identifier(bad);
            assert!(
                matches!(result, Err(FetchError::InvalidIdentifier { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_required_fields_evaluated_in_order() {
        struct Probe;
        let fields: &[(&str, Accessor<Probe>)] = &[
            ("first", |_| Ok(())),
            ("second", |_| {
                Err(FetchError::MetadataIncomplete {
                    identifier: "x".to_string(),
                    key: "second".to_string(),
                })
            }),
            ("third", |_| panic!("third accessor must not run")),
        ];
        let result = validate_required(&Probe, fields);
        assert!(
            matches!(result, Err(FetchError::MetadataIncomplete { key, .. }) if key == "second")
        );
    }

    #[test]
    fn test_describe_entity() {
        assert_eq!(
            describe_entity("image", "abc", Some("Cat")),
            "image abc (\"Cat\")"
        );
        assert_eq!(describe_entity("album", "xyz", None), "album xyz");
    }
}
