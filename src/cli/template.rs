//! Output filename templates
//!
//! Renders `{token}` placeholders against a per-entity substitution table
//! and sanitizes the result so a scraped title cannot escape the output
//! directory. Unknown tokens are an error, not silently dropped: a typo in
//! a pattern should fail loudly before any download starts.

use crate::errors::TemplateError;

/// Render a filename pattern against a token table.
///
/// Tokens are `{name}` spans; everything else is copied through verbatim.
/// Token availability depends on the entity being named, so the caller
/// supplies the table and an absent name is `UnknownToken`.
pub fn render(pattern: &str, tokens: &[(&str, String)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    let mut consumed = 0;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let close = after_open
            .find('}')
            .ok_or(TemplateError::Unterminated {
                position: consumed + open,
            })?;
        let name = &after_open[..close];
        let value = tokens
            .iter()
            .find(|(token, _)| *token == name)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| TemplateError::UnknownToken {
                token: name.to_string(),
            })?;
        out.push_str(value);
        consumed += open + 1 + close + 1;
        rest = &after_open[close + 1..];
    }
    out.push_str(rest);

    Ok(sanitize(&out))
}

/// Zero-padded 1-based index token value
pub fn index_token(index: usize, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// Replace filesystem-hostile characters in a rendered filename.
///
/// Scraped titles can contain anything; path separators in particular
/// must never survive into the final name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<(&'static str, String)> {
        vec![
            ("tag", "abc123".to_string()),
            ("title", "Holiday".to_string()),
            ("ext", "jpeg".to_string()),
        ]
    }

    #[test]
    fn test_render_substitutes_tokens() {
        let name = render("{tag}.{ext}", &tokens()).unwrap();
        assert_eq!(name, "abc123.jpeg");
    }

    #[test]
    fn test_literal_text_is_preserved() {
        let name = render("imgur_{title}_final.{ext}", &tokens()).unwrap();
        assert_eq!(name, "imgur_Holiday_final.jpeg");
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let result = render("{tag}_{nope}.{ext}", &tokens());
        assert!(matches!(
            result,
            Err(TemplateError::UnknownToken { token }) if token == "nope"
        ));
    }

    #[test]
    fn test_unterminated_token_is_an_error() {
        let result = render("{tag}.{ext", &tokens());
        assert!(matches!(result, Err(TemplateError::Unterminated { .. })));
    }

    #[test]
    fn test_path_separators_are_sanitized() {
        let table = vec![
            ("title", "a/b\\c".to_string()),
            ("ext", "png".to_string()),
        ];
        let name = render("{title}.{ext}", &table).unwrap();
        assert_eq!(name, "a_b_c.png");
    }

    #[test]
    fn test_index_token_padding() {
        assert_eq!(index_token(7, 3), "007");
        assert_eq!(index_token(42, 3), "042");
        assert_eq!(index_token(1234, 3), "1234");
        assert_eq!(index_token(1, 1), "1");
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(render("", &tokens()).unwrap(), "");
    }
}
