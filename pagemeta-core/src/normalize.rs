//! Description normalization
//!
//! The description source can hand back anything from a clean summary to a
//! bare ellipsis placeholder. Normalization decides whether a candidate is
//! worth writing at all.

/// The horizontal-ellipsis placeholder some extractors emit for pages with
/// no usable lead text.
const ELLIPSIS: &str = "\u{2026}";

/// The same placeholder with the escape sequence left unexpanded by the
/// producer.
const ELLIPSIS_ESCAPED: &str = "\\u2026";

/// Normalize a raw candidate description.
///
/// Trims surrounding whitespace. Returns `None` when the candidate is
/// missing, empty after trimming, or one of the ellipsis placeholders, in
/// which case no description is available and nothing should be written.
pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    let trimmed = raw.unwrap_or_default().trim();

    if trimmed.is_empty() || trimmed == ELLIPSIS || trimmed == ELLIPSIS_ESCAPED {
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_none_input_yields_none() {
        assert_eq!(normalize_description(None), None);
    }

    #[test]
    fn test_empty_and_whitespace_yield_none() {
        assert_eq!(normalize_description(Some("")), None);
        assert_eq!(normalize_description(Some("   \t\n")), None);
    }

    #[test]
    fn test_ellipsis_placeholders_yield_none() {
        assert_eq!(normalize_description(Some("\u{2026}")), None);
        assert_eq!(normalize_description(Some(" \u{2026} ")), None);
        assert_eq!(normalize_description(Some("\\u2026")), None);
    }

    #[test]
    fn test_valid_text_is_trimmed() {
        assert_eq!(
            normalize_description(Some(" Example text. ")),
            Some("Example text.".to_string())
        );
    }

    #[test]
    fn test_ellipsis_inside_text_is_kept() {
        assert_eq!(
            normalize_description(Some("Wait\u{2026} there is more.")),
            Some("Wait\u{2026} there is more.".to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_output_is_trimmed_and_nonempty(s in ".*") {
            if let Some(out) = normalize_description(Some(&s)) {
                prop_assert_eq!(out.trim(), out.as_str());
                prop_assert!(!out.is_empty());
                prop_assert_ne!(out.as_str(), "\u{2026}");
                prop_assert_ne!(out.as_str(), "\\u2026");
            }
        }

        #[test]
        fn prop_padding_does_not_change_result(s in "[a-zA-Z0-9 .]{1,40}") {
            let padded = format!("  {}\t", s);
            prop_assert_eq!(
                normalize_description(Some(&padded)),
                normalize_description(Some(&s))
            );
        }
    }
}
