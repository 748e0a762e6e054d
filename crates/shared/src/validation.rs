//! Custom field validators for request payloads.

use std::borrow::Cow;

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed.
///
/// Names are stored trimmed, so `"   "` must fail the same way `""` does.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    #[case("Rent", true)]
    #[case("  Rent  ", true)]
    fn test_not_blank(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(not_blank(value).is_ok(), valid);
    }
}
