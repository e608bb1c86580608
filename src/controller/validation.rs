//! Submit-time checks for the booking form

use crate::errors::FormError;
use crate::models::{FormData, PNR_LENGTH};

/// Apply the submit rules in order, returning the first one that fails.
///
/// Only the PNR length is checked here. Its character set is restricted where it is typed,
/// see [`is_pnr_char`].
pub fn validate(data: &FormData) -> Result<(), FormError> {
    if !data.is_complete() {
        return Err(FormError::MissingField);
    }

    if data.pnr.chars().count() != PNR_LENGTH {
        return Err(FormError::InvalidPnrLength);
    }

    Ok(())
}

/// Characters accepted by the PNR input
pub fn is_pnr_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pnr: &str, last_name: &str, airline: &str) -> FormData {
        FormData {
            pnr: pnr.to_string(),
            last_name: last_name.to_string(),
            airline: airline.to_string(),
        }
    }

    #[test]
    fn test_any_empty_field_is_missing() {
        let cases = [
            form("", "", ""),
            form("ABC123", "", ""),
            form("", "SHARMA", "indigo"),
            form("ABC123", "", "indigo"),
            form("ABC123", "SHARMA", ""),
            // Missing field wins over a bad PNR length
            form("AB", "", "indigo"),
        ];

        for data in &cases {
            assert_eq!(validate(data), Err(FormError::MissingField), "{:?}", data);
        }
    }

    #[test]
    fn test_pnr_must_be_six_characters() {
        for pnr in ["A", "ABC12", "ABC1234", "ABCDEFGHIJ"] {
            assert_eq!(
                validate(&form(pnr, "SHARMA", "indigo")),
                Err(FormError::InvalidPnrLength)
            );
        }
        assert_eq!(validate(&form("ABC123", "SHARMA", "indigo")), Ok(()));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert_eq!(validate(&form("ÄBC123", "SHARMA", "indigo")), Ok(()));
    }

    #[test]
    fn test_unknown_airline_passes_form_validation() {
        // The backend rejects unsupported airlines
        assert_eq!(validate(&form("ABC123", "SHARMA", "vistara")), Ok(()));
    }

    #[test]
    fn test_pnr_charset() {
        assert!(is_pnr_char('a'));
        assert!(is_pnr_char('Z'));
        assert!(is_pnr_char('7'));
        assert!(!is_pnr_char('-'));
        assert!(!is_pnr_char(' '));
        assert!(!is_pnr_char('é'));
    }
}
