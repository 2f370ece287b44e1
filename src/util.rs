//! Small shared helpers

/// Zero-pad a card number to the 3-digit form both external APIs key on.
///
/// Surrounding whitespace is trimmed first: `"6"` -> `"006"`, `" 7 "` ->
/// `"007"`, `"003"` -> `"003"`. Numbers already 3 digits or longer pass
/// through unchanged.
pub fn pad_card_number(raw: &str) -> String {
    format!("{:0>3}", raw.trim())
}
