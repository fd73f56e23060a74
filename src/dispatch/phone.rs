//! Destination number normalisation.
//!
//! Contacts are entered by hand, so numbers arrive in every local style:
//! `0803 123 4567`, `(0803) 123-4567`, `+234 803 123 4567`, `00234...`.
//! Providers want E.164.  Rules, applied after stripping everything but
//! digits and a leading `+`:
//!
//! | Input prefix | Result                             |
//! |--------------|------------------------------------|
//! | `+`          | passed through                     |
//! | `00`         | replaced by `+`                    |
//! | `0`          | trunk prefix replaced by country   |
//! | other        | country code prepended             |

use crate::error::ChannelFailure;

/// Normalise `raw` to E.164 using `country_code` (e.g. `+234`) for local numbers.
pub fn normalize_phone(raw: &str, country_code: &str) -> Result<String, ChannelFailure> {
    let trimmed = raw.trim();
    let international = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    let invalid = || ChannelFailure::InvalidNumber(raw.to_string());
    if digits.is_empty() {
        return Err(invalid());
    }

    if international {
        return Ok(format!("+{digits}"));
    }
    if let Some(rest) = digits.strip_prefix("00") {
        if rest.is_empty() {
            return Err(invalid());
        }
        return Ok(format!("+{rest}"));
    }
    let local = digits.strip_prefix('0').unwrap_or(&digits);
    if local.is_empty() {
        return Err(invalid());
    }
    Ok(format!("{country_code}{local}"))
}
