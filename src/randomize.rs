//! Deterministic fixture generation driven by a caller-supplied integer source.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Options controlling fixture values.
#[derive(Debug, Clone)]
pub struct FixtureOptions {
    /// Length of generated tokens.
    pub token_len: usize,
    /// First year a generated date may fall in.
    pub min_year: i32,
    /// Number of years after `min_year` dates are spread over.
    pub year_span: i32,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            token_len: 8,
            min_year: 1972,
            year_span: 60,
        }
    }
}

fn pick(next_int: &mut dyn FnMut() -> i64, modulus: i64) -> i64 {
    next_int().rem_euclid(modulus.max(1))
}

/// Alphanumeric token of `opts.token_len` characters.
pub fn random_token(next_int: &mut dyn FnMut() -> i64, opts: &FixtureOptions) -> String {
    (0..opts.token_len.max(1))
        .map(|_| TOKEN_ALPHABET[pick(next_int, TOKEN_ALPHABET.len() as i64) as usize] as char)
        .collect()
}

/// A UTC date inside the configured year window. Plain `date` columns get
/// midnight; anything else also gets a random time of day.
pub fn random_date(
    next_int: &mut dyn FnMut() -> i64,
    field_type: &str,
    opts: &FixtureOptions,
) -> DateTime<FixedOffset> {
    let year = opts.min_year + pick(next_int, i64::from(opts.year_span)) as i32;
    let month = 1 + pick(next_int, 12) as u32;
    let day = 1 + pick(next_int, 28) as u32;
    let midnight = Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);

    let date_only = field_type.eq_ignore_ascii_case("date");
    let at = if date_only {
        midnight
    } else {
        midnight + Duration::seconds(pick(next_int, 86_400))
    };
    at.fixed_offset()
}
