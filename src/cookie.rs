//! `document.cookie` string helpers for the persisted mute flag.

use chrono::{DateTime, Duration, Utc};

pub const MUTED_VALUE: &str = "1";
pub const UNMUTED_VALUE: &str = "0";

pub fn encode_muted(muted: bool) -> &'static str {
    if muted {
        MUTED_VALUE
    } else {
        UNMUTED_VALUE
    }
}

/// Anything other than `"1"`/`"0"` is treated as absent.
pub fn decode_muted(value: &str) -> Option<bool> {
    match value.trim() {
        MUTED_VALUE => Some(true),
        UNMUTED_VALUE => Some(false),
        _ => None,
    }
}

/// Builds the string assigned to `document.cookie`, expiring `days` after `now`.
/// Lifetimes past chrono's range expire at the latest representable instant.
pub fn build_cookie(key: &str, value: &str, days: u32, now: DateTime<Utc>) -> String {
    let expires = Duration::try_days(i64::from(days))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    format!(
        "{key}={value}; expires={}; path=/",
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

/// Looks `key` up in a `document.cookie` style `a=1; b=2` string.
pub fn find_cookie<'a>(cookies: &'a str, key: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name.trim() == key).then(|| value.trim())
    })
}
