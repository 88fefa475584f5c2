//! Steam identifier extraction
//!
//! Ticket answers are free text; players paste raw SteamID64s, legacy `STEAM_0:X:Y` ids or
//! community profile links.

use regex::Regex;
use std::sync::LazyLock;

/// Offset between account ids and SteamID64 for individual accounts
pub const STEAM64_BASE: u64 = 76_561_197_960_265_728;

static STEAM64_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"7656119\d{10}").expect("valid steam64 regex"));
static STEAM64_EXACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^7656119\d{10}$").expect("valid steam64 regex"));
static STEAM32_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"STEAM_0:[01]:\d+").expect("valid steam32 regex"));
static PROFILES_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://steamcommunity\.com/profiles/(\d+)").expect("valid profiles regex")
});
static VANITY_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://steamcommunity\.com/id/([A-Za-z0-9_\-]+)")
        .expect("valid vanity regex")
});

/// Exactly a SteamID64 (`7656119` followed by ten digits)
#[must_use]
pub fn is_steam64(candidate: &str) -> bool {
    STEAM64_EXACT_RE.is_match(candidate)
}

/// Convert `STEAM_0:Y:Z` into a SteamID64
#[must_use]
pub fn steam32_to_steam64(steam32: &str) -> Option<u64> {
    let mut parts = steam32.trim().split(':');
    let _universe = parts.next()?;
    let y: u64 = parts.next()?.parse().ok()?;
    let z: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || y > 1 {
        return None;
    }
    z.checked_mul(2)?.checked_add(y)?.checked_add(STEAM64_BASE)
}

/// Every Steam identifier found in `text`, unique and in first-seen order.
///
/// SteamID64s and profile links yield numeric ids, legacy ids are converted, vanity links
/// yield the vanity name (resolve it with the Steam API).
#[must_use]
pub fn extract_steam_ids(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    found.extend(
        STEAM64_RE
            .find_iter(text)
            .map(|m| (m.start(), m.as_str().to_string())),
    );
    found.extend(STEAM32_RE.find_iter(text).filter_map(|m| {
        steam32_to_steam64(m.as_str()).map(|id| (m.start(), id.to_string()))
    }));
    for re in [&*PROFILES_URL_RE, &*VANITY_URL_RE] {
        found.extend(
            re.captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| (m.start(), m.as_str().to_string())),
        );
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut ids: Vec<String> = Vec::with_capacity(found.len());
    for (_, id) in found {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Community profile URL for a SteamID64
#[must_use]
pub fn profile_url(steam64: &str) -> String {
    format!("https://steamcommunity.com/profiles/{steam64}")
}
