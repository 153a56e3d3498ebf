// src/provider/tables.rs
//! Static lookup tables for the headline provider: category routing, the
//! country filter the headline endpoint accepts, world fan-out order, and the
//! country → language / display-name hints used by the search fallback.

/// How a logical category reaches the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRoute {
    /// Category the provider actually supports.
    pub upstream: &'static str,
    /// Whether the logical name is also folded into the keyword search.
    pub fold_into_keyword: bool,
}

const fn direct(upstream: &'static str) -> CategoryRoute {
    CategoryRoute {
        upstream,
        fold_into_keyword: false,
    }
}

const fn folded(upstream: &'static str) -> CategoryRoute {
    CategoryRoute {
        upstream,
        fold_into_keyword: true,
    }
}

pub const CATEGORY_TABLE: &[(&str, CategoryRoute)] = &[
    ("general", direct("general")),
    ("business", direct("business")),
    ("technology", direct("technology")),
    ("science", direct("science")),
    ("health", direct("health")),
    ("sports", direct("sports")),
    ("entertainment", direct("entertainment")),
    ("politics", folded("general")),
    ("world", folded("general")),
    ("environment", folded("science")),
    ("education", folded("general")),
    ("food", folded("entertainment")),
];

/// Route for a logical category. Unknown categories pass through unchanged
/// and are not folded.
pub fn route_category(category: &str) -> (String, bool) {
    match CATEGORY_TABLE.iter().find(|(k, _)| *k == category) {
        Some((_, r)) => (r.upstream.to_string(), r.fold_into_keyword),
        None => (category.to_string(), false),
    }
}

/// Country codes the headline endpoint accepts as a filter.
pub const SUPPORTED_COUNTRIES: &[&str] = &[
    "ae", "ar", "at", "au", "be", "bg", "br", "ca", "ch", "cn", "co", "cu", "cz", "de", "eg", "fr",
    "gb", "gr", "hk", "hu", "id", "ie", "il", "in", "it", "jp", "kr", "lt", "lv", "ma", "mx", "my",
    "ng", "nl", "no", "nz", "ph", "pl", "pt", "ro", "rs", "ru", "sa", "se", "sg", "si", "sk", "th",
    "tr", "tw", "ua", "us", "ve", "za",
];

pub fn is_supported_country(code: &str) -> bool {
    let code = code.to_ascii_lowercase();
    SUPPORTED_COUNTRIES.contains(&code.as_str())
}

/// Sentinels that request multi-region aggregation.
pub const WORLD_SENTINELS: &[&str] = &["world", "global", "all"];

pub fn is_world(country: &str) -> bool {
    let c = country.to_ascii_lowercase();
    WORLD_SENTINELS.contains(&c.as_str())
}

/// Fan-out order for multi-region aggregation (before support filtering).
pub const WORLD_CANDIDATES: &[&str] = &[
    "us", "gb", "in", "ca", "au", "de", "fr", "jp", "cn", "br", "ru", "kr", "it", "es", "mx", "ar",
    "za", "ng", "eg", "sa", "ae", "tr", "id", "th", "sg", "my", "ph", "vn", "nz", "nl", "be", "ch",
    "at", "se", "no", "dk", "fi", "pl", "cz", "hu", "ro", "bg", "gr", "pt", "ie", "is", "lu", "mt",
    "cy",
];

pub fn world_countries() -> Vec<&'static str> {
    WORLD_CANDIDATES
        .iter()
        .copied()
        .filter(|c| SUPPORTED_COUNTRIES.contains(c))
        .collect()
}

pub const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("us", "en"),
    ("gb", "en"),
    ("in", "en"),
    ("au", "en"),
    ("ca", "en"),
    ("nz", "en"),
    ("es", "es"),
    ("mx", "es"),
    ("ar", "es"),
    ("fr", "fr"),
    ("de", "de"),
    ("it", "it"),
    ("pt", "pt"),
    ("br", "pt"),
    ("ru", "ru"),
    ("jp", "ja"),
    ("cn", "zh"),
    ("kr", "ko"),
];

/// Search language for a country code, `en` when unmapped.
pub fn language_for(country: &str) -> &'static str {
    let c = country.to_ascii_lowercase();
    LANGUAGE_TABLE
        .iter()
        .find(|(k, _)| *k == c)
        .map(|(_, v)| *v)
        .unwrap_or("en")
}

pub const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("in", "India"),
    ("es", "Spain"),
    ("mx", "Mexico"),
    ("us", "USA"),
    ("gb", "UK"),
    ("de", "Germany"),
    ("fr", "France"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("kr", "Korea"),
    ("br", "Brazil"),
];

/// Display name folded into free-text search; upper-cased code when unmapped.
pub fn country_display_name(country: &str) -> String {
    let c = country.to_ascii_lowercase();
    COUNTRY_NAMES
        .iter()
        .find(|(k, _)| *k == c)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| country.to_ascii_uppercase())
}
