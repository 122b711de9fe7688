//! Country codes accepted in party addresses (NAD).
//!
//! A closed subset of ISO 3166-1 alpha-2 covering the trading partners
//! this encoder is configured for.

/// Check whether `code` is an accepted ISO 3166-1 alpha-2 country code.
pub fn is_known_country_code(code: &str) -> bool {
    COUNTRY_CODES.binary_search(&code).is_ok()
}

/// All accepted country codes.
pub fn country_codes() -> &'static [&'static str] {
    COUNTRY_CODES
}

/// Sorted for binary search.
static COUNTRY_CODES: &[&str] = &[
    "AU", // Australia
    "BE", // Belgium
    "CA", // Canada
    "CN", // China
    "DE", // Germany
    "ES", // Spain
    "FR", // France
    "GB", // United Kingdom
    "IT", // Italy
    "JP", // Japan
    "NL", // Netherlands
    "US", // United States
];
