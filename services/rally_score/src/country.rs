use isocountry::CountryCode;

/// Lookup capability for country codes.
pub trait CountryRegistry: Send + Sync {
    fn is_known(&self, code: &str) -> bool;
}

/// ISO 3166-1 alpha-2 and alpha-3 codes, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso3166;

impl Iso3166 {
    pub fn lookup(code: &str) -> Option<CountryCode> {
        let code = code.to_ascii_uppercase();
        match code.len() {
            2 => CountryCode::for_alpha2(&code).ok(),
            3 => CountryCode::for_alpha3(&code).ok(),
            _ => None,
        }
    }
}

impl CountryRegistry for Iso3166 {
    fn is_known(&self, code: &str) -> bool {
        Self::lookup(code).is_some()
    }
}

/// Regional-indicator flag for a country code, e.g. "DK" or "DNK" -> 🇩🇰.
/// Returns an empty string for codes the registry does not know.
pub fn flag_emoji(code: &str) -> String {
    let Some(country) = Iso3166::lookup(code) else {
        return String::new();
    };
    country
        .alpha2()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let registry = Iso3166;
        assert!(registry.is_known("DK"));
        assert!(registry.is_known("TW"));
        assert!(registry.is_known("de"));
        assert!(registry.is_known("DNK"));
        assert!(registry.is_known("twn"));
        assert!(!registry.is_known("XX"));
        assert!(!registry.is_known("XXX"));
        assert!(!registry.is_known(""));
        assert!(!registry.is_known("Denmark"));
    }

    #[test]
    fn test_alpha3_resolves_to_alpha2() {
        assert_eq!(Iso3166::lookup("DNK").map(|c| c.alpha2()), Some("DK"));
        assert_eq!(Iso3166::lookup("dk"), Iso3166::lookup("DNK"));
    }

    #[test]
    fn test_flag_emoji() {
        assert_eq!(flag_emoji("DK"), "\u{1F1E9}\u{1F1F0}");
        assert_eq!(flag_emoji("tw"), "\u{1F1F9}\u{1F1FC}");
        assert_eq!(flag_emoji("DNK"), "\u{1F1E9}\u{1F1F0}");
        assert_eq!(flag_emoji("D1"), "");
        assert_eq!(flag_emoji("XX"), "");
    }
}
