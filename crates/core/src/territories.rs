//! Territory code validation.
//!
//! Splits and release restrictions carry ISO 3166-1 alpha-2 codes, plus the
//! industry convention `WW` for worldwide scope.

/// Marker for worldwide scope (not an ISO code).
pub const WORLDWIDE: &str = "WW";

/// Officially assigned ISO 3166-1 alpha-2 codes.
pub const ISO_3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Returns `true` for `WW` or any assigned ISO 3166-1 alpha-2 code.
pub fn is_valid_territory(code: &str) -> bool {
    code == WORLDWIDE || ISO_3166_ALPHA2.contains(&code)
}

/// Returns `true` if the territory list mixes `WW` with specific codes.
pub fn mixes_worldwide_with_specific(codes: &[String]) -> bool {
    codes.iter().any(|c| c == WORLDWIDE) && codes.iter().any(|c| c != WORLDWIDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_assigned_codes() {
        assert!(is_valid_territory("US"));
        assert!(is_valid_territory("GB"));
        assert!(is_valid_territory("JP"));
        assert!(is_valid_territory("BR"));
    }

    #[test]
    fn accepts_worldwide_marker() {
        assert!(is_valid_territory("WW"));
    }

    #[test]
    fn rejects_unassigned_and_malformed_codes() {
        assert!(!is_valid_territory("XX"));
        assert!(!is_valid_territory("ZZ"));
        assert!(!is_valid_territory("usa"));
        assert!(!is_valid_territory("U"));
        assert!(!is_valid_territory(""));
    }

    #[test]
    fn rejects_lowercase() {
        assert!(!is_valid_territory("us"));
    }

    #[test]
    fn detects_worldwide_conflicts() {
        let mixed = vec!["WW".to_string(), "US".to_string()];
        assert!(mixes_worldwide_with_specific(&mixed));

        let only_ww = vec!["WW".to_string()];
        assert!(!mixes_worldwide_with_specific(&only_ww));

        let only_specific = vec!["US".to_string(), "GB".to_string()];
        assert!(!mixes_worldwide_with_specific(&only_specific));

        let empty: Vec<String> = vec![];
        assert!(!mixes_worldwide_with_specific(&empty));
    }

    #[test]
    fn table_is_sorted_and_unique() {
        let mut sorted = ISO_3166_ALPHA2.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.as_slice(), ISO_3166_ALPHA2);
    }
}
