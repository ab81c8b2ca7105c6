//! WMO weather interpretation codes as reported by Open-Meteo.

/// Sentinel returned for any code outside [`WEATHER_CODES`].
pub const UNKNOWN: &str = "unknown";

/// Sorted by code so lookups can binary search.
pub static WEATHER_CODES: &[(i64, &str)] = &[
    (0, "clear sky"),
    (1, "mainly clear"),
    (2, "partly cloudy"),
    (3, "overcast"),
    (45, "foggy"),
    (48, "depositing rime fog"),
    (51, "light drizzle"),
    (53, "moderate drizzle"),
    (55, "dense drizzle"),
    (61, "slight rain"),
    (63, "moderate rain"),
    (65, "heavy rain"),
    (71, "slight snow"),
    (73, "moderate snow"),
    (75, "heavy snow"),
    (77, "snow grains"),
    (80, "slight rain showers"),
    (81, "moderate rain showers"),
    (82, "violent rain showers"),
    (85, "slight snow showers"),
    (86, "heavy snow showers"),
    (95, "thunderstorm"),
    (96, "thunderstorm with slight hail"),
    (99, "thunderstorm with heavy hail"),
];

pub fn describe(code: i64) -> &'static str {
    WEATHER_CODES
        .binary_search_by_key(&code, |&(c, _)| c)
        .map(|idx| WEATHER_CODES[idx].1)
        .unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(WEATHER_CODES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(WEATHER_CODES.len(), 24);
    }

    #[test]
    fn known_codes_map_to_fixed_descriptions() {
        assert_eq!(describe(0), "clear sky");
        assert_eq!(describe(3), "overcast");
        assert_eq!(describe(48), "depositing rime fog");
        assert_eq!(describe(82), "violent rain showers");
        assert_eq!(describe(95), "thunderstorm");
        assert_eq!(describe(99), "thunderstorm with heavy hail");
    }

    #[test]
    fn every_table_entry_is_reachable() {
        for &(code, text) in WEATHER_CODES {
            assert_eq!(describe(code), text);
        }
    }

    #[test]
    fn unlisted_codes_are_unknown() {
        for code in [-1, 4, 44, 50, 97, 100, 999, i64::MIN, i64::MAX] {
            assert_eq!(describe(code), UNKNOWN, "code {code}");
        }
    }
}
