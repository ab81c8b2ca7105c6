use serde::{Deserialize, Serialize};

use crate::handler::LookupError;

/// Raw `?city=..&state=..` parameters as the caller sent them.
#[derive(Debug, Clone, Default)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            state: Some(state.into()),
        }
    }

    /// Builds a query from decoded `key=value` pairs. The first `city` and the
    /// first `state` win; repeats and unrelated keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "city" => &mut query.city,
                "state" => &mut query.state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Returns the trimmed city and the state exactly as supplied.
    ///
    /// Both must be present and non-blank; the state is never checked beyond that.
    pub fn validated(&self) -> Result<(&str, &str), LookupError> {
        let city = self.city.as_deref().map(str::trim).unwrap_or_default();
        let state = self.state.as_deref().unwrap_or_default();

        if city.is_empty() || state.trim().is_empty() {
            return Err(LookupError::MissingParameters);
        }

        Ok((city, state))
    }
}

/// First geocoding match for a city name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub resolved_name: String,
}

/// The forecast provider's "current" snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentConditions {
    pub temperature_f: f64,
    pub weather_code: i64,
}

/// Body returned to the caller. The `status` tag is always serialized first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WeatherResponse {
    Success {
        city: String,
        state: String,
        temperature: f64,
        weather_type: String,
    },
    Failed {
        message: String,
    },
    Error {
        message: String,
    },
}

impl WeatherResponse {
    pub fn status(&self) -> &'static str {
        match self {
            WeatherResponse::Success { .. } => "success",
            WeatherResponse::Failed { .. } => "failed",
            WeatherResponse::Error { .. } => "error",
        }
    }
}

/// Rounds to one decimal place the way the exact binary value dictates.
///
/// `72.35` is stored as `72.349999...` and becomes `72.3`. Only values that sit
/// exactly on a midpoint, like `72.25`, are ties; those go to the even digit.
pub fn round_one_decimal(value: f64) -> f64 {
    // Beyond 2^52 / 10 every f64 already has no fractional tenths.
    if !value.is_finite() || value.abs() >= 4.5e14 {
        return value;
    }

    // `mul_add` rounds once, so the sign of each difference below is exact.
    let mut tenths = (value * 10.0).floor();
    if value.mul_add(10.0, -tenths) < 0.0 {
        tenths -= 1.0;
    } else if value.mul_add(10.0, -(tenths + 1.0)) >= 0.0 {
        tenths += 1.0;
    }

    let above_midpoint = value.mul_add(20.0, -(2.0 * tenths + 1.0));
    let rounded = if above_midpoint > 0.0 || (above_midpoint == 0.0 && tenths % 2.0 != 0.0) {
        tenths + 1.0
    } else {
        tenths
    };

    rounded / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validated_trims_city_and_keeps_state_verbatim() {
        let query = WeatherQuery::new("  New York ", " NY");
        let (city, state) = query.validated().expect("query is valid");

        assert_eq!(city, "New York");
        assert_eq!(state, " NY");
    }

    #[test]
    fn validated_rejects_missing_or_blank_fields() {
        let cases = [
            WeatherQuery::default(),
            WeatherQuery {
                city: Some("Chicago".into()),
                state: None,
            },
            WeatherQuery {
                city: None,
                state: Some("IL".into()),
            },
            WeatherQuery::new("", "NY"),
            WeatherQuery::new("Chicago", ""),
            WeatherQuery::new("   ", "IL"),
            WeatherQuery::new("Chicago", "\t"),
        ];

        for query in cases {
            let err = query.validated().unwrap_err();
            assert!(matches!(err, LookupError::MissingParameters), "{query:?}");
        }
    }

    #[test]
    fn from_pairs_keeps_first_occurrence() {
        let query = WeatherQuery::from_pairs([
            ("state", "NY"),
            ("units", "metric"),
            ("city", "New York"),
            ("city", "Boston"),
            ("state", "MA"),
        ]);

        assert_eq!(query.city.as_deref(), Some("New York"));
        assert_eq!(query.state.as_deref(), Some("NY"));
    }

    #[test]
    fn from_pairs_keeps_empty_first_value() {
        let query = WeatherQuery::from_pairs([
            ("city", ""),
            ("city", "Boston"),
            ("state", "MA"),
        ]);

        assert_eq!(query.city.as_deref(), Some(""));
        assert!(matches!(query.validated(), Err(LookupError::MissingParameters)));
    }

    #[test]
    fn success_serializes_status_first() {
        let body = WeatherResponse::Success {
            city: "Chicago".into(),
            state: "IL".into(),
            temperature: 41.3,
            weather_type: "overcast".into(),
        };

        let text = serde_json::to_string(&body).unwrap();
        assert!(text.starts_with(r#"{"status":"success""#), "{text}");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "status": "success",
                "city": "Chicago",
                "state": "IL",
                "temperature": 41.3,
                "weather_type": "overcast"
            })
        );
    }

    #[test]
    fn failure_shapes_carry_only_a_message() {
        let failed = WeatherResponse::Failed { message: "nope".into() };
        let error = WeatherResponse::Error { message: "boom".into() };

        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"status": "failed", "message": "nope"})
        );
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
        assert_eq!(failed.status(), "failed");
        assert_eq!(error.status(), "error");
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(72.44), 72.4);
        assert_eq!(round_one_decimal(72.46), 72.5);
        assert_eq!(round_one_decimal(-3.26), -3.3);
        assert_eq!(round_one_decimal(50.0), 50.0);
    }

    #[test]
    fn rounding_follows_the_stored_binary_value() {
        // Stored just below the midpoint.
        assert_eq!(round_one_decimal(0.15), 0.1);
        assert_eq!(round_one_decimal(72.35), 72.3);
        assert_eq!(round_one_decimal(0.35), 0.3);
        // Stored just above the midpoint.
        assert_eq!(round_one_decimal(72.45), 72.5);
        assert_eq!(round_one_decimal(-72.45), -72.5);
    }

    #[test]
    fn exact_midpoints_round_to_even() {
        assert_eq!(round_one_decimal(72.25), 72.2);
        assert_eq!(round_one_decimal(72.75), 72.8);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(-0.25), -0.2);
        assert_eq!(round_one_decimal(-72.75), -72.8);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(round_one_decimal(f64::NAN).is_nan());
        assert_eq!(round_one_decimal(f64::INFINITY), f64::INFINITY);
    }
}
