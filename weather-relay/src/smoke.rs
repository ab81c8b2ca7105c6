//! Manual smoke test against a running relay.
//!
//! Issues a fixed list of requests one after another and prints what came back.
//! Failures are reported per scenario; the run always continues.

use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub city: &'static str,
    pub state: &'static str,
    pub description: &'static str,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        city: "New York",
        state: "NY",
        description: "Valid city test",
    },
    Scenario {
        city: "Los Angeles",
        state: "CA",
        description: "Another valid city test",
    },
    Scenario {
        city: "Hello",
        state: "CA",
        description: "Invalid city test",
    },
    Scenario {
        city: "",
        state: "NY",
        description: "Empty city test",
    },
    Scenario {
        city: "Chicago",
        state: "",
        description: "Empty state test",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { summary: String },
    ExpectedFailure(String),
    Error(String),
    UnknownStatus(Value),
    Connection,
    Timeout,
    Request(String),
    InvalidJson,
}

impl Outcome {
    /// Classify a decoded relay body by its `status` field.
    pub fn from_body(body: &Value) -> Self {
        let text = |key: &str| body.get(key).map(display_value).unwrap_or_default();

        match body.get("status").and_then(Value::as_str) {
            Some("success") => Outcome::Success {
                summary: format!(
                    "Temperature in {}, {} is {}°F with {}",
                    text("city"),
                    text("state"),
                    text("temperature"),
                    text("weather_type"),
                ),
            },
            Some("failed") => Outcome::ExpectedFailure(text("message")),
            Some("error") => Outcome::Error(text("message")),
            _ => Outcome::UnknownStatus(body.clone()),
        }
    }

    fn report(&self, base_url: &str) -> String {
        match self {
            Outcome::Success { summary } => format!("SUCCESS: {summary}"),
            Outcome::ExpectedFailure(message) => format!("EXPECTED FAILURE: {message}"),
            Outcome::Error(message) => format!("ERROR: {message}"),
            Outcome::UnknownStatus(body) => format!("UNKNOWN STATUS: {body}"),
            Outcome::Connection => format!(
                "CONNECTION ERROR: Could not connect to the relay\n\
                 Make sure it is running, e.g. `weather-relay serve` (target {base_url})"
            ),
            Outcome::Timeout => "TIMEOUT: Request took too long".to_string(),
            Outcome::Request(e) => format!("REQUEST ERROR: {e}"),
            Outcome::InvalidJson => "JSON ERROR: Could not parse response as JSON".to_string(),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run every scenario against `base_url`, sleeping `delay` between requests.
pub async fn run(base_url: &str, delay: Duration) -> anyhow::Result<Vec<Outcome>> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let endpoint = format!("{}/weather", base_url.trim_end_matches('/'));

    println!("WEATHER RELAY SMOKE TEST");
    println!();
    println!("Target URL: {endpoint}");
    println!();

    let mut outcomes = Vec::with_capacity(SCENARIOS.len());

    for (i, scenario) in SCENARIOS.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        println!("Test {}: {}", i + 1, scenario.description);
        println!("Requesting weather for: {}, {}", scenario.city, scenario.state);
        println!("{}", "-".repeat(40));

        let outcome = run_one(&client, &endpoint, scenario).await;
        println!("{}", outcome.report(base_url));
        println!();

        tracing::debug!(scenario = scenario.description, ?outcome, "scenario finished");
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

async fn run_one(client: &reqwest::Client, endpoint: &str, scenario: &Scenario) -> Outcome {
    let response = match client
        .get(endpoint)
        .query(&[("city", scenario.city), ("state", scenario.state)])
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return request_failure(e),
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return request_failure(e),
    };

    let Ok(body) = serde_json::from_str::<Value>(&text) else {
        return Outcome::InvalidJson;
    };

    println!("HTTP Status Code: {}", status.as_u16());
    println!(
        "Response Data: {}",
        serde_json::to_string_pretty(&body).unwrap_or_else(|_| text.clone())
    );

    Outcome::from_body(&body)
}

fn request_failure(e: reqwest::Error) -> Outcome {
    if e.is_timeout() {
        Outcome::Timeout
    } else if e.is_connect() {
        Outcome::Connection
    } else {
        Outcome::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{AppState, router, tests::FakeProvider};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    #[test]
    fn classifies_bodies_by_status() {
        let success = Outcome::from_body(&json!({
            "status": "success",
            "city": "New York",
            "state": "NY",
            "temperature": 58.5,
            "weather_type": "partly cloudy"
        }));
        assert_eq!(
            success,
            Outcome::Success {
                summary: "Temperature in New York, NY is 58.5°F with partly cloudy".into()
            }
        );

        assert_eq!(
            Outcome::from_body(&json!({"status": "failed", "message": "nope"})),
            Outcome::ExpectedFailure("nope".into())
        );
        assert_eq!(
            Outcome::from_body(&json!({"status": "error", "message": "boom"})),
            Outcome::Error("boom".into())
        );
        assert!(matches!(
            Outcome::from_body(&json!({"ok": true})),
            Outcome::UnknownStatus(_)
        ));
    }

    #[tokio::test]
    async fn runs_all_scenarios_against_a_live_relay() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(Arc::new(FakeProvider::default())));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let outcomes = run(&format!("http://{addr}/"), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), SCENARIOS.len());
        assert!(matches!(outcomes[0], Outcome::Success { .. }));
        assert!(matches!(outcomes[1], Outcome::Success { .. }));
        assert_eq!(
            outcomes[2],
            Outcome::ExpectedFailure(
                "City not found. Please check the city and state names.".into()
            )
        );
        assert_eq!(outcomes[3], Outcome::Error("City and state are required.".into()));
        assert_eq!(outcomes[4], Outcome::Error("City and state are required.".into()));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcomes = run(&format!("http://{addr}"), Duration::ZERO).await.unwrap();

        assert!(outcomes.iter().all(|o| *o == Outcome::Connection), "{outcomes:?}");
    }
}
