use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::LookupError,
    model::{LocationQuery, WeatherResult},
};

use super::truncate_body;

/// Current-weather client for the OpenWeatherMap by-city-name endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, url: String, http: Client) -> Self {
        Self { api_key, url, http }
    }

    /// Issue exactly one GET for `query` and map the body to a [`WeatherResult`].
    pub async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherResult, LookupError> {
        let location = query.location_term();
        let mut params = vec![("q", location.as_str())];
        let units = query.units.trim();
        if !units.is_empty() {
            params.push(("units", units));
        }
        params.push(("appid", self.api_key.as_str()));

        debug!(url = %self.url, q = %location, units, "requesting current weather");

        let res = self
            .http
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(|err| {
                LookupError::upstream(format!("Failed to send request to OpenWeather: {err}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            LookupError::upstream(format!("Failed to read OpenWeather response body: {err}"))
        })?;

        if !status.is_success() {
            let detail = truncate_body(&body);
            let message = if detail.trim().is_empty() {
                format!("Response Error: {}", status.as_u16())
            } else {
                format!("Response Error: {}: {}", status.as_u16(), detail)
            };
            return Err(LookupError::Upstream {
                status: Some(status),
                message,
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|err| {
            LookupError::upstream(format!("Failed to parse OpenWeather JSON: {err}"))
        })?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, LookupError> {
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            LookupError::upstream("OpenWeather response contained no weather entries")
        })?;

        let condition = match weather.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("{} ({})", weather.main, description),
            None => weather.main,
        };

        Ok(WeatherResult {
            temperature: self.main.temp,
            condition,
            location: format!("{}, {}", self.name, self.sys.country),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::MockUpstream;
    use reqwest::StatusCode;

    const PARIS: &str = r#"{
        "name": "Paris",
        "main": {"temp": 18.4, "humidity": 60},
        "weather": [{"main": "Clouds", "description": "broken clouds"}],
        "sys": {"country": "FR"}
    }"#;

    fn client(upstream: &MockUpstream) -> OpenWeatherClient {
        OpenWeatherClient::new("KEY".into(), upstream.url.clone(), Client::new())
    }

    #[tokio::test]
    async fn maps_upstream_fields() {
        let upstream = MockUpstream::spawn(StatusCode::OK, PARIS).await;

        let result = client(&upstream)
            .fetch_current(&LocationQuery::new("paris", "fr").with_units("metric"))
            .await
            .unwrap();

        assert_eq!(result.temperature, 18.4);
        assert_eq!(result.condition, "Clouds (broken clouds)");
        assert_eq!(result.location, "Paris, FR");
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn sends_location_units_and_key() {
        let upstream = MockUpstream::spawn(StatusCode::OK, PARIS).await;

        client(&upstream)
            .fetch_current(
                &LocationQuery::new("Louisville", "US")
                    .with_state("KY")
                    .with_units("imperial"),
            )
            .await
            .unwrap();

        let params = upstream.last_query().expect("request should be recorded");
        assert_eq!(params.get("q").map(String::as_str), Some("Louisville,KY,US"));
        assert_eq!(params.get("units").map(String::as_str), Some("imperial"));
        assert_eq!(params.get("appid").map(String::as_str), Some("KEY"));
    }

    #[tokio::test]
    async fn blank_units_are_not_sent() {
        let upstream = MockUpstream::spawn(StatusCode::OK, PARIS).await;

        client(&upstream)
            .fetch_current(&LocationQuery::new("Paris", "FR"))
            .await
            .unwrap();

        let params = upstream.last_query().unwrap();
        assert_eq!(params.get("q").map(String::as_str), Some("Paris,FR"));
        assert!(!params.contains_key("units"));
    }

    #[tokio::test]
    async fn condition_without_description_has_no_parentheses() {
        let body = r#"{
            "name": "Oslo",
            "main": {"temp": 271.3},
            "weather": [{"main": "Snow"}],
            "sys": {"country": "NO"}
        }"#;
        let upstream = MockUpstream::spawn(StatusCode::OK, body).await;

        let result = client(&upstream)
            .fetch_current(&LocationQuery::new("Oslo", "NO"))
            .await
            .unwrap();

        assert_eq!(result.condition, "Snow");
    }

    #[tokio::test]
    async fn empty_description_is_treated_as_absent() {
        let body = r#"{
            "name": "Oslo",
            "main": {"temp": 1.0},
            "weather": [{"main": "Clear", "description": ""}],
            "sys": {"country": "NO"}
        }"#;
        let upstream = MockUpstream::spawn(StatusCode::OK, body).await;

        let result = client(&upstream)
            .fetch_current(&LocationQuery::new("Oslo", "NO"))
            .await
            .unwrap();

        assert_eq!(result.condition, "Clear");
    }

    #[tokio::test]
    async fn error_status_is_carried() {
        let upstream =
            MockUpstream::spawn(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#)
                .await;

        let err = client(&upstream)
            .fetch_current(&LocationQuery::new("Atlantis", "XX"))
            .await
            .unwrap_err();

        match err {
            LookupError::Upstream { status, message } => {
                assert_eq!(status, Some(StatusCode::NOT_FOUND));
                assert!(message.starts_with("Response Error: 404"));
                assert!(message.contains("city not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_an_upstream_error() {
        let upstream = MockUpstream::spawn(StatusCode::OK, r#"{"name": "Paris"}"#).await;

        let err = client(&upstream)
            .fetch_current(&LocationQuery::new("Paris", "FR"))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Upstream { status: None, .. }));
        assert!(err.to_string().contains("Failed to parse OpenWeather JSON"));
    }

    #[tokio::test]
    async fn empty_weather_list_is_an_upstream_error() {
        let body = r#"{"name": "Paris", "main": {"temp": 1.0}, "weather": [], "sys": {"country": "FR"}}"#;
        let upstream = MockUpstream::spawn(StatusCode::OK, body).await;

        let err = client(&upstream)
            .fetch_current(&LocationQuery::new("Paris", "FR"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no weather entries"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_upstream_error() {
        let client = OpenWeatherClient::new(
            "KEY".into(),
            "http://127.0.0.1:1/weather".into(),
            Client::new(),
        );

        let err = client
            .fetch_current(&LocationQuery::new("Paris", "FR"))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Upstream { status: None, .. }));
        assert!(err.to_string().contains("Failed to send request"));
    }
}
