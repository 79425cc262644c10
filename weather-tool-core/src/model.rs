use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Parameters of a single weather lookup, as received from a tool call.
///
/// `city`, `country` and `units` read missing or `null` as empty strings, so
/// an unset field surfaces as a validation failure instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationQuery {
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    pub state: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub units: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl LocationQuery {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// State/region code, if one was given and is not blank.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// `true` for "imperial" (or "fahrenheit"), in any case.
    pub fn prefers_imperial(&self) -> bool {
        let units = self.units.trim();
        units.eq_ignore_ascii_case("imperial") || units.eq_ignore_ascii_case("fahrenheit")
    }

    /// Search term understood by the upstream `q` parameter.
    pub fn location_term(&self) -> String {
        match self.state() {
            Some(state) => format!("{},{},{}", self.city.trim(), state, self.country.trim()),
            None => format!("{},{}", self.city.trim(), self.country.trim()),
        }
    }

    /// Human-readable location; the state slot is left out when absent.
    pub fn display_location(&self) -> String {
        match self.state() {
            Some(state) => format!("{}, {}, {}", self.city.trim(), state, self.country.trim()),
            None => format!("{}, {}", self.city.trim(), self.country.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub temperature: f64,
    pub condition: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at a coordinate, with the observation time expressed
/// in the location's own UTC offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub utc_offset_seconds: i32,
    pub time: DateTime<FixedOffset>,
    pub temperature_2m: f64,
    pub rain: f64,
    pub snowfall: f64,
    pub wind_speed_10m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let query: LocationQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.city, "");
        assert_eq!(query.country, "");
        assert_eq!(query.units, "");
        assert!(query.state.is_none());
    }

    #[test]
    fn null_fields_deserialize_to_empty() {
        let query: LocationQuery = serde_json::from_value(serde_json::json!({
            "city": null,
            "state": null,
            "country": "FR",
            "units": null
        }))
        .unwrap();
        assert_eq!(query.city, "");
        assert_eq!(query.country, "FR");
        assert_eq!(query.units, "");
        assert!(query.state.is_none());
    }

    #[test]
    fn location_term_includes_state_only_when_present() {
        let query = LocationQuery::new("Louisville", "US");
        assert_eq!(query.location_term(), "Louisville,US");

        let query = query.with_state("KY");
        assert_eq!(query.location_term(), "Louisville,KY,US");

        let query = LocationQuery::new(" Sydney ", "AU").with_state("  ");
        assert_eq!(query.location_term(), "Sydney,AU");
    }

    #[test]
    fn display_location_omits_absent_state() {
        assert_eq!(LocationQuery::new("Paris", "FR").display_location(), "Paris, FR");
        assert_eq!(
            LocationQuery::new("Sydney", "AU").with_state("NSW").display_location(),
            "Sydney, NSW, AU"
        );
    }

    #[test]
    fn imperial_preference_is_case_insensitive() {
        assert!(LocationQuery::new("a", "b").with_units("Imperial").prefers_imperial());
        assert!(LocationQuery::new("a", "b").with_units("fahrenheit").prefers_imperial());
        assert!(!LocationQuery::new("a", "b").with_units("metric").prefers_imperial());
        assert!(!LocationQuery::new("a", "b").prefers_imperial());
    }
}
