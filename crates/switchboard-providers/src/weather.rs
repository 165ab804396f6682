//! Two-step weather lookup: resolve the city, then fetch its conditions.
//! Both requests count as a single rate-limited call.

use serde_json::Value;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
    traits::HttpRequest,
};

use crate::{
    client::{build_url, ApiClient, Expect},
    names::WEATHER,
    normalize::{display, normalize, unexpected, ResponseParser},
};

/// A resolved city from `/search-city`.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub lat: String,
    pub lon: String,
}

/// Pick the first match from a `{"success": true, "result": [...]}` city search.
pub fn parse_city(raw: &RawResponse, fallback_name: &str) -> Result<City, SwitchboardError> {
    let json = raw
        .as_json()
        .ok_or_else(|| unexpected("city search is not JSON"))?;
    if !is_success(json) {
        return Err(unexpected("city not found"));
    }
    let first = json
        .get("result")
        .and_then(Value::as_array)
        .and_then(|cities| cities.first())
        .ok_or_else(|| unexpected("city not found"))?;

    let coord = |key: &str| match first.get(key) {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    let (lat, lon) = coord("lat")
        .zip(coord("lon"))
        .ok_or_else(|| unexpected("city has no coordinates"))?;
    let name = first
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback_name)
        .to_string();
    Ok(City { name, lat, lon })
}

fn is_success(json: &Value) -> bool {
    json.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Expects `{"success": true, "result": {"current": {...}, "forecast": [...]}}`.
pub struct WeatherParser<'a> {
    pub city: &'a str,
}

impl ResponseParser for WeatherParser<'_> {
    fn action(&self) -> &str {
        "Weather lookup"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let json = match raw {
            RawResponse::Json(v) => v,
            _ => return Err(unexpected("weather response is not JSON")),
        };
        if !is_success(&json) {
            return Err(unexpected("weather data not available"));
        }
        let result = json
            .get("result")
            .filter(|r| r.is_object())
            .cloned()
            .ok_or_else(|| unexpected("weather response has no result"))?;
        let current = result.get("current");
        let summary = format!(
            "Weather for {}: {}, {}°C",
            self.city,
            display(current.and_then(|c| c.get("condition"))),
            display(current.and_then(|c| c.get("temperature"))),
        );
        Ok(ProviderResult::ok(summary, Some(result)))
    }
}

/// Current conditions and forecast for `location`.
pub async fn weather(client: &ApiClient, location: &str) -> ProviderResult {
    let outcome = lookup(client, location).await;
    match outcome {
        Ok((city, raw)) => normalize(WEATHER, Ok(raw), &WeatherParser { city: &city.name }),
        Err(e) => normalize(WEATHER, Err(e), &WeatherParser { city: location }),
    }
}

async fn lookup(client: &ApiClient, location: &str) -> Result<(City, RawResponse), SwitchboardError> {
    let api = client.acquire(WEATHER)?;

    let url = build_url(&api.endpoint, "search-city", &[("query", location)]);
    let cities = client
        .fetch(HttpRequest::get(url, client.timeout()), Expect::Auto)
        .await?;
    let city = parse_city(&cities, location)?;

    let url = build_url(
        &api.endpoint,
        "all-weather",
        &[
            ("lat", city.lat.as_str()),
            ("lon", city.lon.as_str()),
            ("key", "weather"),
        ],
    );
    let raw = client
        .fetch(HttpRequest::get(url, client.timeout()), Expect::Auto)
        .await?;
    Ok((city, raw))
}
