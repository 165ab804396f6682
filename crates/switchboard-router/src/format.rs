//! Reply text for successful provider results.
//!
//! Summaries stay one line; the full payload (hit lists, forecasts, JSON
//! records) is rendered here.

use serde_json::Value;
use switchboard_core::{envelope::ProviderResult, error::SwitchboardError};
use switchboard_providers::{chat, normalize::display, search, translate};

/// Number of forecast days shown.
const FORECAST_DAYS: usize = 3;

/// Numbered list of search hits.
pub fn search_results(query: &str, result: &ProviderResult, limit: usize) -> String {
    let hits = search::hits(result);
    if hits.is_empty() {
        return format!("No search results found for \"{query}\".");
    }
    let mut out = format!("*Search results for \"{query}\":*\n");
    for (i, hit) in hits.iter().take(limit).enumerate() {
        out.push_str(&format!("\n{}. *{}*\n", i + 1, hit.title));
        if !hit.snippet.is_empty() {
            out.push_str(&format!("   {}\n", hit.snippet));
        }
        if !hit.link.is_empty() {
            out.push_str(&format!("   {}\n", hit.link));
        }
    }
    out.trim_end().to_string()
}

/// Current conditions plus a short forecast.
pub fn weather(location: &str, result: &ProviderResult) -> String {
    let mut out = format!("*Weather for {location}:*\n");
    let data = result.data.as_ref();

    if let Some(current) = data.and_then(|d| d.get("current")).filter(|c| c.is_object()) {
        let field = |name: &str| display(current.get(name));
        out.push_str(&format!(
            "\nCurrent: {}\nTemperature: {}°C\nHumidity: {}%\nWind: {} km/h\n",
            field("condition"),
            field("temperature"),
            field("humidity"),
            field("wind_speed"),
        ));
    }

    let forecast = data
        .and_then(|d| d.get("forecast"))
        .and_then(Value::as_array)
        .filter(|days| !days.is_empty());
    if let Some(days) = forecast {
        out.push_str("\nForecast:\n");
        for day in days.iter().take(FORECAST_DAYS) {
            out.push_str(&format!(
                "- {}: {}, {}°/{}°C\n",
                display(day.get("date")),
                display(day.get("condition")),
                display(day.get("high")),
                display(day.get("low")),
            ));
        }
    }

    out.trim_end().to_string()
}

pub fn translation(original: &str, target_lang: &str, result: &ProviderResult) -> String {
    let translated = translate::translated_text(result).unwrap_or("N/A");
    format!("*Translation:*\n\nOriginal: {original}\nTranslated ({target_lang}): {translated}")
}

pub fn transcript(result: &ProviderResult) -> String {
    let text = display(result.data.as_ref().and_then(|d| d.get("transcript")));
    format!("*YouTube transcription:*\n\n{text}")
}

pub fn video_summary(result: &ProviderResult) -> String {
    let text = display(result.data.as_ref().and_then(|d| d.get("summary")));
    format!("*YouTube summary:*\n\n{text}")
}

/// A provider record under a heading; objects are pretty-printed JSON.
pub fn record(heading: &str, result: &ProviderResult) -> Result<String, SwitchboardError> {
    let body = match result.data.as_ref() {
        Some(Value::String(s)) => s.clone(),
        Some(value) => serde_json::to_string_pretty(value)?,
        None => "N/A".to_string(),
    };
    Ok(format!("*{heading}:*\n\n{body}"))
}

/// Chat replies are passed through untouched.
pub fn chat_reply(result: &ProviderResult) -> String {
    chat::reply_text(result)
        .map(str::to_string)
        .unwrap_or_else(|| result.summary.clone())
}

/// Strip markup so the text reads naturally when synthesized.
pub fn speakable(text: &str) -> String {
    text.lines()
        .map(|line| line.replace('*', "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_results_numbered_and_limited() {
        let hits: Vec<Value> = (1..=7)
            .map(|i| json!({"title": format!("T{i}"), "snippet": "s", "link": format!("https://x/{i}")}))
            .collect();
        let result = ProviderResult::ok("Found 7", Some(Value::Array(hits)));
        let text = search_results("rust", &result, 5);
        assert!(text.starts_with("*Search results for \"rust\":*"));
        assert!(text.contains("1. *T1*"));
        assert!(text.contains("5. *T5*"));
        assert!(!text.contains("T6"));
        assert!(text.contains("https://x/3"));
    }

    #[test]
    fn test_search_results_empty() {
        let result = ProviderResult::ok("Found 0", Some(json!([])));
        assert_eq!(
            search_results("nothing", &result, 5),
            "No search results found for \"nothing\"."
        );
    }

    #[test]
    fn test_weather_current_and_forecast() {
        let data = json!({
            "current": {"condition": "Sunny", "temperature": 21, "humidity": 40, "wind_speed": 12},
            "forecast": [
                {"date": "Mon", "condition": "Rain", "high": 18, "low": 10},
                {"date": "Tue", "condition": "Cloudy", "high": 19, "low": 11},
                {"date": "Wed", "condition": "Sunny", "high": 23, "low": 12},
                {"date": "Thu", "condition": "Storm", "high": 15, "low": 9}
            ]
        });
        let result = ProviderResult::ok("Weather for Paris: Sunny, 21°C", Some(data));
        let text = weather("Paris", &result);
        assert!(text.starts_with("*Weather for Paris:*"));
        assert!(text.contains("Current: Sunny"));
        assert!(text.contains("Temperature: 21°C"));
        assert!(text.contains("Wind: 12 km/h"));
        assert!(text.contains("- Mon: Rain, 18°/10°C"));
        assert!(text.contains("- Wed: Sunny, 23°/12°C"));
        assert!(!text.contains("Thu"));
    }

    #[test]
    fn test_weather_missing_fields_show_na() {
        let result = ProviderResult::ok("s", Some(json!({"current": {"condition": "Fog"}})));
        let text = weather("Lima", &result);
        assert!(text.contains("Humidity: N/A%"));
        assert!(!text.contains("Forecast"));
    }

    #[test]
    fn test_translation() {
        let result = ProviderResult::ok(
            "Translated to spanish: hola",
            Some(json!({"translatedText": "hola", "targetLanguage": "spanish"})),
        );
        assert_eq!(
            translation("hello", "spanish", &result),
            "*Translation:*\n\nOriginal: hello\nTranslated (spanish): hola"
        );
    }

    #[test]
    fn test_record_pretty_json() {
        let result = ProviderResult::ok("done", Some(json!({"name": "Jane"})));
        let text = record("Phone lookup results", &result).unwrap();
        assert_eq!(text, "*Phone lookup results:*\n\n{\n  \"name\": \"Jane\"\n}");

        let result = ProviderResult::ok("done", Some(json!("plain record")));
        assert!(record("Phone specifications", &result).unwrap().ends_with("plain record"));
    }

    #[test]
    fn test_video_texts() {
        let t = ProviderResult::ok("ok", Some(json!({"transcript": "hello world"})));
        assert_eq!(transcript(&t), "*YouTube transcription:*\n\nhello world");
        let s = ProviderResult::ok("ok", Some(json!({"summary": "short", "wordCount": 200})));
        assert_eq!(video_summary(&s), "*YouTube summary:*\n\nshort");
    }

    #[test]
    fn test_chat_reply() {
        let result = ProviderResult::ok("Chat reply received", Some(json!({"reply": "Hi!"})));
        assert_eq!(chat_reply(&result), "Hi!");
    }

    #[test]
    fn test_speakable_strips_markup() {
        assert_eq!(
            speakable("*Translation:*\n\nOriginal: hello"),
            "Translation:\nOriginal: hello"
        );
    }
}
