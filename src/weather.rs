/*
 *  weather.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather report model and the forecast provider client
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use reqwest::{Client, header};
use std::fmt::{self, Display};
use std::time::Duration;
use log::{info, warn};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use flate2::read::GzDecoder;
use std::io::Read;

use crate::geoloc::{fetch_location, geocode};

pub const FORECAST_BASE_URL: &str = "https://api.pirateweather.net";

/// Temperature unit shown on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnit {
    F,
    C,
}

impl TempUnit {
    /// Provider unit system: "us" is Fahrenheit, everything else metric
    pub fn from_units_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "us" | "f" | "imperial" | "fahrenheit" => Some(TempUnit::F),
            "si" | "ca" | "uk" | "uk2" | "c" | "metric" | "celsius" => Some(TempUnit::C),
            _ => None,
        }
    }

    pub fn units_code(&self) -> &'static str {
        match self {
            TempUnit::F => "us",
            TempUnit::C => "si",
        }
    }
}

impl Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempUnit::F => write!(f, "F"),
            TempUnit::C => write!(f, "C"),
        }
    }
}

/// One day-card worth of forecast
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    /// Key into the icon sets, e.g. "rain"
    pub condition: String,
    /// May contain a line break
    pub summary: String,
    pub lo: i32,
    pub hi: i32,
}

impl DayForecast {
    /// Forecast whose summary comes from the condition description table
    pub fn new(date: NaiveDate, condition: &str, lo: i32, hi: i32) -> Self {
        Self {
            date,
            condition: condition.to_string(),
            summary: condition_summary(condition),
            lo,
            hi,
        }
    }
}

/// Everything the board shows
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub address: String,
    pub unit: TempUnit,
    pub temperature: i32,
    pub feels_like: i32,
    /// Relative humidity, percent
    pub humidity: Option<u8>,
    pub alert: Option<String>,
    /// Capture time, in the location's zone
    pub captured_at: DateTime<FixedOffset>,
    pub forecast: Vec<DayForecast>,
}

/// Board wording for a condition key; unknown keys are shown as-is.
pub fn condition_summary(condition: &str) -> String {
    match condition {
        "clear-day" => "Sunny",
        "clear-night" => "Clear",
        "rain" => "Rain",
        "snow" => "Snow",
        "sleet" => "Sleet",
        "wind" => "Windy",
        "fog" => "Fog",
        "cloudy" => "Cloudy",
        "partly-cloudy-day" | "partly-cloudy-night" => "Partly\nCloudy",
        other => other,
    }
    .to_string()
}

// Custom error type for weather API operations.
#[derive(Debug)]
pub enum WeatherApiError {
    HttpRequestError(reqwest::Error),
    DeserializationError(JsonError),
    ApiKeyError(String),
    GeolocationError(String),
    InvalidInput(String),
    ApiError(String),
    MissingData(String),
}

impl Display for WeatherApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherApiError::HttpRequestError(e) => write!(f, "HTTP request error: {}", e),
            WeatherApiError::DeserializationError(e) => write!(f, "JSON deserialization error: {}", e),
            WeatherApiError::ApiError(msg) => write!(f, "Forecast API error: {}", msg),
            WeatherApiError::ApiKeyError(msg) => write!(f, "Forecast API key required: {}", msg),
            WeatherApiError::GeolocationError(msg) => write!(f, "Geolocation error: {}", msg),
            WeatherApiError::MissingData(msg) => write!(f, "Missing weather data: {}", msg),
            WeatherApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for WeatherApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeatherApiError::HttpRequestError(e) => Some(e),
            WeatherApiError::DeserializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherApiError {
    fn from(err: reqwest::Error) -> Self {
        WeatherApiError::HttpRequestError(err)
    }
}

impl From<JsonError> for WeatherApiError {
    fn from(err: JsonError) -> Self {
        WeatherApiError::DeserializationError(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastResponse {
    /// Hours from UTC
    #[serde(default)]
    offset: f64,
    currently: Currently,
    daily: Daily,
    #[serde(default)]
    alerts: Vec<Alert>,
    #[serde(default)]
    flags: Option<Flags>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Currently {
    time: i64,
    temperature: f64,
    apparent_temperature: f64,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyPoint {
    time: i64,
    icon: String,
    temperature_min: f64,
    temperature_max: f64,
}

#[derive(Debug, Deserialize)]
struct Alert {
    title: String,
}

#[derive(Debug, Deserialize)]
struct Flags {
    units: String,
}

/// Map a forecast response body onto a report for `address`, keeping the first `days` days.
pub fn parse_forecast(
    body: &str,
    address: &str,
    requested: TempUnit,
    days: usize,
) -> Result<WeatherReport, WeatherApiError> {
    let resp: ForecastResponse = serde_json::from_str(body)?;

    let zone = FixedOffset::east_opt((resp.offset * 3600.0).round() as i32)
        .ok_or_else(|| WeatherApiError::MissingData(format!("bad utc offset {}", resp.offset)))?;
    let at = |secs: i64| {
        zone.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| WeatherApiError::MissingData(format!("bad timestamp {secs}")))
    };

    if resp.daily.data.len() < days {
        return Err(WeatherApiError::MissingData(format!(
            "{} daily entries, {} needed",
            resp.daily.data.len(),
            days
        )));
    }

    let unit = resp
        .flags
        .as_ref()
        .and_then(|f| TempUnit::from_units_code(&f.units))
        .unwrap_or(requested);

    let titles: Vec<&str> = resp.alerts.iter().map(|a| a.title.trim()).filter(|t| !t.is_empty()).collect();
    let alert = if titles.is_empty() { None } else { Some(titles.join(" / ")) };

    let forecast = resp
        .daily
        .data
        .iter()
        .take(days)
        .map(|d| {
            Ok(DayForecast::new(
                at(d.time)?.date_naive(),
                &d.icon,
                d.temperature_min.round() as i32,
                d.temperature_max.round() as i32,
            ))
        })
        .collect::<Result<Vec<_>, WeatherApiError>>()?;

    Ok(WeatherReport {
        address: address.to_string(),
        unit,
        temperature: resp.currently.temperature.round() as i32,
        feels_like: resp.currently.apparent_temperature.round() as i32,
        humidity: resp
            .currently
            .humidity
            .map(|h| (h * 100.0).round().clamp(0.0, 100.0) as u8),
        alert,
        captured_at: at(resp.currently.time)?,
        forecast,
    })
}

/// Forecast provider client (DarkSky-compatible API)
#[derive(Debug)]
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    units: TempUnit,
    client: Client,
}

impl WeatherClient {
    pub fn new(api_key: &str, units: TempUnit) -> Result<Self, WeatherApiError> {
        if api_key.trim().is_empty() {
            return Err(WeatherApiError::ApiKeyError("no key specified".to_string()));
        }
        Ok(Self {
            base_url: FORECAST_BASE_URL.to_string(),
            api_key: api_key.trim().to_string(),
            units,
            client: build_client(Duration::from_secs(2), Duration::from_secs(10))?,
        })
    }

    /// Point at another DarkSky-compatible host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve `location` and fetch a report with `days` forecast days.
    ///
    /// An empty location falls back to IP geolocation.
    pub async fn fetch_report(&self, location: &str, days: usize) -> Result<WeatherReport, WeatherApiError> {
        let place = if location.trim().is_empty() {
            info!("No location given. Attempting IP-based geolocation...");
            fetch_location(&self.client).await?
        } else {
            geocode(&self.client, location).await?
        };
        info!("Fetching forecast for {} ({:.4}, {:.4})", place.address, place.lat, place.lon);

        let url = format!("{}/forecast/{}/{:.4},{:.4}", self.base_url, self.api_key, place.lat, place.lon);
        let params = [
            ("units", self.units.units_code().to_string()),
            ("exclude", "minutely,hourly".to_string()),
        ];
        let body = self.send_with_retries(&url, &params, 3).await?;
        let report = parse_forecast(&body, &place.address, self.units, days)?;
        info!(
            "Forecast fetched: {}°{}, {} day(s){}",
            report.temperature,
            report.unit,
            report.forecast.len(),
            if report.alert.is_some() { ", alert active" } else { "" }
        );
        Ok(report)
    }

    async fn send_with_retries<T: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &T,
        max_retries: u8,
    ) -> Result<String, WeatherApiError> {
        let mut retries = 0;
        loop {
            match self.client.get(url).query(params).send().await {
                Ok(response) => {
                    let status = response.status();
                    let raw = response.bytes().await?;
                    let plain = decode_body(&raw);
                    if !status.is_success() {
                        return Err(WeatherApiError::ApiError(format!("{}: {}", status, plain.trim())));
                    }
                    return Ok(plain);
                }
                Err(e) => {
                    retries += 1;
                    if retries >= max_retries {
                        return Err(e.into());
                    }
                    warn!("Forecast request failed ({e}), retry {retries}/{max_retries}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}

/// Shared client setup: identify ourselves, ask for JSON
pub(crate) fn build_client(connect: Duration, total: Duration) -> Result<Client, WeatherApiError> {
    const VERSION: &str = concat!("RetroCast ", env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
    let mut headers = header::HeaderMap::new();
    headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
    headers.insert("Accept", header::HeaderValue::from_static("application/json"));
    headers.insert("Accept-Encoding", header::HeaderValue::from_static("gzip, deflate"));
    headers.insert("Connection", header::HeaderValue::from_static("close"));

    Ok(Client::builder()
        .connect_timeout(connect)
        .default_headers(headers)
        .timeout(total)
        .build()?)
}

/// Try to decode as gzip first, fall back to plain text if it fails
fn decode_body(raw: &[u8]) -> String {
    let mut decoder = GzDecoder::new(raw);
    let mut decoded = String::new();
    match decoder.read_to_string(&mut decoded) {
        Ok(_) => decoded,
        Err(_) => String::from_utf8_lossy(raw).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const BODY: &str = r#"{
        "latitude": 40.95, "longitude": -74.61, "timezone": "America/New_York", "offset": -4.0,
        "currently": {"time": 1564581600, "icon": "rain", "temperature": 75.2,
                      "apparentTemperature": 75.8, "humidity": 0.61},
        "daily": {"data": [
            {"time": 1564545600, "icon": "rain", "summary": "Rain.", "temperatureMin": 64.8, "temperatureMax": 80.1},
            {"time": 1564632000, "icon": "partly-cloudy-day", "temperatureMin": 64.0, "temperatureMax": 83.4},
            {"time": 1564718400, "icon": "cloudy", "temperatureMin": 65.0, "temperatureMax": 79.0},
            {"time": 1564804800, "icon": "rain", "temperatureMin": 64.0, "temperatureMax": 81.0},
            {"time": 1564891200, "icon": "hail", "temperatureMin": 60.0, "temperatureMax": 70.0}
        ]},
        "flags": {"units": "us"}
    }"#;

    #[test]
    fn test_parse_forecast_maps_fields() {
        let r = parse_forecast(BODY, "Lake Hopatcong 07849, NJ", TempUnit::C, 4).unwrap();
        assert_eq!(r.unit, TempUnit::F);
        assert_eq!((r.temperature, r.feels_like, r.humidity), (75, 76, Some(61)));
        assert_eq!(r.alert, None);
        assert_eq!(r.captured_at.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(r.captured_at.hour(), 10);
        assert_eq!(r.forecast.len(), 4);
        assert_eq!(r.forecast[0].date, NaiveDate::from_ymd_opt(2019, 7, 31).unwrap());
        assert_eq!(r.forecast[1].summary, "Partly\nCloudy");
        assert_eq!((r.forecast[0].lo, r.forecast[0].hi), (65, 80));
        assert_eq!(r.forecast[3].date.day(), 3);
    }

    #[test]
    fn test_parse_forecast_joins_alerts() {
        let body = BODY.replace(
            r#""flags""#,
            r#""alerts": [{"title": "Severe Thunderstorm Watch"}, {"title": "Flood Advisory"}], "flags""#,
        );
        let r = parse_forecast(&body, "x", TempUnit::F, 4).unwrap();
        assert_eq!(r.alert.as_deref(), Some("Severe Thunderstorm Watch / Flood Advisory"));
    }

    #[test]
    fn test_parse_forecast_short_daily_is_missing_data() {
        assert!(matches!(
            parse_forecast(BODY, "x", TempUnit::F, 6),
            Err(WeatherApiError::MissingData(_))
        ));
    }

    #[test]
    fn test_parse_forecast_garbage_is_deserialization_error() {
        assert!(matches!(
            parse_forecast("{\"nope\": 1}", "x", TempUnit::F, 4),
            Err(WeatherApiError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_parse_forecast_without_flags_uses_requested_unit() {
        let body = BODY.replace(r#""flags": {"units": "us"}"#, r#""flags": null"#);
        assert_eq!(parse_forecast(&body, "x", TempUnit::C, 1).unwrap().unit, TempUnit::C);
    }

    #[test]
    fn test_unknown_condition_summary_is_raw_key() {
        let r = parse_forecast(BODY, "x", TempUnit::F, 5).unwrap();
        assert_eq!(r.forecast[4].condition, "hail");
        assert_eq!(r.forecast[4].summary, "hail");
    }

    #[test]
    fn test_units_codes() {
        assert_eq!(TempUnit::from_units_code("US"), Some(TempUnit::F));
        assert_eq!(TempUnit::from_units_code("si"), Some(TempUnit::C));
        assert_eq!(TempUnit::from_units_code("kelvin"), None);
        assert_eq!(TempUnit::C.units_code(), "si");
        assert_eq!(TempUnit::F.to_string(), "F");
    }

    #[test]
    fn test_decode_body_gzip_and_plain() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"{\"a\":1}").unwrap();
        let gz = enc.finish().unwrap();
        assert_eq!(decode_body(&gz), "{\"a\":1}");
        assert_eq!(decode_body(b"plain"), "plain");
    }

    #[test]
    fn test_client_requires_key() {
        assert!(matches!(WeatherClient::new("  ", TempUnit::F), Err(WeatherApiError::ApiKeyError(_))));
    }
}
