use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result, truncate_body},
    secrets::WEATHER_KEY_VAR,
};

const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";

/// Bio location is fixed; only the content source is user-configurable.
const DEFAULT_LOCATION: &str = "Bangkok";

/// Current-weather payload, loosely typed so partial responses still
/// format with fallbacks instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Option<ReportLocation>,
    pub current: Option<ReportCurrent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportLocation {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportCurrent {
    pub temp_c: Option<f64>,
    pub condition: Option<ReportCondition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportCondition {
    pub text: Option<String>,
}

/// External weather collaborator.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn get_weather(&self) -> Result<WeatherReport>;
}

/// weatherapi.com client for the fixed bio location.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    location: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            location: DEFAULT_LOCATION.to_string(),
            http: Client::new(),
        }
    }

    /// Key from the environment. An absent key yields an empty key that
    /// the API rejects at request time, which the updater's reporting
    /// wrapper then absorbs.
    pub fn from_env() -> Self {
        Self::new(std::env::var(WEATHER_KEY_VAR).unwrap_or_default())
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn get_weather(&self) -> Result<WeatherReport> {
        let url = format!("{WEATHER_API_BASE}/current.json");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", self.location.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await
            .map_err(|source| Error::Request {
                service: "weatherapi",
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Request {
            service: "weatherapi",
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Status {
                service: "weatherapi",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let report: WeatherReport = serde_json::from_str(&body)?;
        Ok(report)
    }
}

/// Render a report as the one-line bio string.
pub fn format_weather(report: &WeatherReport) -> String {
    let name = report
        .location
        .as_ref()
        .and_then(|l| l.name.as_deref())
        .unwrap_or("Unknown");

    let temp = report
        .current
        .as_ref()
        .and_then(|c| c.temp_c)
        .map_or_else(|| "N/A".to_string(), |t| t.to_string());

    let condition = report
        .current
        .as_ref()
        .and_then(|c| c.condition.as_ref())
        .and_then(|c| c.text.as_deref())
        .unwrap_or("Not available");

    format!("Location: {name} | Temperature: {temp}°C | Condition: {condition}")
}
