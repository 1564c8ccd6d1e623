//! Kakao Mobility directions adapter for per-leg distances and fares.

use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::traits::{Coordinate, Fare, RouteSummary, RouteSummaryProvider};

pub const KAKAO_API_KEY_ENV_VAR: &str = "KAKAO_API_KEY";
pub const KAKAO_BASE_URL_ENV_VAR: &str = "KAKAO_BASE_URL";

#[derive(Debug, Clone)]
pub struct KakaoConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apis-navi.kakaomobility.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl KakaoConfig {
    /// Reads the API key (required) and base URL (optional) from the environment.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var(KAKAO_API_KEY_ENV_VAR)?;
        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Ok(base_url) = std::env::var(KAKAO_BASE_URL_ENV_VAR) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct KakaoClient {
    config: KakaoConfig,
    client: reqwest::blocking::Client,
}

impl KakaoClient {
    pub fn new(config: KakaoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn directions_url(&self) -> String {
        format!("{}/v1/directions", self.config.base_url.trim_end_matches('/'))
    }
}

impl RouteSummaryProvider for KakaoClient {
    fn route_summary(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, ProviderError> {
        let origin = lon_lat(from);
        let destination = lon_lat(to);
        debug!(%origin, %destination, "requesting kakao directions");

        let response = self
            .client
            .get(self.directions_url())
            .header("Authorization", format!("KakaoAK {}", self.config.api_key))
            .query(&[("origin", &origin), ("destination", &destination)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DirectionsResponse = response.json()?;
        parsed.into_summary()
    }
}

/// Kakao expects `longitude,latitude`.
fn lon_lat(coord: Coordinate) -> String {
    format!("{},{}", coord.lon, coord.lat)
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

impl DirectionsResponse {
    /// First route's summary; a missing route or non-zero result code fails.
    fn into_summary(self) -> Result<RouteSummary, ProviderError> {
        let route = self.routes.into_iter().next().ok_or(ProviderError::NoRoute {
            code: -1,
            message: "response contained no routes".to_string(),
        })?;

        match (route.result_code, route.summary) {
            (0, Some(summary)) => Ok(RouteSummary {
                distance: summary.distance,
                fare: summary.fare,
            }),
            (code, _) => Err(ProviderError::NoRoute {
                code,
                message: route.result_msg,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    result_code: i32,
    #[serde(default)]
    result_msg: String,
    summary: Option<DirectionsSummary>,
}

#[derive(Debug, Deserialize)]
struct DirectionsSummary {
    distance: f64,
    #[serde(default)]
    fare: Fare,
}
