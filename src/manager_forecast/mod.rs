use std::time::Duration;
use log::debug;
use reqwest::blocking::{Client, Request};
use serde_json::Value;
use thiserror::Error;
use crate::config::ForecastParameters;

const API_KEY_HEADER: &str = "X-Yandex-API-Key";

/// Struct for fetching weather forecasts from the forecast API
pub struct Forecast {
    client: Client,
    url: String,
    limit: u8,
    api_key: String,
}

impl Forecast {
    /// Returns a forecast struct ready for fetching weather forecasts
    ///
    /// # Arguments
    ///
    /// * 'config' - forecast API configuration
    pub fn new(config: &ForecastParameters) -> Result<Forecast, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let api_key = config.api_key.clone()
            .ok_or(ForecastError::MissingApiKey)?;

        Ok(Forecast {
            client,
            url: config.url.clone(),
            limit: config.limit,
            api_key,
        })
    }

    /// Retrieves a daily forecast for the given coordinates and returns the decoded
    /// response body as is
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'long' - longitude of the location
    pub fn fetch(&self, lat: f64, long: f64) -> Result<Value, ForecastError> {
        let request = self.request(lat, long)?;
        debug!("Requesting forecast: {}", request.url());

        let json = self.client
            .execute(request)?
            .error_for_status()?
            .text()?;

        let document: Value = serde_json::from_str(&json)?;

        Ok(document)
    }

    /// Builds the forecast request
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'long' - longitude of the location
    fn request(&self, lat: f64, long: f64) -> Result<Request, ForecastError> {
        let request = self.client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", long.to_string()),
                ("limit", self.limit.to_string()),
                ("hours", "false".to_string()),
            ])
            .build()?;

        Ok(request)
    }
}

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("MissingApiKey")]
    MissingApiKey,
    #[error("DocumentError: {0}")]
    DocumentError(#[from] serde_json::Error),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(api_key: Option<&str>) -> ForecastParameters {
        ForecastParameters {
            url: "https://api.weather.yandex.ru/v2/forecast".to_string(),
            limit: 7,
            api_key: api_key.map(String::from),
        }
    }

    #[test]
    fn request_carries_coordinates_and_key() {
        let forecast = Forecast::new(&parameters(Some("secret"))).unwrap();

        let request = forecast.request(55.7558, 37.6176).unwrap();
        let pairs: Vec<(String, String)> = request.url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().host_str(), Some("api.weather.yandex.ru"));
        assert_eq!(request.url().path(), "/v2/forecast");
        assert_eq!(pairs, vec![
            ("lat".to_string(), "55.7558".to_string()),
            ("lon".to_string(), "37.6176".to_string()),
            ("limit".to_string(), "7".to_string()),
            ("hours".to_string(), "false".to_string()),
        ]);
        assert_eq!(request.headers().get(API_KEY_HEADER).unwrap(), "secret");
    }

    #[test]
    fn missing_api_key_is_an_error() {
        assert!(matches!(Forecast::new(&parameters(None)), Err(ForecastError::MissingApiKey)));
    }

    #[test]
    fn unreachable_endpoint_is_a_network_error() {
        let mut params = parameters(Some("secret"));
        params.url = "http://127.0.0.1:9/v2/forecast".to_string();
        let forecast = Forecast::new(&params).unwrap();

        assert!(matches!(forecast.fetch(48.7, 44.5166), Err(ForecastError::NetworkError(_))));
    }
}
