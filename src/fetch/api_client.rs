use crate::{Result, error::Error};
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}
impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = http_client(timeout).map_err(|e| Error::http(base_url, e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
    pub fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = self.url_for(path);
        debug!(%url, ?params, "GET");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .and_then(Response::error_for_status)
            .inspect_err(|e| error!(%url, "GET failed: {e}"))
            .map_err(|e| Error::http(&url, e))?;
        decode_json(&url, response)
    }
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "the pipeline only reads from the API")
    )]
    pub fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<serde_json::Value> {
        let url = self.url_for(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .and_then(Response::error_for_status)
            .inspect_err(|e| error!(%url, "POST failed: {e}"))
            .map_err(|e| Error::http(&url, e))?;
        decode_json(&url, response)
    }
}
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
fn decode_json(url: &str, response: Response) -> Result<serde_json::Value> {
    let body = response.text().map_err(|e| Error::http(url, e))?;
    serde_json::from_str(&body).map_err(|e| Error::Json {
        url: url.to_string(),
        message: e.to_string(),
    })
}
