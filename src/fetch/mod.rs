pub mod api_client;
pub mod html_table;
use crate::{
    Result,
    config::Settings,
    dataset::{Dataset, Record, Value},
    error::Error,
};
use api_client::{ApiClient, http_client};
use reqwest::blocking::Response;
use std::time::Duration;
use tracing::{error, info, warn};
pub trait ExternalSource {
    fn fetch(&self, api_path: &str, scraping_url: Option<&str>) -> Option<Dataset>;
}
#[derive(Debug, Clone)]
pub struct Fetcher {
    base_url: String,
    timeout: Duration,
    table_index: usize,
}
impl Fetcher {
    pub fn new(settings: &Settings, table_index: usize) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            timeout: settings.timeout(),
            table_index,
        }
    }
    fn fetch_api(&self, api_path: &str) -> Result<Dataset> {
        let client = ApiClient::new(&self.base_url, self.timeout)?;
        let body = client.get(api_path, &[])?;
        let records = records_from_json(&body).ok_or_else(|| Error::Json {
            url: client.url_for(api_path),
            message: "expected a JSON object or an array of objects".to_string(),
        })?;
        Ok(Dataset::from_records(records))
    }
    fn scrape(&self, url: &str) -> Result<Dataset> {
        let client = http_client(self.timeout).map_err(|e| Error::http(url, e))?;
        let html = client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .and_then(Response::text)
            .map_err(|e| Error::http(url, e))?;
        let records = html_table::extract_table(&html, self.table_index)?;
        Ok(Dataset::from_records(records))
    }
}
impl ExternalSource for Fetcher {
    fn fetch(&self, api_path: &str, scraping_url: Option<&str>) -> Option<Dataset> {
        match self.fetch_api(api_path) {
            Ok(ds) => {
                info!(rows = ds.len(), api_path, "external data fetched from API");
                return Some(ds);
            }
            Err(e) => warn!(api_path, "API fetch failed, trying fallback: {e}"),
        }
        let url = scraping_url?;
        info!(%url, table_index = self.table_index, "scraping HTML table");
        self.scrape(url)
            .inspect(|ds| info!(rows = ds.len(), "external data scraped"))
            .inspect_err(|e| error!(%url, "scraping failed: {e}"))
            .ok()
    }
}
fn records_from_json(body: &serde_json::Value) -> Option<Vec<Record>> {
    match *body {
        serde_json::Value::Array(ref items) => items.iter().map(object_record).collect(),
        serde_json::Value::Object(_) => object_record(body).map(|r| vec![r]),
        _ => None,
    }
}
fn object_record(v: &serde_json::Value) -> Option<Record> {
    let map = v.as_object()?;
    Some(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect(),
    )
}
#[cfg(test)]
mod tests {
    use super::{ExternalSource, Fetcher, records_from_json, test_server};
    use crate::{config::Settings, dataset::Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    fn fetcher(base_url: String) -> Fetcher {
        let settings = Settings {
            api_base_url: base_url,
            api_timeout: 5,
            ..Settings::default()
        };
        Fetcher::new(&settings, 0)
    }
    #[test]
    fn api_array_of_objects_becomes_rows() {
        let server = test_server::serve(vec![test_server::json_ok(
            r#"[{"id": 1, "nome": "Alpha"}, {"id": 2, "nome": "Beta", "extra": true}]"#,
        )]);
        let ds = fetcher(server.base_url()).fetch("/v1/items", None).unwrap();
        assert_eq!(ds.columns(), ["id", "nome", "extra"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(1, "nome"), Some(&Value::text("Beta")));
        assert_eq!(ds.value(0, "extra"), Some(&Value::Null));
    }
    #[test]
    fn api_single_object_becomes_one_row() {
        let server = test_server::serve(vec![test_server::json_ok(r#"{"id": 7, "valor": 9.5}"#)]);
        let ds = fetcher(server.base_url()).fetch("item", None).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.value(0, "valor"), Some(&Value::Number(9.5)));
    }
    #[test]
    fn failing_api_falls_back_to_scraping() {
        let page = test_server::serve(vec![test_server::html_ok(
            "<html><body><table><tr><th>id</th><th>nome</th></tr><tr><td>1</td><td>Alpha</td></tr></table></body></html>",
        )]);
        let ds = fetcher(test_server::closed_port_url())
            .fetch("/v1/data", Some(&page.url("/page")))
            .unwrap();
        assert_eq!(ds.columns(), ["id", "nome"]);
        assert_eq!(ds.rows(), [vec![Value::text("1"), Value::text("Alpha")]]);
    }
    #[test]
    fn unrecognized_shape_without_fallback_is_no_data() {
        let server = test_server::serve(vec![test_server::json_ok("42")]);
        assert!(fetcher(server.base_url()).fetch("/v1/data", None).is_none());
    }
    #[test]
    fn scrape_failure_is_no_data() {
        let page = test_server::serve(vec![test_server::html_ok("<html><body>no tables</body></html>")]);
        let res = fetcher(test_server::closed_port_url()).fetch("/v1/data", Some(&page.url("/")));
        assert!(res.is_none());
    }
    #[test]
    fn arrays_with_non_objects_are_unrecognized() {
        assert!(records_from_json(&json!([{"id": 1}, 2])).is_none());
        assert!(records_from_json(&json!("text")).is_none());
        assert_eq!(records_from_json(&json!([])), Some(Vec::new()));
    }
}
