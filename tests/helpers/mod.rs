//! Shared helpers for the provider integration tests: a loopback HTTP
//! server that answers from a routing closure, and small payload builders.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tiny_http::{Response, Server};

// ---------------------------------------------------------------------------
// Mock provider
// ---------------------------------------------------------------------------

pub type Handler = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// Loopback HTTP server. Every request URL (path + query) is recorded and
/// answered by the handler on its own thread, so slow routes do not hold
/// up fast ones.
pub struct MockProvider {
    server: Arc<Server>,
    accept: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<String>>>,
    base: String,
}

impl MockProvider {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock provider"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock provider listens on TCP")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let accept = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let url = request.url().to_string();
                    requests.lock().unwrap().push(url.clone());
                    let handler = Arc::clone(&handler);
                    thread::spawn(move || {
                        let (status, body) = handler(&url);
                        let _ = request.respond(Response::from_string(body).with_status_code(status));
                    });
                }
            })
        };

        Self {
            server,
            accept: Some(accept),
            requests,
            base: format!("http://127.0.0.1:{}", port),
        }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(accept) = self.accept.take() {
            let _ = accept.join();
        }
    }
}

/// Value of query parameter `key` in a recorded request URL.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| urlencoding::decode(v).map(|s| s.into_owned()).unwrap_or_default())
    })
}

pub fn entries_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// WaterML JSON with one series per `(parameter code, values)` for `site`.
/// Points are 15 minutes apart starting 2024-05-01T12:00-06:00.
pub fn usgs_body(site: &str, series: &[(&str, &[&str])]) -> String {
    let series_json: Vec<String> = series
        .iter()
        .map(|(code, values)| {
            let points: Vec<String> = values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    format!(
                        r#"{{ "value": "{}", "qualifiers": ["P"], "dateTime": "2024-05-01T12:{:02}:00.000-06:00" }}"#,
                        v,
                        (i * 15) % 60
                    )
                })
                .collect();
            format!(
                r#"{{
                  "sourceInfo": {{ "siteCode": [{{ "value": "{}" }}] }},
                  "variable": {{ "variableCode": [{{ "value": "{}" }}], "noDataValue": -999999.0 }},
                  "values": [{{ "value": [{}] }}]
                }}"#,
                site,
                code,
                points.join(",")
            )
        })
        .collect();
    format!(r#"{{ "value": {{ "timeSeries": [{}] }} }}"#, series_json.join(","))
}

pub const HYDROMETRIC_HEADER: &str = "ID,Date,Water Level / Niveau d'eau (m),Grade,Symbol / Symbole,QA/QC,Discharge / Débit (cms),Grade,Symbol / Symbole,QA/QC";

/// Hourly CSV with one row per `(station, date, level, discharge)`.
pub fn hydrometric_csv(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut out = String::from(HYDROMETRIC_HEADER);
    out.push('\n');
    for (station, date, level, discharge) in rows {
        out.push_str(&format!("{},{},{},,,1,{},,,1\n", station, date, level, discharge));
    }
    out
}

pub const HTML_NOT_FOUND: &str =
    "<!DOCTYPE html>\n<html><head><title>404 Not Found</title></head>\n<body><h1>Not Found</h1></body></html>\n";

/// DWR telemetry page with one record per `(abbrev, measDateTime, value, units)`.
pub fn dwr_body(records: &[(&str, &str, f64, &str)]) -> String {
    let list: Vec<String> = records
        .iter()
        .map(|(abbrev, at, value, units)| {
            format!(
                r#"{{ "abbrev": "{}", "measDateTime": "{}", "parameter": "DISCHRG", "measValue": {}, "units": "{}" }}"#,
                abbrev, at, value, units
            )
        })
        .collect();
    format!(
        r#"{{ "PageNumber": 1, "PageCount": 1, "ResultCount": {}, "ResultDateTime": "2024-07-29T09:25:13-06:00", "ResultList": [{}] }}"#,
        records.len(),
        list.join(",")
    )
}
