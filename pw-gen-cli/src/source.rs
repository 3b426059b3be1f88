use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::Value;

/// Seed list used by the original tool.
pub(crate) const DEFAULT_SEED_URL: &str = "https://hasteb.in/raw/evaguten";

/// Downloads a seed list and parses it as JSON.
///
/// The body is expected to be a JSON array of strings; its shape is checked
/// later, when the value is turned into a seed.
pub(crate) fn fetch_seeds(url: &str, timeout: Duration) -> Result<Value> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .context("unable to build HTTP client")?;

    info!("Fetching seeds from {url}");
    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("request to {url} failed"))?
        .text()
        .with_context(|| format!("unable to read response body from {url}"))?;
    debug!("Received {} bytes", body.len());

    serde_json::from_str(&body).with_context(|| format!("response from {url} is not valid JSON"))
}

/// Reads a seed file.
///
/// - JSON documents (a string or an array of strings) are returned as is
/// - Anything else is read as plain text, one seed per line
pub(crate) fn read_seed_file<P: AsRef<Path>>(filename: P) -> Result<Value> {
    let path = filename.as_ref();
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .with_context(|| format!("unable to read {}", path.display()))?;

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(value),
        Err(err) => {
            debug!("{} is not JSON ({err}), reading it line by line", path.display());
            Ok(Value::Array(
                contents.lines().map(|line| Value::String(line.to_owned())).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn json_file_is_parsed() {
        let file = write_temp(r#"["alpha", "beta"]"#);
        let value = read_seed_file(file.path()).unwrap();
        assert_eq!(value, serde_json::json!(["alpha", "beta"]));
    }

    #[test]
    fn plain_file_is_read_per_line() {
        let file = write_temp("alpha\nbeta\r\ngamma");
        let value = read_seed_file(file.path()).unwrap();
        assert_eq!(value, serde_json::json!(["alpha", "beta", "gamma"]));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_seed_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("unable to read"));
    }
}
