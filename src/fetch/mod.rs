//! Reading the raw dataset bytes from a local path or an HTTP URL.

mod client;

pub use client::{DATASET_ACCEPT, DatasetClient, HttpClient};

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Downloads `url` and returns the response body.
///
/// The request asks for CSV (or a gzip archive of it). An HTML body is
/// rejected: portals answer a bad export link with a web page and a 200.
///
/// # Errors
///
/// Fails on an unparseable URL, a transport error, a non-success status, or
/// an HTML response.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static(DATASET_ACCEPT));

    let resp = client.execute(req).await?.error_for_status()?;

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type.starts_with("text/html") {
        bail!("'{url}' returned an HTML page instead of a CSV export");
    }
    debug!(content_type, "Dataset response received");

    Ok(resp.bytes().await?.to_vec())
}

/// Loads the dataset bytes from a local file path or fetches them over HTTP,
/// then gunzips them if they are gzip-compressed.
#[tracing::instrument]
pub async fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let client = DatasetClient::new()?;
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source bytes received");

    decompress_if_gzipped(bytes)
}

/// Returns `bytes` unchanged unless they start with the gzip magic number.
pub fn decompress_if_gzipped(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut decoded = Vec::with_capacity(bytes.len() * 4);
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decoded)
        .context("failed to decompress gzip source")?;
    debug!(decoded = decoded.len(), "Gzip source decompressed");
    Ok(decoded)
}
