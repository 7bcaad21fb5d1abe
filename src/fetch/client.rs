use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Request, Response};

/// Media types a dataset download may come back as, CSV preferred.
pub const DATASET_ACCEPT: &str = "text/csv, application/gzip;q=0.9, */*;q=0.1";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Transport used to download a remote dataset.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// `reqwest` client for dataset exports.
///
/// Open-data portals stream large CSV exports slowly, so the overall timeout
/// is generous. Transfer-level gzip is negotiated and decoded by reqwest; a
/// `.csv.gz` file served as-is is gunzipped later by the source reader.
pub struct DatasetClient(reqwest::Client);

impl DatasetClient {
    pub fn new() -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DATASET_ACCEPT));

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(inner))
    }
}

#[async_trait]
impl HttpClient for DatasetClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}
