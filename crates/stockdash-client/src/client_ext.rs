use crate::error::{ClientError, Result};
use crate::schema::{Company, HistoryResult, PredictionResult, Query};
use log::{debug, trace};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::future::Future;

pub const COMPANIES: &str = "api/companies";
pub const HISTORY: &str = "api/history";
pub const PREDICT_NEXT: &str = "api/predict/next";

/// The analytics backend, as seen by the dashboard.
///
/// Every method takes the base address explicitly, so a change of address applies to the very
/// next request without rebuilding the client.
pub trait Backend: Send + Sync {
    /// `GET /api/companies`
    fn companies(&self, base: &str) -> impl Future<Output = Result<Vec<Company>>> + Send;

    /// `GET /api/history?symbol=..&period=..&interval=..`
    fn history(
        &self,
        base: &str,
        query: &Query,
    ) -> impl Future<Output = Result<HistoryResult>> + Send;

    /// `GET /api/predict/next?symbol=..&period=..&interval=..`
    fn predict(
        &self,
        base: &str,
        query: &Query,
    ) -> impl Future<Output = Result<PredictionResult>> + Send;
}

/// Join a base address and an endpoint path, tolerating a trailing `/` on the base.
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
impl Backend for Client {
    async fn companies(&self, base: &str) -> Result<Vec<Company>> {
        fetch_de(self, self.get(endpoint(base, COMPANIES))).await
    }

    async fn history(&self, base: &str, query: &Query) -> Result<HistoryResult> {
        let history: HistoryResult = fetch_de(self, request(self, base, HISTORY, query)).await?;
        check_symbol(&query.symbol, history.symbol.as_deref())?;
        Ok(history)
    }

    async fn predict(&self, base: &str, query: &Query) -> Result<PredictionResult> {
        let prediction: PredictionResult =
            fetch_de(self, request(self, base, PREDICT_NEXT, query)).await?;
        check_symbol(&query.symbol, prediction.symbol.as_deref())?;
        Ok(prediction)
    }
}

fn request(client: &Client, base: &str, path: &str, query: &Query) -> RequestBuilder {
    client.get(endpoint(base, path)).query(query)
}

/// Send the request and deserialize a successful response body into `D`.
async fn fetch_de<D>(client: &Client, request: RequestBuilder) -> Result<D>
where
    D: DeserializeOwned,
{
    let request = request.build()?;
    let url = request.url().to_string();

    trace!("GET {url}");
    let response = client.execute(request).await.map_err(|e| {
        debug!("failed fetching response from {url}: {e}");
        e
    })?;

    let status = response.status();
    if !status.is_success() {
        debug!("{url} responded with {status}");
        return Err(ClientError::Status { url, status });
    }

    // read the full body first, so a bad payload can be reported alongside its URL
    let body = response.bytes().await?;
    trace!("deserializing {} bytes from {url}", body.len());
    serde_json::from_slice::<D>(&body).map_err(|source| {
        debug!("failed deserializing from {url}: {source}");
        ClientError::Decode { url, source }
    })
}

/// The backend echoes the requested symbol; anything else means the payload belongs to
/// another company.
fn check_symbol(expected: &str, found: Option<&str>) -> Result<()> {
    match found {
        Some(found) if !found.eq_ignore_ascii_case(expected) => Err(ClientError::SymbolMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}
