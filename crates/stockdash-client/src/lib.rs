pub mod client_ext;
pub mod error;
pub mod schema;

pub use crate::client_ext::{endpoint, Backend};
pub use crate::error::{ClientError, Result};
pub use crate::schema::{Candle, Company, HistoryResult, Metrics, PredictionResult, Query};
pub use reqwest::StatusCode;

pub mod prelude {
    pub use crate::client_ext::Backend;
    pub use crate::schema::*;
    pub use reqwest::Client;

    pub fn build_client(user_agent: &str, timeout: std::time::Duration) -> crate::Result<Client> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(client)
    }
}
