//! dpaste.com backend.

use futures::future::BoxFuture;

use crate::error::{Result, ShareError};
use crate::share::Expiration;
use crate::upload::{UploadReceipt, UploadService, ensure_success};

const DEFAULT_ENDPOINT: &str = "https://dpaste.com/api/";
const DEFAULT_EXPIRY_DAYS: u32 = 7;
const NAME: &str = "dpaste.com";

/// Uploads to dpaste.com, which deletes pastes after a configurable number
/// of days (7 by default).
///
/// The API takes a multipart form and answers with the paste URL as plain
/// text; appending `.txt` gives the raw content.
pub struct Dpaste {
    client: reqwest::Client,
    endpoint: String,
    expiry_days: u32,
}

impl Dpaste {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
        }
    }

    /// Post to a different API endpoint, e.g. a self-hosted instance.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_expiry_days(mut self, days: u32) -> Self {
        self.expiry_days = days;
        self
    }

    async fn create(&self, html: &str) -> Result<UploadReceipt> {
        let form = reqwest::multipart::Form::new()
            .text("content", html.to_string())
            .text("syntax", "html")
            .text("expiry_days", self.expiry_days.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;
        let response = ensure_success(NAME, response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;

        parse_response(&body, self.expiry_days)
    }
}

fn parse_response(body: &str, expiry_days: u32) -> Result<UploadReceipt> {
    let url = body.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ShareError::upload(
            NAME,
            format!("unexpected response {url:?}"),
        ));
    }

    Ok(UploadReceipt {
        url: url.to_string(),
        view_url: format!("{url}.txt"),
        service: NAME.to_string(),
        expiration: Expiration::Days(expiry_days),
    })
}

impl UploadService for Dpaste {
    fn name(&self) -> &str {
        NAME
    }

    fn upload<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<UploadReceipt>> {
        Box::pin(self.create(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text_url() {
        let receipt = parse_response("https://dpaste.com/ABC123XYZ\n", 7).unwrap();
        assert_eq!(receipt.url, "https://dpaste.com/ABC123XYZ");
        assert_eq!(receipt.view_url, "https://dpaste.com/ABC123XYZ.txt");
        assert_eq!(receipt.service, "dpaste.com");
        assert_eq!(receipt.expiration, Expiration::Days(7));
    }

    #[test]
    fn rejects_non_url_body() {
        let err = parse_response("<html>rate limited</html>", 7).unwrap_err();
        assert!(matches!(err, ShareError::Upload { .. }));
    }

    #[test]
    fn builder_overrides() {
        let dpaste = Dpaste::new(reqwest::Client::new())
            .with_endpoint("http://localhost:9000/api/")
            .with_expiry_days(1);
        assert_eq!(dpaste.endpoint, "http://localhost:9000/api/");
        assert_eq!(dpaste.expiry_days, 1);
        assert_eq!(dpaste.name(), "dpaste.com");
    }
}
