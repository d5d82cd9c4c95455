//! rentry.co backend.

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::error::{Result, ShareError};
use crate::share::Expiration;
use crate::upload::{UploadReceipt, UploadService, ensure_success};

const DEFAULT_ENDPOINT: &str = "https://rentry.co/api/new";
const NAME: &str = "rentry.co";

#[derive(Deserialize)]
struct Created {
    url: String,
}

/// Uploads to rentry.co. Pastes are kept permanently; `{url}/raw` serves the
/// content.
pub struct Rentry {
    client: reqwest::Client,
    endpoint: String,
}

impl Rentry {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn create(&self, html: &str) -> Result<UploadReceipt> {
        let form = reqwest::multipart::Form::new().text("text", html.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;
        let response = ensure_success(NAME, response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;
        parse_response(&text)
    }
}

fn parse_response(body: &str) -> Result<UploadReceipt> {
    let created: Created = serde_json::from_str(body).map_err(|e| ShareError::upload(NAME, e))?;
    let url = created.url.trim_end_matches('/').to_string();

    Ok(UploadReceipt {
        view_url: format!("{url}/raw"),
        url,
        service: NAME.to_string(),
        expiration: Expiration::Permanent,
    })
}

impl UploadService for Rentry {
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
    fn parses_url_into_raw_view() {
        let receipt = parse_response(r#"{"status":"200","url":"https://rentry.co/abcd","edit_code":"x"}"#)
            .unwrap();
        assert_eq!(receipt.url, "https://rentry.co/abcd");
        assert_eq!(receipt.view_url, "https://rentry.co/abcd/raw");
        assert_eq!(receipt.service, "rentry.co");
    }

    #[test]
    fn malformed_json_is_an_upload_error() {
        assert!(matches!(
            parse_response("<html>error</html>"),
            Err(ShareError::Upload { .. })
        ));
    }
}
