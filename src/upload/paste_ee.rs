//! paste.ee backend.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShareError};
use crate::share::Expiration;
use crate::upload::{UploadReceipt, UploadService, ensure_success};

const DEFAULT_ENDPOINT: &str = "https://api.paste.ee/v1/pastes";
const DEFAULT_SITE: &str = "https://paste.ee";
const NAME: &str = "paste.ee";

#[derive(Serialize)]
struct CreatePaste<'a> {
    sections: [Section<'a>; 1],
}

#[derive(Serialize)]
struct Section<'a> {
    contents: &'a str,
}

#[derive(Deserialize)]
struct Created {
    id: String,
}

/// Uploads to paste.ee. Pastes are kept permanently.
///
/// The page lives at `{site}/p/{id}` and the raw content at `{site}/r/{id}`.
pub struct PasteEe {
    client: reqwest::Client,
    endpoint: String,
    site: String,
    token: Option<String>,
}

impl PasteEe {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            site: DEFAULT_SITE.to_string(),
            token: None,
        }
    }

    /// Send the given application key as `X-Auth-Token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use a different API endpoint and public site base.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>, site: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self.site = site.into().trim_end_matches('/').to_string();
        self
    }

    async fn create(&self, html: &str) -> Result<UploadReceipt> {
        let body = CreatePaste {
            sections: [Section { contents: html }],
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.header("X-Auth-Token", token.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;
        let response = ensure_success(NAME, response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ShareError::upload(NAME, e))?;
        parse_response(&self.site, &text)
    }
}

fn parse_response(site: &str, body: &str) -> Result<UploadReceipt> {
    let created: Created =
        serde_json::from_str(body).map_err(|e| ShareError::upload(NAME, e))?;

    Ok(UploadReceipt {
        url: format!("{site}/p/{}", created.id),
        view_url: format!("{site}/r/{}", created.id),
        service: NAME.to_string(),
        expiration: Expiration::Permanent,
    })
}

impl UploadService for PasteEe {
    fn name(&self) -> &str {
        NAME
    }

    fn upload<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<UploadReceipt>> {
        Box::pin(self.create(html))
    }
}
