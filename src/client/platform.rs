//! Platform API client
//!
//! Provides `PlatformClient` for the handful of platform methods the connector
//! needs: locating uploaded artifacts and reading keyrings. Methods are called
//! as `POST {endpoint}/{method}` with a JSON body.

use super::{ArtifactStore, Auth};
use crate::adapter::Event;
use crate::maple::reference_from_keyring;

use async_trait::async_trait;
use eyre::{Context, Result, eyre};
use owo_colors::OwoColorize;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

/// Platform client for making API requests.
///
/// Requests to the platform carry the service account token; artifact
/// downloads go to pre-signed URLs and are sent without it.
#[derive(Clone, Debug)]
pub struct PlatformClient {
    client: Client,
    download_client: Client,
    endpoint: Url,
}

/// Entry of a `keyrings.list` response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyringSummary {
    pub id: String,
}

#[derive(Deserialize)]
struct LocateResponse {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct KeyringListResponse {
    #[serde(default)]
    keyrings: Vec<KeyringSummary>,
}

#[derive(Deserialize)]
struct KeyringGetResponse {
    #[serde(default)]
    keyring: Option<Value>,
}

impl PlatformClient {
    /// Create a new PlatformClient from an API endpoint and Auth.
    ///
    /// # Errors
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built
    pub fn try_new(endpoint: Url, auth: Auth) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Auth::Bearer(token) = auth {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
        }
        let client = Client::builder().default_headers(headers).build()?;
        let download_client = Client::builder().build()?;

        Ok(Self {
            client,
            download_client,
            endpoint,
        })
    }

    /// Create a client from the endpoint and token carried by an event
    ///
    /// # Errors
    /// Returns an error if the event has no service account token or no
    /// (valid) platform endpoint
    pub fn from_event(event: &Event) -> Result<Self> {
        let auth = match Auth::new(event.service_account_token().map(str::to_string)) {
            Auth::None => eyre::bail!(
                "Service account token not available (context.secrets.service_account_token)"
            ),
            auth => auth,
        };
        let endpoint = event
            .platform_endpoint()
            .ok_or_else(|| eyre!("Platform endpoint not available (execution_metadata.devrev_endpoint)"))?;
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid platform endpoint: {}", endpoint))?;

        Self::try_new(endpoint, auth)
    }

    /// Get the API endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolve an artifact id to a download URL via `artifacts.locate`
    pub async fn locate_artifact(&self, id: &str) -> Result<Url> {
        let response: LocateResponse = self
            .call("artifacts.locate", &json!({ "id": id }))
            .await?;
        let url = response
            .url
            .ok_or_else(|| eyre!("Failed to locate ZIP artifact"))?;
        Url::parse(&url).with_context(|| format!("Invalid artifact URL: {}", url))
    }

    /// Download the bytes behind a located artifact URL
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .download_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?
            .error_for_status()
            .context("Failed to download artifact")?;
        let bytes = response.bytes().await?;
        log::debug!("Downloaded {} byte(s)", bytes.len());
        Ok(bytes.to_vec())
    }

    /// List the keyrings of an external system via `keyrings.list`
    pub async fn list_keyrings(&self, external_system: &str) -> Result<Vec<KeyringSummary>> {
        let response: KeyringListResponse = self
            .call("keyrings.list", &json!({ "external_system": external_system }))
            .await?;
        Ok(response.keyrings)
    }

    /// Fetch a keyring's details via `keyrings.get`
    pub async fn get_keyring(&self, id: &str) -> Result<Option<Value>> {
        let response: KeyringGetResponse = self.call("keyrings.get", &json!({ "id": id })).await?;
        Ok(response.keyring)
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        let url = format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), method);
        Url::parse(&url).with_context(|| format!("Invalid method URL: {}", url))
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let url = self.method_url(method)?;
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            eyre::bail!("{} failed ({}): {}", method, status, text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", method))
    }
}

#[async_trait]
impl ArtifactStore for PlatformClient {
    async fn fetch_artifact(&self, id: &str) -> Result<Vec<u8>> {
        let url = self.locate_artifact(id).await?;
        log::info!("Downloading artifact {}", id.cyan());
        self.download(&url).await
    }

    async fn lookup_archive_reference(&self, external_system: &str) -> Result<Option<String>> {
        let keyrings = self.list_keyrings(external_system).await?;
        let Some(keyring) = keyrings.first() else {
            log::info!("No keyring found for external system {}", external_system);
            return Ok(None);
        };
        log::info!("Found keyring: {}", keyring.id.cyan());

        let Some(details) = self.get_keyring(&keyring.id).await? else {
            return Ok(None);
        };

        let reference = reference_from_keyring(&details);
        match &reference {
            Some(reference) => log::info!("Found archive reference in keyring: {}", reference),
            None => log::debug!(
                "Keyring data structure: {}",
                serde_json::to_string_pretty(&details)?
            ),
        }
        Ok(reference)
    }
}

impl std::fmt::Display for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint)
    }
}
