//! TeamCity Client - Implementation of the CI server ports over REST.
//!
//! Talks to the `/app/rest` API of a TeamCity-compatible server.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TeamCityConfig::new("https://ci.example.com")
//!     .with_token(token)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let client = TeamCityClient::new(config)?;
//! ```
//!
//! # Endpoints
//!
//! | Operation | Request |
//! |---|---|
//! | find root | `GET vcs-roots/id:<id>` |
//! | check interval | `GET vcs-roots/id:<id>` (`modificationCheckInterval` field) |
//! | set interval | `PUT vcs-roots/id:<id>/modificationCheckInterval` |
//! | list usages | `GET buildTypes?locator=vcsRoot:(id:<id>)` |
//! | force check | `POST vcs-root-instances/checkingForChangesQueue?locator=buildType:(id:<id>)` |

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::{BuildTypeId, VcsRootId};
use crate::domain::vcs::{BuildConfiguration, CheckInterval, VcsRoot};
use crate::ports::{BuildTypeStore, CiError, VcsRootStore};

/// Fields requested when reading a VCS root.
const ROOT_FIELDS: &str = "id,name,modificationCheckInterval";

/// Fields requested when listing build configurations.
const BUILD_TYPE_FIELDS: &str = "buildType(id,name,projectName,paused)";

/// Maximum number of body characters kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Configuration for the TeamCity client.
#[derive(Debug, Clone)]
pub struct TeamCityConfig {
    /// Server root URL, e.g. `https://ci.example.com`.
    pub base_url: String,
    /// Access token sent as a bearer token.
    token: Option<SecretString>,
    /// Request timeout.
    pub timeout: Duration,
}

impl TeamCityConfig {
    /// Creates a configuration for the given server without credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the access token.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// TeamCity REST client.
pub struct TeamCityClient {
    base_url: Url,
    token: Option<SecretString>,
    timeout: Duration,
    client: Client,
}

impl TeamCityClient {
    /// Creates a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns `CiError::Configuration` if the base URL is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(config: TeamCityConfig) -> Result<Self, CiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CiError::configuration(format!("invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(CiError::configuration(format!(
                "base URL must be http(s): {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CiError::configuration(e.to_string()))?;

        Ok(Self {
            base_url,
            token: config.token,
            timeout: config.timeout,
            client,
        })
    }

    /// Builds `<base>/app/rest/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CiError::configuration("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["app", "rest"])
            .extend(segments);
        Ok(url)
    }

    fn root_locator(id: &VcsRootId) -> String {
        format!("id:{}", id)
    }

    /// Adds auth and accept headers, sends, and maps transport errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, CiError> {
        let request = request.header(ACCEPT, "application/json");
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                CiError::Timeout {
                    timeout_secs: u32::try_from(self.timeout.as_secs()).unwrap_or(u32::MAX),
                }
            } else if e.is_connect() {
                CiError::network(format!("Connection failed: {}", e))
            } else {
                CiError::network(e.to_string())
            }
        })
    }

    /// Turns a non-2xx response into a `CiError`.
    ///
    /// 503 means the server is starting up or under maintenance and maps to
    /// `CiError::Unavailable`; every other status is `UnexpectedStatus`.
    async fn ensure_success(response: Response) -> Result<Response, CiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        tracing::warn!(status = status.as_u16(), "CI server returned an error status");
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(CiError::unavailable(body));
        }
        Err(CiError::unexpected_status(status.as_u16(), body))
    }

    async fn fetch_root(&self, id: &VcsRootId) -> Result<Option<VcsRootDto>, CiError> {
        let url = self.endpoint(&["vcs-roots", &Self::root_locator(id)])?;
        let response = self
            .send(self.client.get(url).query(&[("fields", ROOT_FIELDS)]))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::ensure_success(response).await?;
        let root = response
            .json::<VcsRootDto>()
            .await
            .map_err(|e| CiError::invalid_response(e.to_string()))?;
        Ok(Some(root))
    }
}

#[async_trait]
impl VcsRootStore for TeamCityClient {
    async fn find_by_external_id(&self, id: &VcsRootId) -> Result<Option<VcsRoot>, CiError> {
        match self.fetch_root(id).await? {
            Some(dto) => dto.into_domain().map(Some),
            None => Ok(None),
        }
    }

    async fn check_interval(&self, root: &VcsRoot) -> Result<CheckInterval, CiError> {
        let dto = self.fetch_root(root.id()).await?.ok_or_else(|| {
            CiError::unexpected_status(404, format!("VCS root {} disappeared", root.id()))
        })?;
        Ok(dto.check_interval())
    }

    async fn set_check_interval(
        &self,
        root: &VcsRoot,
        interval: CheckInterval,
    ) -> Result<(), CiError> {
        let url = self.endpoint(&[
            "vcs-roots",
            &Self::root_locator(root.id()),
            "modificationCheckInterval",
        ])?;
        // An empty value resets the root to the server default.
        let body = interval.seconds().map(|s| s.to_string()).unwrap_or_default();

        let response = self
            .send(
                self.client
                    .put(url)
                    .header(CONTENT_TYPE, "text/plain")
                    .body(body),
            )
            .await?;
        Self::ensure_success(response).await?;

        tracing::debug!(root = %root.id(), interval = %interval, "Updated check interval");
        Ok(())
    }
}

#[async_trait]
impl BuildTypeStore for TeamCityClient {
    async fn find_using_root(&self, root: &VcsRoot) -> Result<Vec<BuildConfiguration>, CiError> {
        let url = self.endpoint(&["buildTypes"])?;
        let locator = format!("vcsRoot:({})", Self::root_locator(root.id()));
        let response = self
            .send(
                self.client
                    .get(url)
                    .query(&[("locator", locator.as_str()), ("fields", BUILD_TYPE_FIELDS)]),
            )
            .await?;

        let response = Self::ensure_success(response).await?;
        let list = response
            .json::<BuildTypeListDto>()
            .await
            .map_err(|e| CiError::invalid_response(e.to_string()))?;

        list.build_type
            .into_iter()
            .map(BuildTypeDto::into_domain)
            .collect()
    }

    async fn force_check(&self, build: &BuildConfiguration) -> Result<(), CiError> {
        let url = self.endpoint(&["vcs-root-instances", "checkingForChangesQueue"])?;
        let locator = format!("buildType:(id:{})", build.id());
        let response = self
            .send(self.client.post(url).query(&[("locator", locator.as_str())]))
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcsRootDto {
    id: String,
    #[serde(default)]
    name: String,
    /// Absent when the root uses the server default.
    #[serde(default)]
    modification_check_interval: Option<u32>,
}

impl VcsRootDto {
    fn into_domain(self) -> Result<VcsRoot, CiError> {
        let id = VcsRootId::new(self.id).map_err(|e| CiError::invalid_response(e.to_string()))?;
        Ok(VcsRoot::new(id, self.name))
    }

    fn check_interval(&self) -> CheckInterval {
        match self.modification_check_interval {
            Some(secs) => CheckInterval::Explicit(secs),
            None => CheckInterval::Default,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildTypeListDto {
    #[serde(default)]
    build_type: Vec<BuildTypeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildTypeDto {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    project_name: String,
    #[serde(default)]
    paused: bool,
}

impl BuildTypeDto {
    fn into_domain(self) -> Result<BuildConfiguration, CiError> {
        let id =
            BuildTypeId::new(self.id).map_err(|e| CiError::invalid_response(e.to_string()))?;
        let build = BuildConfiguration::new(id, self.project_name, self.name);
        Ok(if self.paused { build.paused() } else { build })
    }
}
