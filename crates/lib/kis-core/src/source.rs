//! Fetches the example source files that catalog rows point at.
//!
//! Catalog URLs follow `.../examples_llm/<category>/<function_name>/<file>.py`.
//! The fetcher resolves them against a raw-content base URL, so the same rows
//! work whether they link to the repository browser or to raw files.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use std::{error::Error, fmt};

use kis_store::models::{FetchStatus, SourceFetchReport, SourceFile, SourceFiles};
use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const DEFAULT_SOURCE_BASE_URL: &str =
    "https://raw.githubusercontent.com/koreainvestment/open-trading-api/main/examples_llm";
pub const MSG_INVALID_SOURCE_URL: &str = "Invalid source URL format";
pub const MSG_NO_SOURCE_URL: &str = "No source URL provided";

static SOURCE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"examples_llm/([^/]+)/([^/]+)/(?:chk_)?([^/]+)\.py").expect("valid source URL pattern")
});

#[derive(Debug)]
pub enum SourceError {
    Http(reqwest::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

/// Which of the two files of an example is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The callable implementation, `<function_name>.py`.
    Main,
    /// The runnable check script, `chk_<function_name>.py`.
    Check,
}

impl SourceKind {
    fn file_name(self, function_name: &str) -> String {
        match self {
            Self::Main => format!("{function_name}.py"),
            Self::Check => format!("chk_{function_name}.py"),
        }
    }
}

/// Category and function directory extracted from a catalog URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocator {
    pub category: String,
    pub function_name: String,
}

impl SourceLocator {
    /// Builds the raw file URL under `base_url`.
    #[must_use]
    pub fn resolve(&self, base_url: &str, kind: SourceKind) -> String {
        format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.category,
            self.function_name,
            kind.file_name(&self.function_name)
        )
    }
}

/// Extracts the example location from a catalog URL.
#[must_use]
pub fn parse_source_url(url: &str) -> Option<SourceLocator> {
    let captures = SOURCE_URL_PATTERN.captures(url)?;
    Some(SourceLocator {
        category: captures[1].to_string(),
        function_name: captures[2].to_string(),
    })
}

/// Configuration for the source fetcher.
#[derive(Debug, Clone)]
pub struct SourceFetcherConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub request_delay: Duration,
}

impl SourceFetcherConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(100),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }
}

impl Default for SourceFetcherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_BASE_URL)
    }
}

/// HTTP client for example sources with a process-lifetime cache.
#[derive(Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    config: SourceFetcherConfig,
    cache: Arc<RwLock<HashMap<String, Arc<str>>>>,
}

impl SourceFetcher {
    /// Creates a fetcher.
    ///
    /// # Errors
    /// Returns `SourceError::Http` if the HTTP client cannot be built.
    pub fn new(config: SourceFetcherConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SourceFetcherConfig {
        &self.config
    }

    /// Fetches the main file and, when given, the check file.
    ///
    /// Blank URLs count as absent. Failures are reported per file; the
    /// aggregate status is `partial_success` when only some files arrived.
    pub async fn fetch(&self, url_main: Option<&str>, url_chk: Option<&str>) -> SourceFetchReport {
        let mut results = SourceFiles::default();
        if let Some(url) = non_blank(url_main) {
            results.main = Some(self.fetch_file(url, SourceKind::Main).await);
        }
        if let Some(url) = non_blank(url_chk) {
            results.check = Some(self.fetch_file(url, SourceKind::Check).await);
        }
        let report = summarize(results);
        info!(status = ?report.status, "{}", report.message);
        report
    }

    /// Fetches one file of an example identified by a catalog URL.
    pub async fn fetch_file(&self, url: &str, kind: SourceKind) -> SourceFile {
        let Some(locator) = parse_source_url(url) else {
            warn!(url, "{MSG_INVALID_SOURCE_URL}");
            return SourceFile {
                status: FetchStatus::Error,
                message: MSG_INVALID_SOURCE_URL.to_string(),
                content: String::new(),
                url: url.to_string(),
                resolved_url: None,
            };
        };

        let resolved = locator.resolve(&self.config.base_url, kind);
        match self.fetch_raw(&resolved).await {
            Ok(content) => SourceFile {
                status: FetchStatus::Success,
                message: "Fetched source successfully".to_string(),
                content: content.to_string(),
                url: url.to_string(),
                resolved_url: Some(resolved),
            },
            Err(err) => {
                warn!(url = %resolved, error = %err, "source fetch failed");
                SourceFile {
                    status: FetchStatus::Error,
                    message: format!("Failed to fetch source: {err}"),
                    content: String::new(),
                    url: url.to_string(),
                    resolved_url: Some(resolved),
                }
            }
        }
    }

    async fn fetch_raw(&self, resolved: &str) -> Result<Arc<str>, SourceError> {
        let cached = self.cache.read().await.get(resolved).cloned();
        if let Some(content) = cached {
            debug!(url = resolved, "source cache hit");
            return Ok(content);
        }

        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
        let body = self
            .client
            .get(resolved)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let content: Arc<str> = Arc::from(body);
        self.cache
            .write()
            .await
            .insert(resolved.to_string(), content.clone());
        Ok(content)
    }
}

fn non_blank(url: Option<&str>) -> Option<&str> {
    url.filter(|value| !value.trim().is_empty())
}

fn summarize(results: SourceFiles) -> SourceFetchReport {
    let total = results.iter().count();
    if total == 0 {
        return SourceFetchReport {
            status: FetchStatus::Error,
            message: MSG_NO_SOURCE_URL.to_string(),
            results,
        };
    }

    let succeeded = results
        .iter()
        .filter(|file| file.status == FetchStatus::Success)
        .count();
    let (status, message) = if succeeded == total {
        (
            FetchStatus::Success,
            format!("Fetched all sources ({succeeded}/{total})"),
        )
    } else if succeeded > 0 {
        (
            FetchStatus::PartialSuccess,
            format!("Fetched some sources ({succeeded}/{total})"),
        )
    } else {
        (
            FetchStatus::Error,
            format!("Failed to fetch any source (0/{total})"),
        )
    };

    SourceFetchReport {
        status,
        message,
        results,
    }
}
