//! NCBI E-utilities client.
//!
//! Two endpoints are used, both relative to [`EntrezConfig::base_url`]:
//!
//! - `esearch.fcgi` (JSON) turns a query into PubMed identifiers
//! - `efetch.fcgi` (XML) returns the full records for a comma separated identifier list
//!
//! Requests are plain GETs issued one at a time. A failed request, or one answered with a
//! non-success status, is returned as an error and nothing is retried.
//!
//! The [`LiteratureSource`] trait is the seam between the network and the rest of the
//! pipeline; [`EntrezClient`] is its only production implementation.

use url::Url;

use super::*;

/// Something that can resolve a query into identifiers and fetch the records behind them.
///
/// # Examples
///
/// A canned source, handy for exercising the pipeline offline:
///
/// ```
/// use async_trait::async_trait;
/// use papersift::{entrez::LiteratureSource, error::Result};
///
/// struct Canned;
///
/// #[async_trait]
/// impl LiteratureSource for Canned {
///   async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<String>> {
///     Ok(vec!["1".into()])
///   }
///
///   async fn fetch(&self, _ids: &[String]) -> Result<String> {
///     Ok("<PubmedArticleSet/>".into())
///   }
/// }
/// ```
#[async_trait]
pub trait LiteratureSource: Send + Sync {
  /// Returns up to `max_results` identifiers matching `query`, in relevance order.
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>>;

  /// Returns the raw XML payload holding the records for `ids`.
  async fn fetch(&self, ids: &[String]) -> Result<String>;
}

/// Client for the ESearch and EFetch endpoints.
#[derive(Debug, Clone)]
pub struct EntrezClient {
  /// Shared HTTP client, carries the `User-Agent`
  client:  reqwest::Client,
  /// Resolved `esearch.fcgi` URL
  esearch: Url,
  /// Resolved `efetch.fcgi` URL
  efetch:  Url,
  /// Remaining settings (tool, email, api key, timeouts)
  config:  EntrezConfig,
}

/// ESearch JSON envelope.
#[derive(Debug, Deserialize)]
struct ESearchResponse {
  /// The actual result
  esearchresult: ESearchResult,
}

/// The part of an ESearch result we use.
#[derive(Debug, Deserialize)]
struct ESearchResult {
  /// Total number of matches, which may exceed the identifiers returned
  #[serde(default)]
  count:  Option<String>,
  /// Matching identifiers
  #[serde(default)]
  idlist: Vec<String>,
  /// Set instead of `idlist` when the query is rejected
  #[serde(default, rename = "ERROR")]
  error:  Option<String>,
}

impl EntrezClient {
  /// Builds a client from its configuration.
  ///
  /// # Errors
  ///
  /// Fails when the base URL does not parse or the HTTP client cannot be constructed.
  pub fn new(config: EntrezConfig) -> Result<Self> {
    // `Url::join` replaces the last path segment unless the base ends with a slash.
    let mut base_url = config.base_url.clone();
    if !base_url.ends_with('/') {
      base_url.push('/');
    }
    let base = Url::parse(&base_url)?;

    let client = reqwest::Client::builder().user_agent(config.user_agent.clone()).build()?;

    let esearch = base.join("esearch.fcgi")?;
    let efetch = base.join("efetch.fcgi")?;
    Ok(Self { client, esearch, efetch, config })
  }

  /// The configuration this client was built from.
  pub fn config(&self) -> &EntrezConfig { &self.config }

  /// Parameters sent with every request: `db` plus the optional NCBI identification.
  fn common_params(&self) -> Vec<(&'static str, String)> {
    let mut params = vec![("db", "pubmed".to_string())];
    if let Some(tool) = &self.config.tool {
      params.push(("tool", tool.clone()));
    }
    if let Some(email) = &self.config.email {
      params.push(("email", email.clone()));
    }
    if let Some(api_key) = &self.config.api_key {
      params.push(("api_key", api_key.clone()));
    }
    params
  }

  /// Sends a GET and returns the body of a successful response.
  async fn get(
    &self,
    endpoint: &'static str,
    url: &Url,
    params: &[(&'static str, String)],
    timeout: Duration,
  ) -> Result<Vec<u8>> {
    let response = self.client.get(url.clone()).query(params).timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
      debug!("{endpoint} answered {status}");
      return Err(SiftError::HttpStatus { endpoint, status });
    }

    let body = response.bytes().await?;
    trace!("{endpoint} response: {}", String::from_utf8_lossy(&body));
    Ok(body.to_vec())
  }
}

#[async_trait]
impl LiteratureSource for EntrezClient {
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
    let mut params = self.common_params();
    params.push(("term", query.to_string()));
    params.push(("retmode", "json".to_string()));
    params.push(("retmax", max_results.to_string()));
    debug!("ESearch params: {params:?}");

    let body = self.get("esearch", &self.esearch, &params, self.config.search_timeout()).await?;
    let response: ESearchResponse = serde_json::from_slice(&body)?;
    let esearchresult = response.esearchresult;

    if let Some(error) = esearchresult.error {
      return Err(SiftError::ApiError(error));
    }

    info!(
      "ESearch returned {} IDs ({} total matches)",
      esearchresult.idlist.len(),
      esearchresult.count.as_deref().unwrap_or("unknown")
    );
    Ok(esearchresult.idlist)
  }

  async fn fetch(&self, ids: &[String]) -> Result<String> {
    let mut params = self.common_params();
    params.push(("id", ids.join(",")));
    params.push(("retmode", "xml".to_string()));
    debug!("EFetch for {} IDs", ids.len());

    let body = self.get("efetch", &self.efetch, &params, self.config.fetch_timeout()).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
  }
}
