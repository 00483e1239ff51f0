//! Runtime configuration.
//!
//! Configuration is read from a TOML file with three optional sections. Every field has a
//! default, so an empty file (or no file at all) gives the same behaviour as
//! [`Config::default`]. The repository ships `config/papersift.toml`, which spells out every
//! default.
//!
//! ```toml
//! [entrez]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/"
//! email = "me@example.org"
//! batch_size = 200
//!
//! [classifier]
//! company_patterns = ["pharm", "biotech", "\\binc\\b"]
//! academic_patterns = ["univ", "hospital"]
//!
//! [report]
//! delimiter = "\t"
//! ```
//!
//! Files are looked up by [`Config::load`]: an explicit path wins, otherwise
//! `<config dir>/papersift/config.toml` is used when it exists.

use super::*;

/// Default number of identifiers requested per EFetch call.
///
/// EFetch accepts up to 300 identifiers per GET request; 200 leaves headroom for long
/// identifiers in the query string.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Largest batch size accepted by [`Config::validate`].
pub const MAX_BATCH_SIZE: usize = 300;

/// Default E-utilities base URL.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// Default width the report shortens titles to.
pub const DEFAULT_TITLE_WIDTH: usize = 200;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// How to talk to the E-utilities endpoints
  pub entrez:     EntrezConfig,
  /// Keyword lists used to classify affiliations
  pub classifier: ClassifierConfig,
  /// How the report is rendered
  pub report:     ReportConfig,
}

/// Settings for the ESearch/EFetch client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrezConfig {
  /// Base URL the `esearch.fcgi` and `efetch.fcgi` endpoints are resolved against
  pub base_url:            String,
  /// Value of the NCBI `tool` parameter
  pub tool:                Option<String>,
  /// Value of the NCBI `email` parameter
  pub email:               Option<String>,
  /// NCBI API key, raises the request rate limit when present
  pub api_key:             Option<String>,
  /// `User-Agent` header sent with every request
  pub user_agent:          String,
  /// Identifiers per EFetch request
  pub batch_size:          usize,
  /// Timeout for the ESearch request, in seconds
  pub search_timeout_secs: u64,
  /// Timeout for each EFetch request, in seconds
  pub fetch_timeout_secs:  u64,
}

/// Keyword fragments for the affiliation classifier.
///
/// Each entry is a regular expression fragment. The fragments of one list are combined into a
/// single case-insensitive alternation, so entries must not rely on anchoring to the start or
/// end of the affiliation. Use `\b` where a keyword must stand on its own (e.g. `\binc\b` so
/// that "Lincoln" does not count as a company).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
  /// Fragments that indicate a company affiliation
  pub company_patterns:  Vec<String>,
  /// Fragments that indicate an academic affiliation, these take precedence
  pub academic_patterns: Vec<String>,
}

/// Settings for the rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
  /// Field delimiter, must be a single ASCII character
  pub delimiter:   char,
  /// Titles longer than this many characters are shortened
  pub title_width: usize,
}

impl Default for EntrezConfig {
  fn default() -> Self {
    Self {
      base_url:            DEFAULT_BASE_URL.to_string(),
      tool:                Some(env!("CARGO_PKG_NAME").to_string()),
      email:               None,
      api_key:             None,
      user_agent:          format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
      batch_size:          DEFAULT_BATCH_SIZE,
      search_timeout_secs: 30,
      fetch_timeout_secs:  60,
    }
  }
}

impl Default for ClassifierConfig {
  fn default() -> Self {
    Self {
      company_patterns:  DEFAULT_COMPANY_PATTERNS.iter().map(ToString::to_string).collect(),
      academic_patterns: DEFAULT_ACADEMIC_PATTERNS.iter().map(ToString::to_string).collect(),
    }
  }
}

impl Default for ReportConfig {
  fn default() -> Self { Self { delimiter: ',', title_width: DEFAULT_TITLE_WIDTH } }
}

impl EntrezConfig {
  /// Timeout applied to the ESearch request.
  pub fn search_timeout(&self) -> Duration { Duration::from_secs(self.search_timeout_secs) }

  /// Timeout applied to each EFetch request.
  pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs) }
}

impl Config {
  /// Parses and validates a configuration from TOML text.
  ///
  /// Missing sections and fields fall back to their defaults.
  ///
  /// # Examples
  ///
  /// ```
  /// use papersift::config::Config;
  ///
  /// let config = Config::from_toml_str("[report]\ndelimiter = \"\\t\"\n")?;
  /// assert_eq!(config.report.delimiter, '\t');
  /// assert_eq!(config.entrez.batch_size, 200);
  /// # Ok::<(), papersift::error::SiftError>(())
  /// ```
  pub fn from_toml_str(toml_str: &str) -> Result<Self> {
    let config: Config = toml::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a configuration file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml_str(&content)
  }

  /// Returns the platform specific location of the user configuration file.
  ///
  /// - On Linux: `~/.config/papersift/config.toml`
  /// - On macOS: `~/Library/Application Support/papersift/config.toml`
  /// - On Windows: `%APPDATA%\papersift\config.toml`
  pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
  }

  /// Loads the configuration for a run.
  ///
  /// An explicit `path` must exist. Without one, the file at [`Config::default_path`] is used
  /// if present, and the built-in defaults otherwise.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    if let Some(path) = path {
      return Self::from_path(path);
    }
    match Self::default_path() {
      Some(path) if path.is_file() => Self::from_path(path),
      _ => {
        debug!("No configuration file found, using defaults");
        Ok(Self::default())
      },
    }
  }

  /// Checks values that deserialize fine but cannot be used.
  pub fn validate(&self) -> Result<()> {
    let batch_size = self.entrez.batch_size;
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
      return Err(SiftError::Config(format!(
        "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
      )));
    }
    if !self.report.delimiter.is_ascii() {
      return Err(SiftError::Config(format!(
        "delimiter must be a single ASCII character, got {:?}",
        self.report.delimiter
      )));
    }
    if self.report.title_width == 0 {
      return Err(SiftError::Config("title_width must be greater than zero".to_string()));
    }
    if self.classifier.company_patterns.is_empty() {
      return Err(SiftError::Config("classifier needs at least one company pattern".to_string()));
    }
    Ok(())
  }
}
