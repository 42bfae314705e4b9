//! Fetching metadata sources from local paths and URLs.
//!
//! A location is either a URL (`http`/`https`, or a `file://` URL that is
//! resolved to a local path) or a filesystem path, where a leading `~` is
//! expanded to the home directory. The content format is chosen from the
//! extension of the path: `.json` is parsed as JSON, `.yml`/`.yaml` as
//! YAML. Both land in the same [`serde_json::Value`] model.
//!
//! # Examples
//!
//! ```ignore
//! use codemeta_crosswalk::fetch::Fetcher;
//!
//! let fetcher = Fetcher::new()?;
//! let codemeta = fetcher.fetch_dict("codemeta.json")?;
//! assert!(codemeta.contains_key("name"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Serialization format of a metadata source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.json`
    Json,
    /// `.yml` or `.yaml`
    Yaml,
}

impl SourceFormat {
    /// Detect the format from the extension of a path.
    ///
    /// Returns `None` for any extension other than `json`, `yml` or `yaml`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// A classified metadata location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Fetched over HTTP(S)
    Remote(Url),
    /// Read from the local filesystem
    Local(PathBuf),
}

impl Location {
    /// Classify a location string.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidLocation`] for a `file://` URL that does
    /// not map to a local path.
    pub fn parse(location: &str) -> Result<Self, FetchError> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| FetchError::InvalidLocation(location.to_string())),
            _ => Ok(Self::Local(expand_home(location))),
        }
    }

    /// Path component used to detect the [`SourceFormat`].
    fn format_path(&self) -> PathBuf {
        match self {
            Self::Remote(url) => PathBuf::from(url.path()),
            Self::Local(path) => path.clone(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(location: &str) -> PathBuf {
    let rest = if location == "~" {
        Some("")
    } else {
        location.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(location),
    }
}

/// Resolves metadata locations into parsed values.
///
/// Holds one blocking HTTP client that is reused for every remote request.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetch a JSON or YAML source and return its top-level mapping.
    ///
    /// # Errors
    ///
    /// Fails if the location is unreachable, has an unsupported extension,
    /// does not parse, or does not hold a mapping.
    pub fn fetch_dict(&self, location: &str) -> Result<Map<String, Value>, FetchError> {
        match self.fetch_value(location)? {
            Value::Object(map) => Ok(map),
            _ => Err(FetchError::NotAMapping(location.to_string())),
        }
    }

    /// Fetch a JSON or YAML source and return it as a JSON value.
    ///
    /// # Errors
    ///
    /// Fails if the location is unreachable, has an unsupported extension,
    /// or does not parse.
    pub fn fetch_value(&self, location: &str) -> Result<Value, FetchError> {
        let parsed = Location::parse(location)?;
        let format = SourceFormat::from_path(&parsed.format_path())
            .ok_or_else(|| FetchError::UnsupportedExtension(location.to_string()))?;

        debug!(location, ?format, "fetching metadata source");

        let text = match &parsed {
            Location::Remote(url) => self.get_text(url, None)?,
            Location::Local(path) => read_local(path)?,
        };

        parse_source(location, &text, format)
    }

    /// Fetch a JSON document, asking the server for `application/json`.
    ///
    /// Unlike [`Fetcher::fetch_value`] the extension is not inspected, which
    /// makes this suitable for content-negotiated endpoints such as DOI
    /// resolvers.
    ///
    /// # Errors
    ///
    /// Fails if the location is unreachable or the body is not JSON.
    pub fn fetch_json(&self, location: &str) -> Result<Value, FetchError> {
        let text = match Location::parse(location)? {
            Location::Remote(url) => self.get_text(&url, Some("application/json"))?,
            Location::Local(path) => read_local(&path)?,
        };

        parse_source(location, &text, SourceFormat::Json)
    }

    /// Copy or download each location into `dest_dir`.
    ///
    /// Each target is named after the last `/`-separated segment of its
    /// location. Returns the written paths in input order.
    ///
    /// # Errors
    ///
    /// Fails on the first location that cannot be fetched or written.
    pub fn fetch_files<S: AsRef<str>>(
        &self,
        locations: &[S],
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let mut written = Vec::with_capacity(locations.len());

        for location in locations {
            let location = location.as_ref();
            let file_name = location.rsplit('/').next().unwrap_or(location);
            let target = dest_dir.join(file_name);

            debug!(location, target = %target.display(), "fetching file");

            match Location::parse(location)? {
                Location::Remote(url) => {
                    let bytes = self
                        .client
                        .get(url.clone())
                        .send()
                        .and_then(reqwest::blocking::Response::error_for_status)
                        .and_then(reqwest::blocking::Response::bytes)
                        .map_err(|source| FetchError::Http {
                            location: location.to_string(),
                            source,
                        })?;
                    fs::write(&target, &bytes).map_err(|source| io_error(&target, source))?;
                },
                Location::Local(path) => {
                    fs::copy(&path, &target).map_err(|source| io_error(&path, source))?;
                },
            }

            written.push(target);
        }

        Ok(written)
    }

    fn get_text(&self, url: &Url, accept: Option<&str>) -> Result<String, FetchError> {
        let mut request = self.client.get(url.clone());
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        request
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|source| FetchError::Http {
                location: url.to_string(),
                source,
            })
    }
}

fn read_local(path: &Path) -> Result<String, FetchError> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> FetchError {
    FetchError::Io {
        location: path.display().to_string(),
        source,
    }
}

/// Parse source text in the given format into a JSON value.
///
/// # Errors
///
/// Returns [`FetchError::Json`] or [`FetchError::Yaml`] if the text does not
/// parse.
pub fn parse_source(location: &str, text: &str, format: SourceFormat) -> Result<Value, FetchError> {
    match format {
        SourceFormat::Json => serde_json::from_str(text).map_err(|source| FetchError::Json {
            location: location.to_string(),
            source,
        }),
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|source| FetchError::Yaml {
            location: location.to_string(),
            source,
        }),
    }
}
