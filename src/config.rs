//! Run configuration.
//!
//! [`Settings`] is built once from the parsed command line (which already
//! folds in environment variables and `.env`) and passed by reference to
//! everything that needs it.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

use crate::cli::{Cli, Command};
use crate::error::Result;
use crate::fetch::expand_home;
use crate::model::parse_date;

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Pipeline progress
    Info,
    /// Everything, including rendered documents
    Debug,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// What the run produces, and where it goes.
///
/// A `None` path means standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Merged CodeMeta JSON
    Codemeta {
        /// Destination file
        path: Option<PathBuf>,
    },
    /// DataCite XML
    Datacite {
        /// Destination file
        path: Option<PathBuf>,
    },
    /// `CITATION.cff` YAML
    Cff {
        /// Destination file
        path: Option<PathBuf>,
    },
    /// RADAR deposit JSON
    Radar {
        /// Responsible person
        email: String,
        /// Backlink to the publication
        backlink: String,
        /// Destination file
        path: Option<PathBuf>,
    },
}

/// Immutable settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// CodeMeta sources, merged in order
    pub metadata_locations: Vec<String>,
    /// Sources whose `author` lists are appended
    pub creators_locations: Vec<String>,
    /// Sources whose `contributor` lists are appended
    pub contributors_locations: Vec<String>,
    /// Version to stamp on the record
    pub version: Option<String>,
    /// Release date, written to `dateModified`
    pub issued: NaiveDate,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Log destination; standard error when `None`
    pub log_file: Option<PathBuf>,
    /// Selected output
    pub output: Output,
}

impl Settings {
    /// Build settings from the parsed command line.
    ///
    /// `--issued` defaults to today's local date. Paths have a leading `~`
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MetadataError::InvalidDate`] if `--issued` is not a
    /// `YYYY-MM-DD` date.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let issued = match cli.issued.as_deref() {
            Some(value) => parse_date("issued", value)?,
            None => Local::now().date_naive(),
        };

        let output = match cli.command {
            Command::Codemeta { codemeta_path } => Output::Codemeta {
                path: codemeta_path.as_deref().map(expand_home),
            },
            Command::Datacite { datacite_path } => Output::Datacite {
                path: datacite_path.as_deref().map(expand_home),
            },
            Command::Cff { cff_path } => Output::Cff {
                path: cff_path.as_deref().map(expand_home),
            },
            Command::Radar {
                radar_email,
                radar_backlink,
                radar_path,
            } => Output::Radar {
                email: radar_email,
                backlink: radar_backlink,
                path: radar_path.as_deref().map(expand_home),
            },
        };

        Ok(Self {
            metadata_locations: cli.metadata_locations,
            creators_locations: cli.creators_locations,
            contributors_locations: cli.contributors_locations,
            version: cli.version,
            issued,
            log_level: cli.log_level,
            log_file: cli.log_file.as_deref().map(expand_home),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(args: &[&str]) -> Result<Settings> {
        let cli = Cli::try_parse_from(args).expect("Failed to parse arguments");
        Settings::from_cli(cli)
    }

    #[test]
    fn test_issued_and_version() {
        let settings = settings(&[
            "codemeta-crosswalk",
            "--metadata-location",
            "codemeta.json",
            "--issued",
            "2024-05-01",
            "--version",
            "1.0",
            "cff",
        ])
        .expect("Failed to build settings");

        assert_eq!(settings.issued, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(settings.version.as_deref(), Some("1.0"));
        assert_eq!(settings.output, Output::Cff { path: None });
    }

    #[test]
    fn test_invalid_issued_date() {
        let err = settings(&[
            "codemeta-crosswalk",
            "--metadata-location",
            "codemeta.json",
            "--issued",
            "yesterday",
            "datacite",
        ])
        .unwrap_err();
        assert!(matches!(err, crate::MetadataError::InvalidDate { .. }));
    }

    #[test]
    fn test_repeated_locations_keep_order() {
        let settings = settings(&[
            "codemeta-crosswalk",
            "--metadata-location",
            "a.json",
            "--metadata-location",
            "b.yml",
            "--creators-location",
            "authors.json",
            "--log-level",
            "debug",
            "codemeta",
            "--codemeta-path",
            "out.json",
        ])
        .expect("Failed to build settings");

        assert_eq!(settings.metadata_locations, vec!["a.json", "b.yml"]);
        assert_eq!(settings.creators_locations, vec!["authors.json"]);
        assert!(settings.contributors_locations.is_empty());
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(
            settings.output,
            Output::Codemeta {
                path: Some(PathBuf::from("out.json"))
            }
        );
    }

    #[test]
    fn test_radar_output() {
        let settings = settings(&[
            "codemeta-crosswalk",
            "--metadata-location",
            "codemeta.json",
            "radar",
            "--radar-email",
            "data@example.org",
            "--radar-backlink",
            "https://example.org/sim",
        ])
        .expect("Failed to build settings");

        assert_eq!(
            settings.output,
            Output::Radar {
                email: "data@example.org".to_string(),
                backlink: "https://example.org/sim".to_string(),
                path: None,
            }
        );
    }

    #[test]
    fn test_log_level_directive() {
        assert_eq!(LogLevel::default().directive(), "warn");
        assert_eq!(LogLevel::Debug.directive(), "debug");
    }
}
