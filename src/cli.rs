//! Command-line interface.
//!
//! Every command runs the same preparation pipeline over the CodeMeta
//! sources and then renders one output format:
//!
//! ```text
//! fetch → fetch_authors → fetch_contributors
//!       → compute_names → remove_doubles → sort_persons
//!       → dateModified / version
//! ```
//!
//! Options can also be given as upper-case environment variables (for
//! example `METADATA_LOCATIONS`, space-separated) or in a `.env` file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cff::codemeta_to_cff_yaml;
use crate::codemeta::CodemetaMetadata;
use crate::config::{LogLevel, Output, Settings};
use crate::datacite::codemeta_to_datacite_xml;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::radar::{codemeta_to_radar_json, RadarContext};

/// Convert CodeMeta software metadata into DataCite, CFF and RADAR documents.
#[derive(Parser, Debug, Clone)]
#[command(name = "codemeta-crosswalk", disable_version_flag = true)]
pub struct Cli {
    /// Locations of the CodeMeta JSON/YAML files, merged in order
    #[arg(
        long = "metadata-location",
        env = "METADATA_LOCATIONS",
        value_delimiter = ' ',
        required = true
    )]
    pub metadata_locations: Vec<String>,

    /// Locations of CodeMeta files whose authors are appended
    #[arg(
        long = "creators-location",
        env = "CREATORS_LOCATIONS",
        value_delimiter = ' '
    )]
    pub creators_locations: Vec<String>,

    /// Locations of CodeMeta files whose contributors are appended
    #[arg(
        long = "contributors-location",
        env = "CONTRIBUTORS_LOCATIONS",
        value_delimiter = ' '
    )]
    pub contributors_locations: Vec<String>,

    /// Version of the resource
    #[arg(long, env = "VERSION")]
    pub version: Option<String>,

    /// Release date (YYYY-MM-DD), defaults to today
    #[arg(long, env = "ISSUED")]
    pub issued: Option<String>,

    /// Log level (ERROR, WARN, INFO or DEBUG)
    #[arg(
        long,
        env = "LOG_LEVEL",
        value_enum,
        ignore_case = true,
        default_value = "WARN"
    )]
    pub log_level: LogLevel,

    /// Path to the log file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<String>,

    /// Output to produce
    #[command(subcommand)]
    pub command: Command,
}

/// Output commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the merged CodeMeta record
    Codemeta {
        /// Path to the CodeMeta JSON output file
        #[arg(long, env = "CODEMETA_PATH")]
        codemeta_path: Option<String>,
    },
    /// Write DataCite kernel-4 XML
    Datacite {
        /// Path to the DataCite XML output file
        #[arg(long, env = "DATACITE_PATH")]
        datacite_path: Option<String>,
    },
    /// Write a CITATION.cff file
    Cff {
        /// Path to the CFF output file
        #[arg(long, env = "CFF_PATH")]
        cff_path: Option<String>,
    },
    /// Write the RADAR deposit metadata
    Radar {
        /// Email of the person responsible for the deposit
        #[arg(long, env = "RADAR_EMAIL")]
        radar_email: String,
        /// Backlink to the publication
        #[arg(long, env = "RADAR_BACKLINK")]
        radar_backlink: String,
        /// Path to the RADAR JSON output file
        #[arg(long, env = "RADAR_PATH")]
        radar_path: Option<String>,
    },
}

/// Run the command selected in `settings`.
///
/// # Errors
///
/// Any fetch, conversion or write failure aborts the run; nothing is
/// written for a failed conversion.
pub fn run(settings: &Settings) -> Result<()> {
    let fetcher = Fetcher::new()?;
    let metadata = prepare(settings, &fetcher)?;

    match &settings.output {
        Output::Codemeta { path } => match path {
            Some(path) => metadata.write(path),
            None => emit(&metadata.to_json()?, None),
        },
        Output::Datacite { path } => {
            let xml = codemeta_to_datacite_xml(&metadata.to_codemeta()?)?;
            emit(&xml, path.as_deref())
        },
        Output::Cff { path } => {
            let yaml = codemeta_to_cff_yaml(&metadata.to_codemeta()?)?;
            emit(&yaml, path.as_deref())
        },
        Output::Radar {
            email,
            backlink,
            path,
        } => {
            let context = RadarContext::new(email.as_str(), backlink.as_str());
            let json = codemeta_to_radar_json(&metadata.to_codemeta()?, &context)?;
            emit(&json, path.as_deref())
        },
    }
}

/// Fetch and clean up the CodeMeta record described by `settings`.
///
/// # Errors
///
/// Returns [`crate::MetadataError::Fetch`] if any source cannot be fetched.
pub fn prepare(settings: &Settings, fetcher: &Fetcher) -> Result<CodemetaMetadata> {
    let mut metadata = CodemetaMetadata::new();

    metadata.fetch(fetcher, &settings.metadata_locations)?;
    metadata.fetch_authors(fetcher, &settings.creators_locations)?;
    metadata.fetch_contributors(fetcher, &settings.contributors_locations)?;

    metadata.compute_names();
    metadata.remove_doubles();
    metadata.sort_persons();

    metadata.set(
        "dateModified",
        settings.issued.format("%Y-%m-%d").to_string(),
    );
    if let Some(version) = &settings.version {
        metadata.set("version", version.clone());
    }

    info!(
        sources = settings.metadata_locations.len(),
        "prepared codemeta record"
    );
    Ok(metadata)
}

fn emit(document: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "writing output");
            fs::write(path, document)?;
        },
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            if !document.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        },
    }
    Ok(())
}
