#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # CodeMeta crosswalk
//!
//! Reads software metadata expressed as CodeMeta JSON-LD and re-renders it
//! for archival and publication services.
//!
//! ## Quick Start
//!
//! ```ignore
//! use codemeta_crosswalk::{cff, datacite, CodemetaMetadata, Fetcher};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new()?;
//! let mut metadata = CodemetaMetadata::new();
//! metadata.fetch(&fetcher, &["codemeta.json"])?;
//! metadata.compute_names();
//! metadata.remove_doubles();
//! metadata.sort_persons();
//!
//! let codemeta = metadata.to_codemeta()?;
//! println!("{}", datacite::codemeta_to_datacite_xml(&codemeta)?);
//! println!("{}", cff::codemeta_to_cff_yaml(&codemeta)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`codemeta`]: Aggregation of CodeMeta sources into one record
//! - [`model`]: Typed view over the record used by all renderers
//! - [`datacite`]: DataCite kernel-4 XML
//! - [`cff`]: Citation File Format 1.2.0 YAML
//! - [`radar`]: RADAR deposit JSON (RDDM 09)
//! - [`fetch`]: Loading JSON/YAML sources from paths and URLs
//! - [`config`] and [`cli`]: Command-line front end
//! - [`error`]: Error types and result type

pub mod cff;
pub mod cli;
pub mod codemeta;
pub mod config;
pub mod datacite;
pub mod error;
pub mod fetch;
pub mod model;
pub mod radar;

pub use codemeta::CodemetaMetadata;
pub use error::{FetchError, MetadataError, Result};
pub use fetch::Fetcher;
pub use model::Codemeta;
pub use radar::{radar_value, RadarContext};
