//! Common test helpers shared across the integration test suite.

use std::path::PathBuf;

use codemeta_crosswalk::{Codemeta, CodemetaMetadata, Fetcher};

/// Absolute path to a file under `tests/data`.
pub fn data_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
        .display()
        .to_string()
}

/// Fetch `codemeta_test.json` and run the clean-up steps on it.
#[allow(dead_code)]
pub fn prepared_metadata() -> CodemetaMetadata {
    let fetcher = Fetcher::new().expect("Failed to build fetcher");
    let mut metadata = CodemetaMetadata::new();
    metadata
        .fetch(&fetcher, &[data_path("codemeta_test.json")])
        .expect("Failed to fetch codemeta_test.json");
    metadata.compute_names();
    metadata.remove_doubles();
    metadata.sort_persons();
    metadata
}

/// Typed view of [`prepared_metadata`].
#[allow(dead_code)]
pub fn prepared_codemeta() -> Codemeta {
    prepared_metadata()
        .to_codemeta()
        .expect("Failed to build typed codemeta")
}
