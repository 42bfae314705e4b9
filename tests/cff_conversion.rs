//! CFF rendering of the shared CodeMeta fixture.

mod common;

use codemeta_crosswalk::cff::{codemeta_to_cff, codemeta_to_cff_yaml, CffDocument, CffNumber};
use common::prepared_codemeta;

#[test]
fn test_fixture_document() {
    let cff = codemeta_to_cff(&prepared_codemeta()).expect("Failed to convert");

    assert_eq!(cff.title.as_deref(), Some("Simulation Toolkit"));
    assert_eq!(cff.doi.as_deref(), Some("10.5281/zenodo.1234567"));
    assert_eq!(cff.url.as_deref(), Some("https://example.org/toolkit"));
    assert_eq!(cff.license.as_deref(), Some("MIT License"));
    assert_eq!(cff.license_url.as_deref(), Some("https://spdx.org/licenses/MIT"));
    assert_eq!(
        cff.repository_code.as_deref(),
        Some("https://git.example.org/sim/toolkit")
    );
    assert_eq!(cff.date_released.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));

    // The organization has no personal names and keeps its entity name
    assert_eq!(cff.authors.len(), 2);
    assert_eq!(cff.authors[0].name.as_deref(), Some("Simulation Lab"));
    assert_eq!(cff.authors[1].name, None);
    assert_eq!(cff.authors[1].given_names.as_deref(), Some("Ada"));
    assert_eq!(cff.authors[1].family_names.as_deref(), Some("Lovelace"));
    assert_eq!(
        cff.authors[1].orcid.as_deref(),
        Some("https://orcid.org/0000-0002-1825-0097")
    );
}

#[test]
fn test_fixture_preferred_citation() {
    let cff = codemeta_to_cff(&prepared_codemeta()).expect("Failed to convert");
    let citation = cff.preferred_citation.expect("preferred-citation missing");

    assert_eq!(citation.kind, "article");
    assert_eq!(citation.doi.as_deref(), Some("10.1000/example.2023.42"));
    assert_eq!(citation.title.as_deref(), Some("Simulating the heart"));
    assert_eq!(citation.journal.as_deref(), Some("Journal of Simulations"));
    assert_eq!(citation.volume, Some(CffNumber::Integer(12)));
    assert_eq!(citation.issue, Some(CffNumber::Integer(3)));
    assert_eq!(citation.year, Some(2023));
    assert_eq!(citation.pages.as_deref(), Some("100-110"));
    assert_eq!(citation.authors.len(), 1);
}

#[test]
fn test_fixture_yaml_reparses() {
    let codemeta = prepared_codemeta();
    let yaml = codemeta_to_cff_yaml(&codemeta).expect("Failed to render");

    assert!(yaml.starts_with("cff-version: 1.2.0\n"));
    assert!(yaml.contains("version: '1.0'"));
    assert!(yaml.contains("date-released: 2024-05-01"));

    let parsed: CffDocument = serde_yaml::from_str(&yaml).expect("Failed to reparse");
    assert_eq!(parsed, codemeta_to_cff(&codemeta).unwrap());
}
