//! Citation File Format (CFF 1.2.0) rendering of CodeMeta records.
//!
//! The record is projected into a [`CffDocument`] and written as block-style
//! YAML with keys in CFF's conventional order. Optional keys are omitted when
//! the record has nothing to put in them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::model::{
    parse_date, Agent, Codemeta, CreativeWork, Identifier, License, ReferencePublication,
};

/// CFF schema version written to every document.
pub const CFF_VERSION: &str = "1.2.0";

/// Prefix of SPDX license URLs.
const SPDX_PREFIX: &str = "https://spdx.org/licenses/";

const CFF_MESSAGE: &str = "If you use this software, please cite the paper describing it as below. \
     Specific versions of the software can additionally be referenced using individual DOIs.";

/// A `CITATION.cff` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CffDocument {
    /// Always [`CFF_VERSION`]
    pub cff_version: String,
    /// Citation request shown to users
    pub message: String,
    /// Always `software`
    #[serde(rename = "type")]
    pub kind: String,
    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Abstract
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// DOI without URI prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Landing page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Release date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_released: Option<NaiveDate>,
    /// Authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<CffPerson>,
    /// SPDX identifier or license name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// License URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    /// Source code repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_code: Option<String>,
    /// Publication to cite instead of the software
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_citation: Option<CffReference>,
    /// Additional identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<CffIdentifier>,
}

/// A CFF person or entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CffPerson {
    /// Entity name, used only when no personal names exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_names: Option<String>,
    /// Family names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_names: Option<String>,
    /// Full ORCID URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// The `preferred-citation` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CffReference {
    /// `article` or `generic`
    #[serde(rename = "type")]
    pub kind: String,
    /// DOI without URI prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<CffPerson>,
    /// Journal name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// Volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<CffNumber>,
    /// Issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<CffNumber>,
    /// Publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// `start-end` page range, or the first page alone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
}

/// A number that may be written as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CffNumber {
    /// Numeric value
    Integer(u64),
    /// Anything that does not parse as an integer
    Text(String),
}

impl From<&str> for CffNumber {
    fn from(value: &str) -> Self {
        value
            .trim()
            .parse()
            .map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

/// An entry of the `identifiers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CffIdentifier {
    /// Identifier type; only `doi` is produced
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier value
    pub value: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Convert a CodeMeta record to a CFF document.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidDate`] if `dateModified` is present but
/// not a `YYYY-MM-DD` date.
pub fn codemeta_to_cff(codemeta: &Codemeta) -> Result<CffDocument> {
    let date_released = codemeta
        .date_modified
        .as_deref()
        .map(|value| parse_date("dateModified", value))
        .transpose()?;

    let (license, license_url) = match &codemeta.license {
        Some(License::Url(url)) => (
            Some(url.strip_prefix(SPDX_PREFIX).unwrap_or(url).to_string()),
            None,
        ),
        Some(License::Object(object)) => (object.name.clone(), object.url.clone()),
        None => (None, None),
    };

    let mut cff = CffDocument {
        cff_version: CFF_VERSION.to_string(),
        message: CFF_MESSAGE.to_string(),
        kind: "software".to_string(),
        title: codemeta.name.clone(),
        abstract_text: codemeta.description.clone(),
        doi: codemeta.doi().map(str::to_string),
        url: codemeta.same_as.clone(),
        version: codemeta.version.clone(),
        date_released,
        authors: to_persons(&codemeta.author),
        license,
        license_url,
        repository_code: codemeta.code_repository.clone(),
        preferred_citation: None,
        identifiers: Vec::new(),
    };

    if let Some(ReferencePublication::Work(work)) = &codemeta.reference_publication {
        cff.preferred_citation = Some(to_reference(work));
    }

    let description = match (&cff.version, &cff.title) {
        (Some(version), Some(title)) => Some(format!(
            "This is the archived snapshot of version {version} of {title}"
        )),
        _ => None,
    };
    cff.identifiers = codemeta
        .identifier
        .iter()
        .filter_map(identifier_to_cff)
        .map(|identifier| CffIdentifier {
            description: description.clone(),
            ..identifier
        })
        .collect();

    Ok(cff)
}

/// Convert a CodeMeta record to a CFF YAML document.
///
/// # Errors
///
/// Returns an error if conversion or YAML serialization fails.
pub fn codemeta_to_cff_yaml(codemeta: &Codemeta) -> Result<String> {
    cff_to_yaml(&codemeta_to_cff(codemeta)?)
}

/// Serialize a CFF document as YAML.
///
/// # Errors
///
/// Returns [`MetadataError::Serialization`] if YAML serialization fails.
pub fn cff_to_yaml(cff: &CffDocument) -> Result<String> {
    let yaml = serde_yaml::to_string(cff)
        .map_err(|e| MetadataError::Serialization(format!("Failed to serialize CFF: {e}")))?;
    debug!(bytes = yaml.len(), "rendered cff yaml");
    Ok(yaml)
}

/// Convert a schema.org `PropertyValue` identifier to a CFF identifier.
///
/// Only DOIs have a CFF counterpart; anything else yields `None`.
#[must_use]
pub fn identifier_to_cff(identifier: &Identifier) -> Option<CffIdentifier> {
    identifier.value_for("DOI").map(|value| CffIdentifier {
        kind: "doi".to_string(),
        value: value.to_string(),
        description: None,
    })
}

fn to_persons(agents: &[Agent]) -> Vec<CffPerson> {
    agents.iter().filter_map(to_person).collect()
}

fn to_person(agent: &Agent) -> Option<CffPerson> {
    let has_personal_name = agent.given_name.is_some() || agent.family_name.is_some();
    let person = CffPerson {
        name: if has_personal_name {
            None
        } else {
            agent.name.clone()
        },
        given_names: agent.given_name.clone(),
        family_names: agent.family_name.clone(),
        orcid: agent.orcid_uri().map(str::to_string),
    };

    (person != CffPerson::default()).then_some(person)
}

fn to_reference(work: &CreativeWork) -> CffReference {
    let ancestors = || work.ancestry().skip(1);

    let journal = ancestors()
        .find(|level| level.kind.as_deref() == Some("Periodical"))
        .or_else(|| ancestors().last())
        .and_then(|level| level.name.clone());

    CffReference {
        kind: if work.kind.as_deref() == Some("ScholarlyArticle") {
            "article".to_string()
        } else {
            "generic".to_string()
        },
        doi: work.doi().map(str::to_string),
        title: work.name.clone(),
        authors: to_persons(&work.author),
        journal,
        volume: work
            .ancestry()
            .find_map(|level| level.volume_number.as_deref())
            .map(CffNumber::from),
        issue: work
            .ancestry()
            .find_map(|level| level.issue_number.as_deref())
            .map(CffNumber::from),
        year: work
            .ancestry()
            .find_map(|level| level.date_published.as_deref())
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok()),
        pages: match (&work.page_start, &work.page_end) {
            (Some(start), Some(end)) => Some(format!("{start}-{end}")),
            (Some(start), None) => Some(start.clone()),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Codemeta {
        serde_json::from_value(value).expect("Failed to parse codemeta")
    }

    fn yaml(value: serde_json::Value) -> serde_yaml::Value {
        let text = codemeta_to_cff_yaml(&parse(value)).expect("Failed to convert");
        serde_yaml::from_str(&text).expect("Failed to parse YAML")
    }

    #[test]
    fn test_fixed_header() {
        let cff = codemeta_to_cff(&Codemeta::default()).expect("Failed to convert");
        assert_eq!(cff.cff_version, "1.2.0");
        assert_eq!(cff.kind, "software");
        assert!(cff.message.starts_with("If you use this software"));

        let text = cff_to_yaml(&cff).expect("Failed to serialize");
        assert!(text.starts_with("cff-version: 1.2.0\nmessage:"));
        assert!(!text.contains("authors"));
    }

    #[test]
    fn test_end_to_end_example() {
        let text = codemeta_to_cff_yaml(&parse(json!({
            "name": "Sim",
            "author": [{"givenName": "A", "familyName": "B"}],
            "version": "1.0",
            "dateModified": "2024-05-01"
        })))
        .expect("Failed to convert");

        assert!(text.contains("title: Sim\n"));
        assert!(text.contains("version: '1.0'\n"));
        assert!(text.contains("date-released: 2024-05-01\n"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).expect("Failed to parse YAML");
        let authors = parsed["authors"].as_sequence().unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0]["given-names"], "A");
        assert_eq!(authors[0]["family-names"], "B");
        assert!(authors[0].get("name").is_none());
    }

    #[test]
    fn test_key_order() {
        let text = codemeta_to_cff_yaml(&parse(json!({
            "codeRepository": "https://git.example.org/sim",
            "name": "Sim",
            "description": "Simulator"
        })))
        .expect("Failed to convert");

        let title = text.find("title:").unwrap();
        let abstract_text = text.find("abstract:").unwrap();
        let repository = text.find("repository-code:").unwrap();
        assert!(title < abstract_text && abstract_text < repository);
    }

    #[test]
    fn test_name_only_author() {
        let parsed = yaml(json!({"author": [{"name": "X"}]}));
        let author = &parsed["authors"][0];
        assert_eq!(author["name"], "X");
        assert!(author.get("given-names").is_none());
        assert!(author.get("family-names").is_none());
    }

    #[test]
    fn test_empty_author_is_dropped() {
        let cff = codemeta_to_cff(&parse(json!({
            "author": [{"@id": "https://example.org/nobody"}, {"familyName": "Doe"}]
        })))
        .expect("Failed to convert");
        assert_eq!(cff.authors.len(), 1);
        assert_eq!(cff.authors[0].family_names.as_deref(), Some("Doe"));
    }

    #[test]
    fn test_author_orcid_keeps_uri() {
        let cff = codemeta_to_cff(&parse(json!({
            "author": [{"@id": "https://orcid.org/0000-0002-1825-0097", "givenName": "Josiah", "familyName": "Carberry"}]
        })))
        .expect("Failed to convert");
        assert_eq!(
            cff.authors[0].orcid.as_deref(),
            Some("https://orcid.org/0000-0002-1825-0097")
        );
    }

    #[test]
    fn test_doi_and_url() {
        let cff = codemeta_to_cff(&parse(json!({
            "@id": "https://doi.org/10.35097/1952",
            "sameAs": "https://opencarp.org"
        })))
        .expect("Failed to convert");
        assert_eq!(cff.doi.as_deref(), Some("10.35097/1952"));
        assert_eq!(cff.url.as_deref(), Some("https://opencarp.org"));
    }

    #[test]
    fn test_license_forms() {
        let cff = codemeta_to_cff(&parse(json!({"license": "https://spdx.org/licenses/Apache-2.0"})))
            .expect("Failed to convert");
        assert_eq!(cff.license.as_deref(), Some("Apache-2.0"));
        assert_eq!(cff.license_url, None);

        let cff = codemeta_to_cff(&parse(json!({
            "license": {"name": "Academic Public License", "url": "https://opencarp.org/download/license"}
        })))
        .expect("Failed to convert");
        assert_eq!(cff.license.as_deref(), Some("Academic Public License"));
        assert_eq!(
            cff.license_url.as_deref(),
            Some("https://opencarp.org/download/license")
        );
    }

    #[test]
    fn test_preferred_citation() {
        let cff = codemeta_to_cff(&parse(json!({
            "referencePublication": {
                "@type": "ScholarlyArticle",
                "@id": "https://doi.org/10.1016/j.cmpb.2021.106223",
                "name": "The openCARP simulation environment",
                "author": [{"givenName": "Gernot", "familyName": "Plank"}],
                "pageStart": 106223,
                "isPartOf": {
                    "@type": "PublicationIssue",
                    "datePublished": "2021-09",
                    "isPartOf": {
                        "@type": "Periodical",
                        "name": "Computer Methods and Programs in Biomedicine",
                        "volumeNumber": "208"
                    }
                }
            }
        })))
        .expect("Failed to convert");

        let citation = cff.preferred_citation.unwrap();
        assert_eq!(citation.kind, "article");
        assert_eq!(citation.doi.as_deref(), Some("10.1016/j.cmpb.2021.106223"));
        assert_eq!(
            citation.journal.as_deref(),
            Some("Computer Methods and Programs in Biomedicine")
        );
        assert_eq!(citation.volume, Some(CffNumber::Integer(208)));
        assert_eq!(citation.year, Some(2021));
        assert_eq!(citation.pages.as_deref(), Some("106223"));
        assert_eq!(citation.authors[0].family_names.as_deref(), Some("Plank"));
    }

    #[test]
    fn test_doi_string_has_no_preferred_citation() {
        let cff = codemeta_to_cff(&parse(json!({"referencePublication": "https://doi.org/10.1000/xyz"})))
            .expect("Failed to convert");
        assert!(cff.preferred_citation.is_none());
    }

    #[test]
    fn test_generic_citation_pages() {
        let cff = codemeta_to_cff(&parse(json!({
            "referencePublication": {"@type": "Book", "name": "Manual", "pageStart": "5", "pageEnd": "9"}
        })))
        .expect("Failed to convert");
        let citation = cff.preferred_citation.unwrap();
        assert_eq!(citation.kind, "generic");
        assert_eq!(citation.pages.as_deref(), Some("5-9"));
        assert_eq!(citation.journal, None);
    }

    #[test]
    fn test_identifier_to_cff() {
        let doi = Identifier::Property(crate::model::PropertyValue {
            property_id: Some("DOI".to_string()),
            value: Some("10.35097/1952".to_string()),
        });
        let radar = Identifier::Property(crate::model::PropertyValue {
            property_id: Some("RADAR".to_string()),
            value: Some("gNzfgsCdFVucufDC".to_string()),
        });

        assert_eq!(
            identifier_to_cff(&doi),
            Some(CffIdentifier {
                kind: "doi".to_string(),
                value: "10.35097/1952".to_string(),
                description: None,
            })
        );
        assert_eq!(identifier_to_cff(&radar), None);
    }

    #[test]
    fn test_identifier_description() {
        let cff = codemeta_to_cff(&parse(json!({
            "name": "openCARP",
            "version": "16.0",
            "identifier": [
                {"@type": "PropertyValue", "propertyID": "DOI", "value": "10.35097/1952"},
                {"@type": "PropertyValue", "propertyID": "RADAR", "value": "gNzfgsCdFVucufDC"}
            ]
        })))
        .expect("Failed to convert");

        assert_eq!(cff.identifiers.len(), 1);
        assert_eq!(
            cff.identifiers[0].description.as_deref(),
            Some("This is the archived snapshot of version 16.0 of openCARP")
        );
    }

    #[test]
    fn test_unicode_is_preserved() {
        let text = codemeta_to_cff_yaml(&parse(json!({"author": [{"givenName": "Jürgen", "familyName": "Müller"}]})))
            .expect("Failed to convert");
        assert!(text.contains("Jürgen"));
        assert!(text.contains("Müller"));
    }
}
