//! RADAR deposit metadata (RDDM schema v09) rendering of CodeMeta records.
//!
//! A dataset document has a `technicalMetadata` part describing the deposit
//! itself (responsible person, backlink, retention, dates) and a
//! `descriptiveMetadata` part describing the software. RADAR spells its
//! controlled vocabulary in `UPPER_SNAKE_CASE`; see [`radar_value`].

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::model::{parse_date, Agent, Codemeta, Funding, Keyword, License};

/// Namespace of RADAR's controlled subject areas.
pub const RADAR_SCHEMA_PREFIX: &str = "https://www.radar-service.eu/schemas/";

/// Retention period requested for every deposit, in years.
const RETENTION_PERIOD: u32 = 10;
/// Scheme URI of ORCID name identifiers.
const ORCID_SCHEME_URI: &str = "http://orcid.org";
/// Rights holder used when the record names none.
const DEFAULT_RIGHTS_HOLDER: &str = "The authors";

lazy_static! {
    static ref CAPITALIZED_WORD: Regex = Regex::new("[A-Z][a-z]+").expect("valid word regex");
}

/// Convert a CamelCase term to RADAR's `UPPER_SNAKE_CASE`.
///
/// The input is split into capitalized words; anything outside such words
/// (digits, acronyms, leading lowercase) is dropped.
///
/// # Examples
///
/// ```ignore
/// use codemeta_crosswalk::radar::radar_value;
///
/// assert_eq!(radar_value("HostingInstitution"), "HOSTING_INSTITUTION");
/// ```
#[must_use]
pub fn radar_value(term: &str) -> String {
    CAPITALIZED_WORD
        .find_iter(term)
        .map(|word| word.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Deposit-specific inputs that are not part of the CodeMeta record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarContext {
    /// Email of the person responsible for the deposit
    pub responsible_email: String,
    /// URL pointing back to the published software
    pub publication_backlink: String,
    /// Archive timestamp
    pub archive_date: DateTime<Utc>,
}

impl RadarContext {
    /// Create a context archived now.
    #[must_use]
    pub fn new(responsible_email: impl Into<String>, publication_backlink: impl Into<String>) -> Self {
        Self {
            responsible_email: responsible_email.into(),
            publication_backlink: publication_backlink.into(),
            archive_date: Utc::now(),
        }
    }

    /// Replace the archive timestamp.
    #[must_use]
    pub fn with_archive_date(mut self, archive_date: DateTime<Utc>) -> Self {
        self.archive_date = archive_date;
        self
    }
}

/// A RADAR dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarDataset {
    /// Deposit-level metadata
    pub technical_metadata: RadarTechnicalMetadata,
    /// Descriptive metadata of the software
    pub descriptive_metadata: RadarDescriptiveMetadata,
    /// Existing RADAR dataset id, for updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The `technicalMetadata` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarTechnicalMetadata {
    /// Retention period in years
    pub retention_period: u32,
    /// Archive timestamp, seconds since the epoch
    pub archive_date: i64,
    /// Responsible person
    pub responsible_email: String,
    /// Backlink to the publication
    pub publication_backlink: String,
    /// Metadata schema tag
    pub schema: RadarSchema,
    /// Publication timestamp, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<i64>,
}

/// Metadata schema tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarSchema {
    /// Always `RDDM`
    pub key: String,
    /// Always `09`
    pub version: String,
}

impl Default for RadarSchema {
    fn default() -> Self {
        Self {
            key: "RDDM".to_string(),
            version: "09".to_string(),
        }
    }
}

/// The `descriptiveMetadata` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarDescriptiveMetadata {
    /// Always `ENG`
    pub language: String,
    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Production year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_year: Option<i32>,
    /// Publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    /// Alternate identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_identifiers: Option<RadarAlternateIdentifiers>,
    /// Related identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_identifiers: Option<RadarRelatedIdentifiers>,
    /// Creators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creators: Option<RadarCreators>,
    /// Contributors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<RadarContributors>,
    /// Additional titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_titles: Option<RadarAdditionalTitles>,
    /// Descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<RadarDescriptions>,
    /// Free keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<RadarKeywords>,
    /// Controlled subject areas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_areas: Option<RadarSubjectAreas>,
    /// Publishers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishers: Option<RadarPublishers>,
    /// Resource type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<RadarResource>,
    /// Rights statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<RadarRights>,
    /// Rights holders
    pub rights_holders: RadarRightsHolders,
    /// Funding references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_references: Option<RadarFundingReferences>,
}

/// `alternateIdentifiers` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAlternateIdentifiers {
    /// Entries
    pub alternate_identifier: Vec<RadarAlternateIdentifier>,
}

/// An alternate identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAlternateIdentifier {
    /// Identifier value
    pub value: String,
    /// e.g. `URL`
    pub alternate_identifier_type: String,
}

/// `relatedIdentifiers` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarRelatedIdentifiers {
    /// Entries
    pub related_identifier: Vec<RadarRelatedIdentifier>,
}

/// A related identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarRelatedIdentifier {
    /// Identifier value
    pub value: String,
    /// `DOI` or `URL`
    pub related_identifier_type: String,
    /// e.g. `IS_DOCUMENTED_BY`
    pub relation_type: String,
}

/// `creators` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarCreators {
    /// Entries
    pub creator: Vec<RadarCreator>,
}

/// A creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarCreator {
    /// Display name
    pub creator_name: String,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// ORCID identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_identifier: Vec<RadarNameIdentifier>,
    /// Name of the first affiliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_affiliation: Option<String>,
}

/// `contributors` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarContributors {
    /// Entries
    pub contributor: Vec<RadarContributor>,
}

/// A contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarContributor {
    /// Display name
    pub contributor_name: String,
    /// Role, e.g. `HOSTING_INSTITUTION`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_type: Option<String>,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// ORCID identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_identifier: Vec<RadarNameIdentifier>,
    /// Name of the first affiliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_affiliation: Option<String>,
}

/// A name identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarNameIdentifier {
    /// ORCID iD without URI prefix
    pub value: String,
    /// Scheme URI
    #[serde(rename = "schemeURI")]
    pub scheme_uri: String,
    /// `ORCID`
    pub name_identifier_scheme: String,
}

/// `additionalTitles` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAdditionalTitles {
    /// Entries
    pub additional_title: Vec<RadarAdditionalTitle>,
}

/// An additional title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAdditionalTitle {
    /// Title text
    pub value: String,
    /// e.g. `ALTERNATIVE_TITLE`
    pub additional_title_type: String,
}

/// `descriptions` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarDescriptions {
    /// Entries
    pub description: Vec<RadarDescription>,
}

/// A description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarDescription {
    /// Description text
    pub value: String,
    /// e.g. `ABSTRACT`
    pub description_type: String,
}

/// `keywords` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarKeywords {
    /// Entries
    pub keyword: Vec<String>,
}

/// `subjectAreas` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSubjectAreas {
    /// Entries
    pub subject_area: Vec<RadarSubjectArea>,
}

/// A controlled subject area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSubjectArea {
    /// e.g. `LIFE_SCIENCE`
    pub controlled_subject_area_name: String,
}

/// `publishers` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarPublishers {
    /// Entries
    pub publisher: Vec<String>,
}

/// Resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarResource {
    /// Free-text type
    pub value: String,
    /// `SOFTWARE` for software records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Rights statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarRights {
    /// Always `OTHER`
    pub controlled_rights: String,
    /// License name or URL
    pub additional_rights: String,
}

/// `rightsHolders` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarRightsHolders {
    /// Entries
    pub rights_holder: Vec<String>,
}

/// `fundingReferences` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarFundingReferences {
    /// Entries
    pub funding_reference: Vec<RadarFundingReference>,
}

/// A funding reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarFundingReference {
    /// Funder name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder_name: Option<String>,
    /// Funder ROR URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder_identifier: Option<RadarFunderIdentifier>,
    /// Award number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_number: Option<String>,
    /// Award URI
    #[serde(rename = "awardURI", default, skip_serializing_if = "Option::is_none")]
    pub award_uri: Option<String>,
    /// Award title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_title: Option<String>,
}

/// A funder identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarFunderIdentifier {
    /// Full ROR URI
    pub value: String,
    /// Always `OTHER`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Convert a CodeMeta record to a RADAR dataset document.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidDate`] if `dateModified` is present but
/// not a `YYYY-MM-DD` date.
pub fn codemeta_to_radar(codemeta: &Codemeta, context: &RadarContext) -> Result<RadarDataset> {
    let modified = codemeta
        .date_modified
        .as_deref()
        .map(|value| parse_date("dateModified", value))
        .transpose()?;

    let technical_metadata = RadarTechnicalMetadata {
        retention_period: RETENTION_PERIOD,
        archive_date: context.archive_date.timestamp(),
        responsible_email: context.responsible_email.clone(),
        publication_backlink: context.publication_backlink.clone(),
        schema: RadarSchema::default(),
        publish_date: modified.map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp()),
    };

    let mut descriptive = RadarDescriptiveMetadata {
        language: "ENG".to_string(),
        title: codemeta.name.clone(),
        production_year: modified.map(|date| date.year()),
        publication_year: modified.map(|date| date.year()),
        rights_holders: rights_holders(codemeta),
        ..RadarDescriptiveMetadata::default()
    };

    extract_identifiers(codemeta, &mut descriptive);
    extract_persons(codemeta, &mut descriptive);

    descriptive.additional_titles =
        codemeta
            .alternate_name
            .as_ref()
            .map(|alternate| RadarAdditionalTitles {
                additional_title: vec![RadarAdditionalTitle {
                    value: alternate.clone(),
                    additional_title_type: radar_value("AlternativeTitle"),
                }],
            });

    descriptive.descriptions = codemeta
        .description
        .as_ref()
        .map(|description| RadarDescriptions {
            description: vec![RadarDescription {
                value: description.clone(),
                description_type: radar_value("Abstract"),
            }],
        });

    extract_subjects(codemeta, &mut descriptive);

    descriptive.publishers = codemeta
        .publisher
        .as_ref()
        .and_then(|publisher| publisher.name.clone())
        .map(|name| RadarPublishers {
            publisher: vec![name],
        });

    descriptive.resource = codemeta
        .application_category
        .as_ref()
        .map(|category| RadarResource {
            value: category.clone(),
            resource_type: codemeta.is_software().then(|| radar_value("Software")),
        });

    descriptive.rights = codemeta.license.as_ref().and_then(|license| {
        let additional_rights = match license {
            License::Url(url) => Some(url.clone()),
            License::Object(object) => object.name.clone(),
        }?;
        Some(RadarRights {
            controlled_rights: "OTHER".to_string(),
            additional_rights,
        })
    });

    let funding_reference: Vec<RadarFundingReference> =
        codemeta.funding.iter().filter_map(to_funding_reference).collect();
    if !funding_reference.is_empty() {
        descriptive.funding_references = Some(RadarFundingReferences { funding_reference });
    }

    Ok(RadarDataset {
        technical_metadata,
        descriptive_metadata: descriptive,
        id: codemeta
            .identifier
            .iter()
            .find_map(|identifier| identifier.value_for("RADAR"))
            .map(str::to_string),
    })
}

/// Convert a CodeMeta record to an indented RADAR JSON document.
///
/// # Errors
///
/// Returns an error if conversion or JSON serialization fails.
pub fn codemeta_to_radar_json(codemeta: &Codemeta, context: &RadarContext) -> Result<String> {
    let dataset = codemeta_to_radar(codemeta, context)?;
    let json = serde_json::to_string_pretty(&dataset)
        .map_err(|e| MetadataError::Serialization(format!("Failed to serialize RADAR JSON: {e}")))?;
    debug!(bytes = json.len(), "rendered radar json");
    Ok(json)
}

fn extract_identifiers(codemeta: &Codemeta, descriptive: &mut RadarDescriptiveMetadata) {
    let alternate_identifier: Vec<RadarAlternateIdentifier> =
        [&codemeta.same_as, &codemeta.download_url]
            .into_iter()
            .flatten()
            .map(|url| RadarAlternateIdentifier {
                value: url.clone(),
                alternate_identifier_type: "URL".to_string(),
            })
            .collect();
    if !alternate_identifier.is_empty() {
        descriptive.alternate_identifiers = Some(RadarAlternateIdentifiers { alternate_identifier });
    }

    let mut related_identifier = Vec::new();
    if let Some(doi) = codemeta.reference_publication.as_ref().and_then(|p| p.doi()) {
        related_identifier.push(RadarRelatedIdentifier {
            value: doi.to_string(),
            related_identifier_type: "DOI".to_string(),
            relation_type: radar_value("IsDocumentedBy"),
        });
    }
    if let Some(repository) = &codemeta.code_repository {
        related_identifier.push(RadarRelatedIdentifier {
            value: repository.clone(),
            related_identifier_type: "URL".to_string(),
            relation_type: radar_value("IsSupplementTo"),
        });
    }
    if !related_identifier.is_empty() {
        descriptive.related_identifiers = Some(RadarRelatedIdentifiers { related_identifier });
    }
}

fn name_identifiers(agent: &Agent) -> Vec<RadarNameIdentifier> {
    agent
        .orcid()
        .map(|orcid| RadarNameIdentifier {
            value: orcid.to_string(),
            scheme_uri: ORCID_SCHEME_URI.to_string(),
            name_identifier_scheme: "ORCID".to_string(),
        })
        .into_iter()
        .collect()
}

fn first_affiliation(agent: &Agent) -> Option<String> {
    agent
        .affiliation
        .iter()
        .find_map(|affiliation| affiliation.name.clone())
}

fn extract_persons(codemeta: &Codemeta, descriptive: &mut RadarDescriptiveMetadata) {
    let creator: Vec<RadarCreator> = codemeta
        .author
        .iter()
        .filter_map(|agent| {
            Some(RadarCreator {
                creator_name: agent.display_name()?,
                given_name: agent.given_name.clone(),
                family_name: agent.family_name.clone(),
                name_identifier: name_identifiers(agent),
                creator_affiliation: first_affiliation(agent),
            })
        })
        .collect();
    if !creator.is_empty() {
        descriptive.creators = Some(RadarCreators { creator });
    }

    let contributor: Vec<RadarContributor> = codemeta
        .contributor
        .iter()
        .filter_map(|agent| {
            Some(RadarContributor {
                contributor_name: agent.display_name()?,
                contributor_type: agent.additional_type.as_deref().map(radar_value),
                given_name: agent.given_name.clone(),
                family_name: agent.family_name.clone(),
                name_identifier: name_identifiers(agent),
                contributor_affiliation: first_affiliation(agent),
            })
        })
        .collect();
    if !contributor.is_empty() {
        descriptive.contributors = Some(RadarContributors { contributor });
    }
}

fn extract_subjects(codemeta: &Codemeta, descriptive: &mut RadarDescriptiveMetadata) {
    let mut keyword = Vec::new();
    let mut subject_area = Vec::new();

    for entry in &codemeta.keywords {
        match entry {
            Keyword::Text(text) => keyword.push(text.clone()),
            Keyword::Term(term) => {
                let controlled = term.kind.as_deref() == Some("DefinedTerm")
                    && term
                        .in_defined_term_set
                        .as_deref()
                        .is_some_and(|set| set.starts_with(RADAR_SCHEMA_PREFIX));
                match &term.name {
                    Some(name) if controlled => subject_area.push(RadarSubjectArea {
                        controlled_subject_area_name: radar_value(name),
                    }),
                    _ => {},
                }
            },
        }
    }

    if !keyword.is_empty() {
        descriptive.keywords = Some(RadarKeywords { keyword });
    }
    if !subject_area.is_empty() {
        descriptive.subject_areas = Some(RadarSubjectAreas { subject_area });
    }
}

fn rights_holders(codemeta: &Codemeta) -> RadarRightsHolders {
    let mut rights_holder: Vec<String> = codemeta
        .copyright_holder
        .iter()
        .filter_map(Agent::display_name)
        .collect();
    if rights_holder.is_empty() {
        rights_holder.push(DEFAULT_RIGHTS_HOLDER.to_string());
    }
    RadarRightsHolders { rights_holder }
}

fn to_funding_reference(funding: &Funding) -> Option<RadarFundingReference> {
    let reference = match funding {
        Funding::Text(text) => RadarFundingReference {
            funder_name: Some(text.clone()),
            ..RadarFundingReference::default()
        },
        Funding::Grant(grant) => RadarFundingReference {
            funder_name: grant.funder.as_ref().and_then(|f| f.name.clone()),
            funder_identifier: grant.funder.as_ref().and_then(Agent::ror).map(|ror| {
                RadarFunderIdentifier {
                    value: ror.to_string(),
                    kind: "OTHER".to_string(),
                }
            }),
            award_number: grant.identifier.clone(),
            award_uri: grant.url.clone(),
            award_title: grant.name.clone(),
        },
    };

    (reference != RadarFundingReference::default()).then_some(reference)
}
