//! DataCite kernel-4 XML rendering of CodeMeta records.
//!
//! A [`Codemeta`] record is projected into a [`DataciteResource`], whose
//! fields serialize through quick-xml in kernel-4 document order. Fields
//! absent from the input are omitted; no empty element or empty attribute
//! is ever written. The root `<resource>` element carries the kernel-4
//! namespace and schema location.
//!
//! # Examples
//!
//! ```ignore
//! use codemeta_crosswalk::datacite;
//!
//! let codemeta = metadata.to_codemeta()?;
//! let xml = datacite::codemeta_to_datacite_xml(&codemeta)?;
//! let parsed = datacite::datacite_xml_to_resource(&xml)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use chrono::Datelike;
use lazy_static::lazy_static;
use quick_xml::de::from_str as xml_from_str;
use quick_xml::se::Serializer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MetadataError, Result};
use crate::model::{parse_date, Agent, Codemeta, Funding, Keyword, License};

/// The DataCite kernel-4 namespace URI.
const DATACITE_NS: &str = "http://datacite.org/schema/kernel-4";
/// The XML Schema instance namespace URI.
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Scheme URI of ORCID name identifiers.
const ORCID_SCHEME_URI: &str = "http://orcid.org";
/// Scheme URI of ROR funder identifiers.
const ROR_SCHEME_URI: &str = "https://ror.org";
/// Schema location of the kernel-4.3 XSD.
const DATACITE_SCHEMA_LOCATION: &str =
    "http://datacite.org/schema/kernel-4 http://schema.datacite.org/meta/kernel-4.3/metadata.xsd";

lazy_static! {
    static ref NAMESPACE_ATTRIBUTES: Regex =
        Regex::new(r#"\s+(?:xmlns(?::\w+)?|xsi:schemaLocation)="[^"]*""#)
            .expect("valid namespace regex");
}

/// DataCite `<resource>` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "resource", rename_all = "camelCase")]
pub struct DataciteResource {
    /// Primary identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<DataciteIdentifier>,
    /// Creators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creators: Option<DataciteCreators>,
    /// Titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<DataciteTitles>,
    /// Publisher name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Four-digit publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<String>,
    /// Subjects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<DataciteSubjects>,
    /// Contributors, including rights holders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<DataciteContributors>,
    /// Dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DataciteDates>,
    /// Language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Resource type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<DataciteResourceType>,
    /// Alternate identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_identifiers: Option<DataciteAlternateIdentifiers>,
    /// Related identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_identifiers: Option<DataciteRelatedIdentifiers>,
    /// Version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Rights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights_list: Option<DataciteRightsList>,
    /// Descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<DataciteDescriptions>,
    /// Funding references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_references: Option<DataciteFundingReferences>,
}

/// `<identifier identifierType="...">`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteIdentifier {
    /// `DOI` or `URL`
    #[serde(rename = "@identifierType")]
    pub identifier_type: String,
    /// Identifier value
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<creators>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteCreators {
    /// Creator entries
    #[serde(default)]
    pub creator: Vec<DataciteCreator>,
}

/// `<creator>` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteCreator {
    /// Display name with name type
    pub creator_name: DataciteName,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// ORCID identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_identifier: Option<DataciteNameIdentifier>,
    /// Affiliations
    #[serde(default)]
    pub affiliation: Vec<DataciteAffiliation>,
}

/// `<contributors>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteContributors {
    /// Contributor entries
    #[serde(default)]
    pub contributor: Vec<DataciteContributor>,
}

/// `<contributor>` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteContributor {
    /// e.g. `RightsHolder`, `HostingInstitution`
    #[serde(
        rename = "@contributorType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contributor_type: Option<String>,
    /// Display name with name type
    pub contributor_name: DataciteName,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// ORCID identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_identifier: Option<DataciteNameIdentifier>,
    /// Affiliations
    #[serde(default)]
    pub affiliation: Vec<DataciteAffiliation>,
}

/// `<creatorName>` / `<contributorName>` with its `nameType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteName {
    /// `Personal` or `Organizational`
    #[serde(rename = "@nameType")]
    pub name_type: String,
    /// Display name
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<nameIdentifier>`; only ORCID is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteNameIdentifier {
    /// Identifier scheme
    #[serde(rename = "@nameIdentifierScheme")]
    pub scheme: String,
    /// Scheme URI
    #[serde(rename = "@schemeURI")]
    pub scheme_uri: String,
    /// Identifier without URI prefix
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<affiliation>`, optionally identified by ROR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteAffiliation {
    /// Full ROR URI
    #[serde(
        rename = "@affiliationIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier: Option<String>,
    /// `ROR` when an identifier is present
    #[serde(
        rename = "@affiliationIdentifierScheme",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scheme: Option<String>,
    /// Affiliation name
    #[serde(rename = "$text")]
    pub name: String,
}

/// `<titles>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteTitles {
    /// Title entries
    #[serde(default)]
    pub title: Vec<DataciteTitle>,
}

/// `<title>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteTitle {
    /// `AlternativeTitle` for secondary titles
    #[serde(rename = "@titleType", default, skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,
    /// Title text
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<subjects>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteSubjects {
    /// Subject entries
    #[serde(default)]
    pub subject: Vec<DataciteSubject>,
}

/// `<subject>`, optionally from a controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteSubject {
    /// Vocabulary URI
    #[serde(rename = "@schemeURI", default, skip_serializing_if = "Option::is_none")]
    pub scheme_uri: Option<String>,
    /// Term URI
    #[serde(rename = "@valueURI", default, skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,
    /// Subject text
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<dates>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteDates {
    /// Date entries
    #[serde(default)]
    pub date: Vec<DataciteDate>,
}

/// `<date dateType="...">`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteDate {
    /// `Created` or `Issued`
    #[serde(rename = "@dateType")]
    pub date_type: String,
    /// `YYYY-MM-DD`
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<resourceType resourceTypeGeneral="...">`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteResourceType {
    /// `Software` for software records
    #[serde(
        rename = "@resourceTypeGeneral",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub general: Option<String>,
    /// Free-text type, taken from `applicationCategory`
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<alternateIdentifiers>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteAlternateIdentifiers {
    /// Alternate identifier entries
    #[serde(default)]
    pub alternate_identifier: Vec<DataciteAlternateIdentifier>,
}

/// `<alternateIdentifier>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteAlternateIdentifier {
    /// Identifier type, e.g. `URL`
    #[serde(rename = "@alternateIdentifierType")]
    pub identifier_type: String,
    /// Identifier value
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<relatedIdentifiers>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteRelatedIdentifiers {
    /// Related identifier entries
    #[serde(default)]
    pub related_identifier: Vec<DataciteRelatedIdentifier>,
}

/// `<relatedIdentifier>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteRelatedIdentifier {
    /// `DOI` or `URL`
    #[serde(rename = "@relatedIdentifierType")]
    pub identifier_type: String,
    /// e.g. `IsDocumentedBy`
    #[serde(rename = "@relationType")]
    pub relation_type: String,
    /// Identifier value
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<rightsList>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteRightsList {
    /// Rights entries
    #[serde(default)]
    pub rights: Vec<DataciteRights>,
}

/// `<rights>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteRights {
    /// License URL
    #[serde(rename = "@rightsURI", default, skip_serializing_if = "Option::is_none")]
    pub rights_uri: Option<String>,
    /// License name
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<descriptions>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataciteDescriptions {
    /// Description entries
    #[serde(default)]
    pub description: Vec<DataciteDescription>,
}

/// `<description>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteDescription {
    /// e.g. `Abstract`
    #[serde(rename = "@descriptionType")]
    pub description_type: String,
    /// Description text
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<fundingReferences>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteFundingReferences {
    /// Funding reference entries
    #[serde(default)]
    pub funding_reference: Vec<DataciteFundingReference>,
}

/// `<fundingReference>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteFundingReference {
    /// Funder name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder_name: Option<String>,
    /// ROR identifier of the funder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder_identifier: Option<DataciteFunderIdentifier>,
    /// Award number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_number: Option<DataciteAwardNumber>,
    /// Award title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_title: Option<String>,
}

/// `<funderIdentifier>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteFunderIdentifier {
    /// `ROR`
    #[serde(rename = "@funderIdentifierType")]
    pub identifier_type: String,
    /// `https://ror.org`
    #[serde(rename = "@schemeURI")]
    pub scheme_uri: String,
    /// Full ROR URI
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<awardNumber>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataciteAwardNumber {
    /// Award URI
    #[serde(rename = "@awardURI", default, skip_serializing_if = "Option::is_none")]
    pub award_uri: Option<String>,
    /// Award number
    #[serde(rename = "$text")]
    pub value: String,
}

/// Convert a CodeMeta record to a DataCite resource.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidDate`] if `dateModified` is present but
/// not a `YYYY-MM-DD` date.
pub fn codemeta_to_datacite(codemeta: &Codemeta) -> Result<DataciteResource> {
    let mut resource = DataciteResource {
        identifier: codemeta.id.as_ref().map(|id| match codemeta.doi() {
            Some(doi) => DataciteIdentifier {
                identifier_type: "DOI".to_string(),
                value: doi.to_string(),
            },
            None => DataciteIdentifier {
                identifier_type: "URL".to_string(),
                value: id.clone(),
            },
        }),
        publisher: codemeta.publisher.as_ref().and_then(|p| p.name.clone()),
        language: Some("en-US".to_string()),
        version: codemeta.version.clone(),
        ..DataciteResource::default()
    };

    let creator: Vec<DataciteCreator> = codemeta.author.iter().filter_map(to_creator).collect();
    if !creator.is_empty() {
        resource.creators = Some(DataciteCreators { creator });
    }

    extract_titles(codemeta, &mut resource);

    if let Some(modified) = &codemeta.date_modified {
        let date = parse_date("dateModified", modified)?;
        resource.publication_year = Some(date.year().to_string());
    }

    let subject: Vec<DataciteSubject> = codemeta.keywords.iter().filter_map(to_subject).collect();
    if !subject.is_empty() {
        resource.subjects = Some(DataciteSubjects { subject });
    }

    extract_contributors(codemeta, &mut resource);
    extract_dates(codemeta, &mut resource);

    resource.resource_type =
        codemeta
            .application_category
            .as_ref()
            .map(|category| DataciteResourceType {
                general: codemeta.is_software().then(|| "Software".to_string()),
                value: category.clone(),
            });

    resource.alternate_identifiers =
        codemeta
            .same_as
            .as_ref()
            .map(|same_as| DataciteAlternateIdentifiers {
                alternate_identifier: vec![DataciteAlternateIdentifier {
                    identifier_type: "URL".to_string(),
                    value: same_as.clone(),
                }],
            });

    extract_related_identifiers(codemeta, &mut resource);

    resource.rights_list = codemeta
        .license
        .as_ref()
        .and_then(to_rights)
        .map(|rights| DataciteRightsList {
            rights: vec![rights],
        });

    resource.descriptions = codemeta
        .description
        .as_ref()
        .map(|description| DataciteDescriptions {
            description: vec![DataciteDescription {
                description_type: "Abstract".to_string(),
                value: description.clone(),
            }],
        });

    let funding_reference: Vec<DataciteFundingReference> =
        codemeta.funding.iter().filter_map(to_funding_reference).collect();
    if !funding_reference.is_empty() {
        resource.funding_references = Some(DataciteFundingReferences { funding_reference });
    }

    Ok(resource)
}

/// Convert a CodeMeta record to a DataCite XML document.
///
/// # Errors
///
/// Returns an error if conversion or XML serialization fails.
pub fn codemeta_to_datacite_xml(codemeta: &Codemeta) -> Result<String> {
    datacite_to_xml(&codemeta_to_datacite(codemeta)?)
}

/// Serialize a DataCite resource as an indented XML document.
///
/// The output includes an XML declaration and the kernel-4 namespace and
/// schema location on the root `<resource>` element.
///
/// # Errors
///
/// Returns [`MetadataError::Serialization`] if XML serialization fails.
pub fn datacite_to_xml(resource: &DataciteResource) -> Result<String> {
    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    resource
        .serialize(serializer)
        .map_err(|e| MetadataError::Serialization(format!("Failed to serialize DataCite XML: {e}")))?;

    // Namespaces go on the root element only
    let body = body.replacen(
        "<resource>",
        &format!(
            "<resource xmlns:xsi=\"{XSI_NS}\" xmlns=\"{DATACITE_NS}\" xsi:schemaLocation=\"{DATACITE_SCHEMA_LOCATION}\">"
        ),
        1,
    );
    debug!(bytes = body.len(), "rendered datacite xml");

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
}

/// Parse a DataCite XML document back into a [`DataciteResource`].
///
/// Namespace declarations and the schema location are ignored.
///
/// # Errors
///
/// Returns [`MetadataError::ParseError`] if the XML is invalid or does not
/// have the shape of a DataCite resource.
pub fn datacite_xml_to_resource(xml: &str) -> Result<DataciteResource> {
    let cleaned = NAMESPACE_ATTRIBUTES.replace_all(xml, "");
    xml_from_str(&cleaned)
        .map_err(|e| MetadataError::ParseError(format!("Failed to parse DataCite XML: {e}")))
}

fn name_type(agent: &Agent) -> String {
    if agent.is_organization() {
        "Organizational".to_string()
    } else {
        "Personal".to_string()
    }
}

fn name_identifier(agent: &Agent) -> Option<DataciteNameIdentifier> {
    agent.orcid().map(|orcid| DataciteNameIdentifier {
        scheme: "ORCID".to_string(),
        scheme_uri: ORCID_SCHEME_URI.to_string(),
        value: orcid.to_string(),
    })
}

fn affiliations(agent: &Agent) -> Vec<DataciteAffiliation> {
    agent
        .affiliation
        .iter()
        .filter_map(|affiliation| {
            let name = affiliation.name.clone()?;
            let ror = affiliation.ror();
            Some(DataciteAffiliation {
                identifier: ror.map(str::to_string),
                scheme: ror.map(|_| "ROR".to_string()),
                name,
            })
        })
        .collect()
}

fn to_creator(agent: &Agent) -> Option<DataciteCreator> {
    let Some(name) = agent.display_name() else {
        warn!(id = ?agent.id, "skipping creator without a name");
        return None;
    };
    Some(DataciteCreator {
        creator_name: DataciteName {
            name_type: name_type(agent),
            value: name,
        },
        given_name: agent.given_name.clone(),
        family_name: agent.family_name.clone(),
        name_identifier: name_identifier(agent),
        affiliation: affiliations(agent),
    })
}

fn to_contributor(agent: &Agent, contributor_type: Option<String>) -> Option<DataciteContributor> {
    let name = agent.display_name()?;
    Some(DataciteContributor {
        contributor_type,
        contributor_name: DataciteName {
            name_type: name_type(agent),
            value: name,
        },
        given_name: agent.given_name.clone(),
        family_name: agent.family_name.clone(),
        name_identifier: name_identifier(agent),
        affiliation: affiliations(agent),
    })
}

fn extract_titles(codemeta: &Codemeta, resource: &mut DataciteResource) {
    let Some(name) = &codemeta.name else {
        return;
    };

    let mut title = vec![DataciteTitle {
        title_type: None,
        value: name.clone(),
    }];
    if let Some(alternate) = &codemeta.alternate_name {
        title.push(DataciteTitle {
            title_type: Some("AlternativeTitle".to_string()),
            value: alternate.clone(),
        });
    }
    resource.titles = Some(DataciteTitles { title });
}

fn to_subject(keyword: &Keyword) -> Option<DataciteSubject> {
    match keyword {
        Keyword::Text(text) => Some(DataciteSubject {
            scheme_uri: None,
            value_uri: None,
            value: text.clone(),
        }),
        Keyword::Term(term) => Some(DataciteSubject {
            scheme_uri: term.in_defined_term_set.clone(),
            value_uri: term.url.clone(),
            value: term.name.clone()?,
        }),
    }
}

fn extract_contributors(codemeta: &Codemeta, resource: &mut DataciteResource) {
    let contributors = codemeta.contributor.iter().chain(&codemeta.copyright_holder);

    let contributor: Vec<DataciteContributor> = contributors
        .filter_map(|agent| {
            let contributor_type = if codemeta.copyright_holder.contains(agent) {
                Some("RightsHolder".to_string())
            } else {
                agent.additional_type.clone()
            };
            to_contributor(agent, contributor_type)
        })
        .collect();

    if !contributor.is_empty() {
        resource.contributors = Some(DataciteContributors { contributor });
    }
}

fn extract_dates(codemeta: &Codemeta, resource: &mut DataciteResource) {
    let date: Vec<DataciteDate> = [
        ("Created", &codemeta.date_created),
        ("Issued", &codemeta.date_modified),
    ]
    .into_iter()
    .filter_map(|(date_type, value)| {
        value.as_ref().map(|value| DataciteDate {
            date_type: date_type.to_string(),
            value: value.clone(),
        })
    })
    .collect();

    if !date.is_empty() {
        resource.dates = Some(DataciteDates { date });
    }
}

fn extract_related_identifiers(codemeta: &Codemeta, resource: &mut DataciteResource) {
    let mut related_identifier = Vec::new();

    if let Some(doi) = codemeta.reference_publication.as_ref().and_then(|p| p.doi()) {
        related_identifier.push(DataciteRelatedIdentifier {
            identifier_type: "DOI".to_string(),
            relation_type: "IsDocumentedBy".to_string(),
            value: doi.to_string(),
        });
    }

    if let Some(repository) = &codemeta.code_repository {
        related_identifier.push(DataciteRelatedIdentifier {
            identifier_type: "URL".to_string(),
            relation_type: "IsSupplementTo".to_string(),
            value: repository.clone(),
        });
    }

    if !related_identifier.is_empty() {
        resource.related_identifiers = Some(DataciteRelatedIdentifiers { related_identifier });
    }
}

fn to_rights(license: &License) -> Option<DataciteRights> {
    Some(DataciteRights {
        rights_uri: license.url().map(str::to_string),
        value: license.name()?.to_string(),
    })
}

fn to_funding_reference(funding: &Funding) -> Option<DataciteFundingReference> {
    let reference = match funding {
        Funding::Text(text) => DataciteFundingReference {
            funder_name: Some(text.clone()),
            ..DataciteFundingReference::default()
        },
        Funding::Grant(grant) => DataciteFundingReference {
            funder_name: grant.funder.as_ref().and_then(|f| f.name.clone()),
            funder_identifier: grant.funder.as_ref().and_then(Agent::ror).map(|ror| {
                DataciteFunderIdentifier {
                    identifier_type: "ROR".to_string(),
                    scheme_uri: ROR_SCHEME_URI.to_string(),
                    value: ror.to_string(),
                }
            }),
            award_number: grant.identifier.as_ref().map(|number| DataciteAwardNumber {
                award_uri: grant.url.clone(),
                value: number.clone(),
            }),
            award_title: grant.name.clone(),
        },
    };

    (reference != DataciteFundingReference::default()).then_some(reference)
}
