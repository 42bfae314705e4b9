//! Typed view over a CodeMeta record.
//!
//! The canonical record held by [`crate::codemeta::CodemetaMetadata`] is a
//! schema-less ordered map. Renderers never walk that map directly; they
//! resolve it once into a [`Codemeta`] value in which every optional field is
//! an `Option`, every list field a `Vec`, and every field that producers fill
//! with different shapes a tagged enum:
//!
//! - `license`: URL string or `{name, url}` object ([`License`])
//! - `keywords`: plain strings or `DefinedTerm` objects ([`Keyword`])
//! - `funding`: free text or grant objects ([`Funding`])
//! - `referencePublication`: DOI string or nested work ([`ReferencePublication`])
//! - `identifier`: free text or `PropertyValue` objects ([`Identifier`])
//!
//! List-valued fields also accept a single value, and persons or
//! organizations may be given as a bare name string.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{MetadataError, Result};

/// Prefix of DOI identifier URIs.
pub const DOI_PREFIX: &str = "https://doi.org/";
/// Prefix of ORCID identifier URIs.
pub const ORCID_PREFIX: &str = "https://orcid.org/";
/// Prefix of ROR identifier URIs.
pub const ROR_PREFIX: &str = "https://ror.org/";

/// Parse a `YYYY-MM-DD` date field.
///
/// # Errors
///
/// Returns [`MetadataError::InvalidDate`] naming `field` if `value` is not a
/// valid calendar date in that form.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MetadataError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// A CodeMeta software description, resolved into typed fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codemeta {
    /// `@id`, usually a DOI or landing page URL
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    /// `@type`, e.g. `SoftwareSourceCode`
    #[serde(rename = "@type", default)]
    pub kind: Option<String>,
    /// Title of the software
    #[serde(default)]
    pub name: Option<String>,
    /// Alternative title
    #[serde(default)]
    pub alternate_name: Option<String>,
    /// Abstract
    #[serde(default)]
    pub description: Option<String>,
    /// Version string; numeric versions are normalised to text
    #[serde(default, deserialize_with = "opt_text")]
    pub version: Option<String>,
    /// Creation date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date_created: Option<String>,
    /// Last modification / release date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date_modified: Option<String>,
    /// Source code repository URL
    #[serde(default)]
    pub code_repository: Option<String>,
    /// Landing page URL
    #[serde(default)]
    pub same_as: Option<String>,
    /// Download URL
    #[serde(default)]
    pub download_url: Option<String>,
    /// Application category
    #[serde(default)]
    pub application_category: Option<String>,
    /// Authors
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Vec<Agent>,
    /// Contributors
    #[serde(default, deserialize_with = "one_or_many")]
    pub contributor: Vec<Agent>,
    /// Copyright holders
    #[serde(default, deserialize_with = "one_or_many")]
    pub copyright_holder: Vec<Agent>,
    /// Publisher; only the first entry of a list is kept
    #[serde(default, deserialize_with = "first_of_many")]
    pub publisher: Option<Agent>,
    /// License
    #[serde(default)]
    pub license: Option<License>,
    /// Keywords
    #[serde(default, deserialize_with = "one_or_many")]
    pub keywords: Vec<Keyword>,
    /// Funding
    #[serde(default, deserialize_with = "one_or_many")]
    pub funding: Vec<Funding>,
    /// Publication describing the software
    #[serde(default)]
    pub reference_publication: Option<ReferencePublication>,
    /// Additional identifiers
    #[serde(default, deserialize_with = "one_or_many")]
    pub identifier: Vec<Identifier>,
}

impl Codemeta {
    /// `@id` with the DOI prefix removed, if it is a DOI.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.id.as_deref().and_then(|id| id.strip_prefix(DOI_PREFIX))
    }

    /// Whether `@type` is `SoftwareSourceCode`.
    #[must_use]
    pub fn is_software(&self) -> bool {
        self.kind.as_deref() == Some("SoftwareSourceCode")
    }
}

/// A Person-or-Organization entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "AgentRepr")]
pub struct Agent {
    /// `@id`, usually an ORCID or ROR URI
    pub id: Option<String>,
    /// `@type`: `Person` or `Organization`
    pub kind: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Given name
    pub given_name: Option<String>,
    /// Family name
    pub family_name: Option<String>,
    /// Affiliations
    pub affiliation: Vec<Agent>,
    /// Free-form role, e.g. `HostingInstitution`
    pub additional_type: Option<String>,
}

impl Agent {
    /// Agent with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Name used for rendering.
    ///
    /// `givenName familyName` when both are present, otherwise `name`.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            _ => self.name.clone(),
        }
    }

    /// Whether `@type` is `Organization`.
    #[must_use]
    pub fn is_organization(&self) -> bool {
        self.kind.as_deref() == Some("Organization")
    }

    /// ORCID iD with the URI prefix removed.
    #[must_use]
    pub fn orcid(&self) -> Option<&str> {
        self.id.as_deref().and_then(|id| id.strip_prefix(ORCID_PREFIX))
    }

    /// Full ORCID URI, if `@id` is one.
    #[must_use]
    pub fn orcid_uri(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| id.starts_with(ORCID_PREFIX))
    }

    /// Full ROR URI, if `@id` is one.
    #[must_use]
    pub fn ror(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| id.starts_with(ROR_PREFIX))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgentRepr {
    Name(String),
    #[serde(deserialize_with = "object_only")]
    Fields(AgentFields),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentFields {
    #[serde(rename = "@id", default)]
    id: Option<String>,
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    affiliation: Vec<Agent>,
    #[serde(default)]
    additional_type: Option<String>,
}

impl From<AgentRepr> for Agent {
    fn from(repr: AgentRepr) -> Self {
        match repr {
            AgentRepr::Name(name) => Agent::named(name),
            AgentRepr::Fields(fields) => Agent {
                id: fields.id,
                kind: fields.kind,
                name: fields.name,
                given_name: fields.given_name,
                family_name: fields.family_name,
                affiliation: fields.affiliation,
                additional_type: fields.additional_type,
            },
        }
    }
}

/// A license, given as a URL or as an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum License {
    /// e.g. `https://spdx.org/licenses/MIT`
    Url(String),
    /// `{name, url}` object
    #[serde(deserialize_with = "object_only")]
    Object(LicenseObject),
}

/// Object form of a [`License`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LicenseObject {
    /// License name
    #[serde(default)]
    pub name: Option<String>,
    /// License URL
    #[serde(default)]
    pub url: Option<String>,
}

impl License {
    /// License name; a bare URL has none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Object(object) => object.name.as_deref(),
        }
    }

    /// License URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Object(object) => object.url.as_deref(),
        }
    }
}

/// A keyword, given as plain text or as a `DefinedTerm`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Keyword {
    /// Plain keyword
    Text(String),
    /// Term from a controlled vocabulary
    #[serde(deserialize_with = "object_only")]
    Term(DefinedTerm),
}

/// A term from a controlled vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinedTerm {
    /// `@type`, normally `DefinedTerm`
    #[serde(rename = "@type", default)]
    pub kind: Option<String>,
    /// Term label
    #[serde(default)]
    pub name: Option<String>,
    /// URI of the vocabulary
    #[serde(default)]
    pub in_defined_term_set: Option<String>,
    /// URI of the term
    #[serde(default)]
    pub url: Option<String>,
}

/// A funding statement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Funding {
    /// Free-text funding source
    Text(String),
    /// Structured grant
    #[serde(deserialize_with = "object_only")]
    Grant(Grant),
}

/// A grant: funder plus award details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Grant {
    /// Funding organization; only the first entry of a list is kept
    #[serde(default, deserialize_with = "first_of_many")]
    pub funder: Option<Agent>,
    /// Award number
    #[serde(default, deserialize_with = "opt_text")]
    pub identifier: Option<String>,
    /// Award URI
    #[serde(default)]
    pub url: Option<String>,
    /// Award title
    #[serde(default)]
    pub name: Option<String>,
}

/// The publication describing the software.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReferencePublication {
    /// A DOI, with or without the `https://doi.org/` prefix
    Doi(String),
    /// A nested `ScholarlyArticle`-like record
    #[serde(deserialize_with = "object_only")]
    Work(Box<CreativeWork>),
}

impl ReferencePublication {
    /// DOI of the publication without the URI prefix.
    ///
    /// A string is taken as a DOI with or without prefix; a nested work
    /// only yields a DOI when its `@id` carries the prefix.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        match self {
            Self::Doi(doi) => Some(doi.strip_prefix(DOI_PREFIX).unwrap_or(doi)),
            Self::Work(work) => work.doi(),
        }
    }
}

/// A creative work, possibly part of a larger one.
///
/// Models the `ScholarlyArticle → PublicationIssue/PublicationVolume →
/// Periodical` chain that schema.org uses for journal articles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWork {
    /// `@id`
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    /// `@type`
    #[serde(rename = "@type", default)]
    pub kind: Option<String>,
    /// Title
    #[serde(default)]
    pub name: Option<String>,
    /// Authors
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Vec<Agent>,
    /// First page
    #[serde(default, deserialize_with = "opt_text")]
    pub page_start: Option<String>,
    /// Last page
    #[serde(default, deserialize_with = "opt_text")]
    pub page_end: Option<String>,
    /// Publication date
    #[serde(default, deserialize_with = "opt_text")]
    pub date_published: Option<String>,
    /// Volume number
    #[serde(default, deserialize_with = "opt_text")]
    pub volume_number: Option<String>,
    /// Issue number
    #[serde(default, deserialize_with = "opt_text")]
    pub issue_number: Option<String>,
    /// Enclosing work
    #[serde(default, deserialize_with = "opt_object")]
    pub is_part_of: Option<Box<CreativeWork>>,
}

impl CreativeWork {
    /// `@id` without the DOI prefix, if it is a DOI.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.id.as_deref().and_then(|id| id.strip_prefix(DOI_PREFIX))
    }

    /// Walk the `isPartOf` chain, starting with this work.
    pub fn ancestry(&self) -> impl Iterator<Item = &CreativeWork> {
        std::iter::successors(Some(self), |work| work.is_part_of.as_deref())
    }
}

/// An identifier, given as text or as a schema.org `PropertyValue`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Plain identifier, usually a URL
    Text(String),
    /// `{propertyID, value}` object
    #[serde(deserialize_with = "object_only")]
    Property(PropertyValue),
}

/// A schema.org `PropertyValue`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PropertyValue {
    /// Identifier scheme, e.g. `DOI` or `RADAR`
    #[serde(rename = "propertyID", default)]
    pub property_id: Option<String>,
    /// Identifier value
    #[serde(default, deserialize_with = "opt_text")]
    pub value: Option<String>,
}

impl Identifier {
    /// Value of a `PropertyValue` whose `propertyID` equals `scheme`.
    #[must_use]
    pub fn value_for(&self, scheme: &str) -> Option<&str> {
        match self {
            Self::Property(property) if property.property_id.as_deref() == Some(scheme) => {
                property.value.as_deref()
            },
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

fn first_of_many<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(one_or_many(deserializer)?.into_iter().next())
}

/// Deserialize `T` from a map only; a derived struct would also take an
/// array positionally.
fn object_only<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let map = Map::<String, Value>::deserialize(deserializer)?;
    T::deserialize(Value::Object(map)).map_err(serde::de::Error::custom)
}

fn opt_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(map) => T::deserialize(Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Accept strings, numbers and booleans as text.
fn opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text or number, found {other}"
        ))),
    }
}
