//! Aggregation of CodeMeta records from several sources.
//!
//! [`CodemetaMetadata`] holds the canonical metadata record for one run: an
//! insertion-ordered map of CodeMeta keys to JSON values. It is filled from
//! one or more CodeMeta files, extended with extra author and contributor
//! lists, cleaned up (derived names, duplicates, ordering) and then handed
//! to the renderers as a typed [`Codemeta`] view.
//!
//! # Examples
//!
//! ```ignore
//! use codemeta_crosswalk::{CodemetaMetadata, Fetcher};
//!
//! let fetcher = Fetcher::new()?;
//! let mut codemeta = CodemetaMetadata::new();
//! codemeta.fetch(&fetcher, &["codemeta.json"])?;
//! codemeta.fetch_authors(&fetcher, &["authors.json"])?;
//! codemeta.compute_names();
//! codemeta.remove_doubles();
//! codemeta.sort_persons();
//!
//! println!("{}", codemeta.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{MetadataError, Result};
use crate::fetch::Fetcher;
use crate::model::Codemeta;

/// Keys holding Person-or-Organization lists.
const PERSON_KEYS: [&str; 2] = ["author", "contributor"];

/// The canonical CodeMeta record of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodemetaMetadata {
    data: IndexMap<String, Value>,
}

impl CodemetaMetadata {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying ordered map.
    #[must_use]
    pub fn data(&self) -> &IndexMap<String, Value> {
        &self.data
    }

    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a top-level key, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Shallow-merge a mapping into the record; later keys overwrite earlier.
    pub fn merge(&mut self, map: impl IntoIterator<Item = (String, Value)>) {
        for (key, value) in map {
            self.data.insert(key, value);
        }
    }

    /// Fetch CodeMeta files and shallow-merge each into the record in order.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Fetch`] if any location cannot be fetched.
    pub fn fetch<S: AsRef<str>>(&mut self, fetcher: &Fetcher, locations: &[S]) -> Result<()> {
        for location in locations {
            let location = location.as_ref();
            info!(location, "merging codemeta source");
            self.merge(fetcher.fetch_dict(location)?);
        }
        Ok(())
    }

    /// Fetch CodeMeta files and append their `author` lists to the record.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Fetch`] if any location cannot be fetched.
    pub fn fetch_authors<S: AsRef<str>>(&mut self, fetcher: &Fetcher, locations: &[S]) -> Result<()> {
        self.fetch_persons("author", fetcher, locations)
    }

    /// Fetch CodeMeta files and append their `contributor` lists to the record.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Fetch`] if any location cannot be fetched.
    pub fn fetch_contributors<S: AsRef<str>>(
        &mut self,
        fetcher: &Fetcher,
        locations: &[S],
    ) -> Result<()> {
        self.fetch_persons("contributor", fetcher, locations)
    }

    fn fetch_persons<S: AsRef<str>>(
        &mut self,
        key: &str,
        fetcher: &Fetcher,
        locations: &[S],
    ) -> Result<()> {
        if locations.is_empty() {
            return Ok(());
        }

        self.extend_persons(key, None);
        for location in locations {
            let location = location.as_ref();
            info!(location, key, "appending persons");
            let mut source = fetcher.fetch_dict(location)?;
            self.extend_persons(key, source.remove(key));
        }
        Ok(())
    }

    /// Append entries to the `author` list.
    ///
    /// `entries` may be a list or a single object. A missing `author` field
    /// is initialised to an empty list and a single object is wrapped into a
    /// list before appending.
    pub fn extend_authors(&mut self, entries: Value) {
        self.extend_persons("author", Some(entries));
    }

    /// Append entries to the `contributor` list.
    ///
    /// Same normalisation rules as [`CodemetaMetadata::extend_authors`].
    pub fn extend_contributors(&mut self, entries: Value) {
        self.extend_persons("contributor", Some(entries));
    }

    fn extend_persons(&mut self, key: &str, entries: Option<Value>) {
        let slot = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        let mut persons = into_person_list(slot.take());
        if let Some(entries) = entries {
            persons.extend(into_person_list(entries));
        }
        *slot = Value::Array(persons);
    }

    /// Derive `name` as `givenName familyName` where it is missing.
    ///
    /// Existing names are never overwritten, so this is idempotent.
    pub fn compute_names(&mut self) {
        self.update_persons(|mut persons| {
            persons.iter_mut().for_each(compute_name);
            persons
        });
    }

    /// Drop repeated persons, keeping the first occurrence.
    ///
    /// An entry is a repeat when its `@id` or its `name` was already seen in
    /// the same list.
    pub fn remove_doubles(&mut self) {
        self.update_persons(remove_doubles);
    }

    /// Stable-sort authors and contributors by [`person_sort_key`].
    pub fn sort_persons(&mut self) {
        self.update_persons(|mut persons| {
            persons.sort_by_cached_key(person_sort_key);
            persons
        });
    }

    fn update_persons(&mut self, update: impl Fn(Vec<Value>) -> Vec<Value>) {
        for key in PERSON_KEYS {
            if let Some(slot) = self.data.get_mut(key) {
                let persons = into_person_list(slot.take());
                *slot = Value::Array(update(persons));
            }
        }
    }

    /// Serialize the record as indented JSON, keeping non-ASCII characters.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.data)
            .map_err(|e| MetadataError::Serialization(format!("Failed to serialize CodeMeta: {e}")))
    }

    /// Write the record as indented JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "writing codemeta");
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Resolve the record into the typed view used by the renderers.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaMapping`] if a field has a shape that
    /// none of the supported variants accepts.
    pub fn to_codemeta(&self) -> Result<Codemeta> {
        let object: Map<String, Value> = self
            .data
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        serde_json::from_value(Value::Object(object)).map_err(|e| {
            MetadataError::SchemaMapping(format!("Failed to resolve CodeMeta record: {e}"))
        })
    }
}

impl From<Map<String, Value>> for CodemetaMetadata {
    fn from(map: Map<String, Value>) -> Self {
        let mut metadata = Self::new();
        metadata.merge(map);
        metadata
    }
}

/// Normalise a person field into a list.
fn into_person_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

fn compute_name(person: &mut Value) {
    let Some(object) = person.as_object_mut() else {
        return;
    };
    if object.contains_key("name") {
        return;
    }

    let given = object.get("givenName").and_then(Value::as_str);
    let family = object.get("familyName").and_then(Value::as_str);
    let name = match (given, family) {
        (Some(given), Some(family)) => format!("{given} {family}"),
        _ => return,
    };
    object.insert("name".to_string(), Value::String(name));
}

fn remove_doubles(persons: Vec<Value>) -> Vec<Value> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    persons
        .into_iter()
        .filter(|person| {
            let id = identity(person, "@id");
            let name = identity(person, "name");

            let seen = id.as_ref().is_some_and(|id| ids.contains(id))
                || name.as_ref().is_some_and(|name| names.contains(name));
            if seen {
                debug!(?id, ?name, "dropping duplicate person");
                return false;
            }

            ids.extend(id);
            names.extend(name);
            true
        })
        .collect()
}

fn identity(person: &Value, key: &str) -> Option<String> {
    match person.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Sort key for a Person-or-Organization entry.
///
/// The base key is `familyName`, else `name`, else the empty string.
/// Organizations are prefixed with `!` so they sort before persons, or with
/// `~` when they carry an `additionalType` so they sort after them.
#[must_use]
pub fn person_sort_key(person: &Value) -> String {
    let base = person
        .get("familyName")
        .and_then(Value::as_str)
        .or_else(|| person.get("name").and_then(Value::as_str))
        .unwrap_or_default();

    if person.get("@type").and_then(Value::as_str) == Some("Organization") {
        let marker = if person.get("additionalType").map_or(true, Value::is_null) {
            '!'
        } else {
            '~'
        };
        format!("{marker}{base}")
    } else {
        base.to_string()
    }
}
