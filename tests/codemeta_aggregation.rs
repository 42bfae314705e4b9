//! Integration tests for fetching, merging and cleaning up CodeMeta records.

mod common;

use codemeta_crosswalk::{CodemetaMetadata, Fetcher, MetadataError};
use common::data_path;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::fs;

fn load(name: &str) -> Value {
    let text = fs::read_to_string(data_path(name)).expect("Could not read fixture");
    serde_json::from_str(&text).expect("Fixture is not valid JSON")
}

fn person_list(metadata: &CodemetaMetadata, key: &str) -> Vec<Value> {
    metadata
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[test]
fn test_fetch_matches_source() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata
        .fetch(&fetcher, &[data_path("codemeta_test.json")])
        .expect("Failed to fetch");

    let fetched = serde_json::to_value(metadata.data()).unwrap();
    assert_eq!(fetched, load("codemeta_test.json"));
}

#[test]
fn test_fetch_yaml_overlay_keeps_key_position() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata
        .fetch(
            &fetcher,
            &[data_path("codemeta_test.json"), data_path("codemeta_overlay.yml")],
        )
        .expect("Failed to fetch");

    assert_eq!(metadata.get("version"), Some(&json!("1.1")));
    assert_eq!(metadata.get("name"), Some(&json!("Simulation Toolkit")));
    assert_eq!(
        metadata.get("keywords"),
        Some(&json!(["electrophysiology", "simulation"]))
    );

    let keys: Vec<&str> = metadata.data().keys().map(String::as_str).collect();
    assert_eq!(&keys[..6], ["@context", "@type", "@id", "name", "description", "version"]);
}

#[test]
fn test_fetch_authors_contains_every_source_author() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata.fetch(&fetcher, &[data_path("codemeta_test.json")]).unwrap();
    metadata
        .fetch_authors(
            &fetcher,
            &[data_path("codemeta_test.json"), data_path("authors_test.json")],
        )
        .expect("Failed to fetch authors");

    let authors = person_list(&metadata, "author");
    assert_eq!(authors.len(), 6);
    for author in load("authors_test.json")["author"].as_array().unwrap() {
        assert!(authors.contains(author), "missing {author}");
    }
}

#[test]
fn test_fetch_contributors_appends_to_existing() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata.fetch(&fetcher, &[data_path("codemeta_test.json")]).unwrap();
    metadata
        .fetch_contributors(&fetcher, &[data_path("contributors_test.json")])
        .expect("Failed to fetch contributors");

    let contributors = person_list(&metadata, "contributor");
    assert_eq!(contributors.len(), 3);
    assert_eq!(contributors[0]["givenName"], "Grace");
    for contributor in load("contributors_test.json")["contributor"].as_array().unwrap() {
        assert!(contributors.contains(contributor), "missing {contributor}");
    }
}

#[test]
fn test_full_cleanup_pipeline() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata.fetch(&fetcher, &[data_path("codemeta_test.json")]).unwrap();
    metadata
        .fetch_authors(
            &fetcher,
            &[data_path("codemeta_test.json"), data_path("authors_test.json")],
        )
        .unwrap();
    metadata
        .fetch_contributors(&fetcher, &[data_path("contributors_test.json")])
        .unwrap();

    metadata.compute_names();
    metadata.remove_doubles();
    metadata.sort_persons();

    let names = |key: &str| -> Vec<String> {
        person_list(&metadata, key)
            .iter()
            .map(|p| p["name"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    // Organizations first, by name; persons by family name
    assert_eq!(names("author"), ["Simulation Lab", "Ada Lovelace", "Alan Turing"]);
    // Organizations with an additionalType go last
    assert_eq!(
        names("contributor"),
        ["Grace Hopper", "Barbara Liskov", "Research Software Center"]
    );

    // The first occurrence of Ada Lovelace keeps its affiliation
    let ada = &person_list(&metadata, "author")[1];
    assert_eq!(ada["affiliation"]["name"], "Karlsruhe Institute of Technology");
}

#[test]
fn test_fetch_authors_without_locations_leaves_record_untouched() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    metadata.fetch_authors::<&str>(&fetcher, &[]).unwrap();
    assert!(metadata.get("author").is_none());
}

#[test]
fn test_fetch_missing_file() {
    let fetcher = Fetcher::new().unwrap();
    let mut metadata = CodemetaMetadata::new();
    let err = metadata
        .fetch(&fetcher, &[data_path("does_not_exist.json")])
        .unwrap_err();
    assert!(matches!(err, MetadataError::Fetch(_)));
}

#[test]
fn test_write_and_refetch() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("codemeta.json");

    let metadata = common::prepared_metadata();
    metadata.write(&target).expect("Failed to write");

    let fetcher = Fetcher::new().unwrap();
    let mut reread = CodemetaMetadata::new();
    reread
        .fetch(&fetcher, &[target.display().to_string()])
        .expect("Failed to refetch");
    assert_eq!(reread, metadata);
}

fn person_strategy() -> impl Strategy<Value = Value> {
    (
        prop::option::of("[A-C][a-c]{0,2}"),
        prop::option::of("[A-C][a-c]{0,2}"),
        prop::option::of("[A-C][a-c]{0,2} [A-C][a-c]{0,2}"),
        prop::bool::ANY,
    )
        .prop_map(|(given, family, name, organization)| {
            let mut person = serde_json::Map::new();
            let kind = if organization { "Organization" } else { "Person" };
            person.insert("@type".to_string(), json!(kind));
            if let Some(given) = given {
                person.insert("givenName".to_string(), json!(given));
            }
            if let Some(family) = family {
                person.insert("familyName".to_string(), json!(family));
            }
            if let Some(name) = name {
                person.insert("name".to_string(), json!(name));
            }
            Value::Object(person)
        })
}

fn with_authors(authors: Vec<Value>) -> CodemetaMetadata {
    let mut metadata = CodemetaMetadata::new();
    metadata.set("author", Value::Array(authors));
    metadata
}

proptest! {
    #[test]
    fn prop_compute_names_is_idempotent(authors in prop::collection::vec(person_strategy(), 0..8)) {
        let mut once = with_authors(authors);
        once.compute_names();
        let mut twice = once.clone();
        twice.compute_names();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_remove_doubles_keeps_first_occurrences(authors in prop::collection::vec(person_strategy(), 0..8)) {
        let mut metadata = with_authors(authors.clone());
        metadata.remove_doubles();
        let kept = person_list(&metadata, "author");

        // Kept entries are a subsequence of the input
        let mut remaining = authors.iter();
        for person in &kept {
            prop_assert!(remaining.any(|candidate| candidate == person));
        }

        // No name survives twice
        let mut names: Vec<&str> = kept.iter().filter_map(|p| p["name"].as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), total);

        // The first entry always survives
        if let Some(first) = authors.first() {
            prop_assert_eq!(kept.first(), Some(first));
        }
    }

    #[test]
    fn prop_sort_persons_is_a_permutation(authors in prop::collection::vec(person_strategy(), 0..8)) {
        let mut metadata = with_authors(authors.clone());
        metadata.sort_persons();
        let sorted = person_list(&metadata, "author");

        prop_assert_eq!(sorted.len(), authors.len());
        for person in &authors {
            prop_assert!(sorted.contains(person));
        }
    }
}
