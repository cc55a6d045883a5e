//! Loader behavior against real files: discovery, publishing, failure
//! isolation, and cancellation.

use std::fs;
use std::sync::Arc;

use lingua_runtime::{LoadError, LoaderConfig, Registry, Resolver, discover, load_into, spawn_load};

const SV_DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="sv_SE">
<context><name>Page</name>
    <message><source>Storage</source><translation>Lagring</translation></message>
</context></TS>"#;

const DE_DOC: &str = r#"<TS version="2.1" language="de_DE">
<context><name>Page</name>
    <message><source>Storage</source><translation>Speicher</translation></message>
</context></TS>"#;

#[test]
fn discover_finds_only_matching_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings_sv_SE.ts"), SV_DOC).unwrap();
    fs::write(dir.path().join("settings_de_DE.ts"), DE_DOC).unwrap();
    fs::write(dir.path().join("other_fr_FR.ts"), "").unwrap();
    fs::write(dir.path().join("settings_nb_NO.txt"), "").unwrap();
    fs::write(dir.path().join("README.md"), "not a catalog").unwrap();

    let config = LoaderConfig::new(dir.path(), "settings");
    let found = discover(&config).unwrap();
    let locales: Vec<&str> = found.iter().map(|f| f.locale.as_str()).collect();
    assert_eq!(locales, ["de_DE", "sv_SE"]);
    assert_eq!(found[1].path, config.path_for("sv_SE"));
}

#[test]
fn load_into_publishes_to_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings_sv_SE.ts");
    fs::write(&path, SV_DOC).unwrap();

    let registry = Registry::new("en");
    load_into(&path, &registry).unwrap();
    assert!(registry.contains("sv-SE"));
}

#[test]
fn failed_load_keeps_the_previous_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings_sv_SE.ts");
    fs::write(&path, SV_DOC).unwrap();

    let registry = Arc::new(Registry::new("en"));
    load_into(&path, &registry).unwrap();

    // a broken re-export lands on disk
    fs::write(&path, "<TS language=\"sv_SE\"><context>").unwrap();
    let err = load_into(&path, &registry).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));

    // the earlier catalog is still in service
    let resolver = Resolver::new(Arc::clone(&registry));
    assert_eq!(resolver.resolve("Page", "Storage", "sv_SE"), "Lagring");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::new("en");
    let err = load_into(&dir.path().join("absent.ts"), &registry).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
    assert!(registry.available().is_empty());
}

#[test]
fn background_load_publishes_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings_de_DE.ts");
    fs::write(&path, DE_DOC).unwrap();

    let registry = Arc::new(Registry::new("en"));
    let handle = spawn_load(path, Arc::clone(&registry));
    handle.join().unwrap();
    assert!(registry.contains("de-DE"));
}

#[test]
fn background_load_failure_leaves_registry_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings_de_DE.ts");
    fs::write(&path, "not a catalog at all").unwrap();

    let registry = Arc::new(Registry::new("en"));
    let handle = spawn_load(path, Arc::clone(&registry));
    assert!(handle.join().is_err());
    assert!(registry.available().is_empty());
}

#[test]
fn cancelled_load_never_publishes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings_sv_SE.ts");
    fs::write(&path, SV_DOC).unwrap();

    let registry = Arc::new(Registry::new("en"));
    let handle = spawn_load(path, Arc::clone(&registry));
    handle.cancel();

    // the cancel races the worker: the load either completed before the
    // flag was seen, or it was abandoned; nothing in between is possible
    match handle.join() {
        Ok(()) => assert!(registry.contains("sv-SE")),
        Err(LoadError::Cancelled) => assert!(!registry.contains("sv-SE")),
        Err(other) => panic!("unexpected load error: {other}"),
    }
}
