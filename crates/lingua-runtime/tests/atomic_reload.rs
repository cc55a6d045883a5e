//! Concurrent reload semantics: readers observe either the fully-old or
//! the fully-new catalog for a locale, never a mix.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use lingua_catalog::{CatalogStore, Lookup, parse};
use lingua_runtime::{Registry, Resolver};

const KEYS: usize = 32;

/// A catalog where every key maps to `"<generation>:<key>"`.
fn generation_store(generation: usize) -> CatalogStore {
    let mut doc = String::from("<TS language=\"de_DE\"><context><name>Page</name>\n");
    for k in 0..KEYS {
        doc.push_str(&format!(
            "<message><source>Key{k}</source><translation>{generation}:Key{k}</translation></message>\n"
        ));
    }
    doc.push_str("</context></TS>");
    CatalogStore::new(parse(doc.as_bytes()).unwrap())
}

#[test]
fn snapshots_are_never_torn() {
    let registry = Arc::new(Registry::new("en"));
    registry.register(generation_store(0));

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let registry = Arc::clone(&registry);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut generation = 1;
            while !stop.load(Ordering::Acquire) {
                registry.register(generation_store(generation));
                generation += 1;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = registry.snapshot();
                    let store = snapshot.get("de-DE").expect("locale must stay registered");
                    // every key in one snapshot must come from one generation
                    let mut seen_generation: Option<String> = None;
                    for k in 0..KEYS {
                        let key = format!("Key{k}");
                        let Lookup::Translated(msg) = store.lookup("Page", &key) else {
                            panic!("key {key} must be translated in every generation");
                        };
                        let text = msg.singular_text().unwrap();
                        let (generation, suffix) = text.split_once(':').unwrap();
                        assert_eq!(suffix, key);
                        match &seen_generation {
                            None => seen_generation = Some(generation.to_string()),
                            Some(first) => assert_eq!(
                                generation, first,
                                "snapshot mixed generations {first} and {generation}"
                            ),
                        }
                    }
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    stop.store(true, Ordering::Release);
    writer.join().expect("writer panicked");
}

#[test]
fn resolution_stays_total_during_reloads() {
    let registry = Arc::new(Registry::new("en"));
    registry.register(generation_store(0));
    let resolver = Arc::new(Resolver::new(Arc::clone(&registry)));

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let registry = Arc::clone(&registry);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut generation = 1;
            while !stop.load(Ordering::Acquire) {
                registry.register(generation_store(generation));
                generation += 1;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for i in 0..2000 {
                    let key = format!("Key{}", i % KEYS);
                    let resolved = resolver.resolve("Page", &key, "de_DE");
                    assert!(resolved.ends_with(&key), "unexpected result {resolved}");
                    assert!(!resolved.is_empty());
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    stop.store(true, Ordering::Release);
    writer.join().expect("writer panicked");

    // every resolution hit; the miss log must be clean
    assert_eq!(resolver.misses().total(), 0);
}
