//! Fixture-driven tests against a realistic vehicle-settings catalog.

use lingua_catalog::{CatalogStore, Lookup, TranslationState, parse};

const SETTINGS_SV_SE: &[u8] = include_bytes!("fixtures/settings_sv_SE.ts");

fn sv_store() -> CatalogStore {
    CatalogStore::new(parse(SETTINGS_SV_SE).expect("fixture must parse"))
}

#[test]
fn fixture_parses_with_expected_shape() {
    let catalog = parse(SETTINGS_SV_SE).unwrap();
    assert_eq!(catalog.locale(), "sv_SE");
    assert_eq!(catalog.format_version(), Some("2.1"));
    let names: Vec<&str> = catalog.contexts().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        ["SettingsSidebar", "SystemSettingsPage", "LanguageSettings"]
    );
    assert_eq!(catalog.message_count(), 26);
}

#[test]
fn translated_entries_resolve_exactly() {
    let store = sv_store();
    match store.lookup("SystemSettingsPage", "Check for updates") {
        Lookup::Translated(msg) => {
            assert_eq!(msg.singular_text(), Some("Sök efter uppdateringar"));
        }
        other => panic!("expected Translated, got {other:?}"),
    }
}

#[test]
fn entity_escapes_decode_to_authored_text() {
    let store = sv_store();
    match store.lookup("SettingsSidebar", "Date & Time") {
        Lookup::Translated(msg) => {
            assert_eq!(msg.source(), "Date & Time");
            assert_eq!(msg.singular_text(), Some("Datum & Tid"));
        }
        other => panic!("expected Translated, got {other:?}"),
    }
}

#[test]
fn same_source_is_keyed_per_context() {
    let store = sv_store();
    assert!(matches!(
        store.lookup("SettingsSidebar", "System"),
        Lookup::Translated(_)
    ));
    assert!(matches!(
        store.lookup("SystemSettingsPage", "System"),
        Lookup::Translated(_)
    ));
    assert!(matches!(
        store.lookup("LanguageSettings", "System"),
        Lookup::Missing
    ));
}

#[test]
fn unfinished_empty_entry_is_untranslated() {
    let store = sv_store();
    assert!(matches!(
        store.lookup("SystemSettingsPage", "Maps"),
        Lookup::Untranslated
    ));
    let maps = store
        .catalog()
        .contexts()
        .iter()
        .find(|c| c.name() == "SystemSettingsPage")
        .and_then(|c| c.messages().iter().find(|m| m.source() == "Maps"))
        .unwrap();
    assert_eq!(maps.state(), TranslationState::Unfinished);
}

#[test]
fn numerus_entry_keeps_both_forms() {
    let store = sv_store();
    match store.lookup("SystemSettingsPage", "%n update(s) available") {
        Lookup::Translated(msg) => {
            assert_eq!(
                msg.plural_forms().unwrap(),
                &["%n uppdatering tillgänglig", "%n uppdateringar tillgängliga"]
            );
        }
        other => panic!("expected Translated, got {other:?}"),
    }
}

#[test]
fn long_multiline_entry_survives() {
    let store = sv_store();
    match store.lookup(
        "SystemSettingsPage",
        "Are you sure you want to erase all data and restore settings to default? This cannot be undone.",
    ) {
        Lookup::Translated(msg) => {
            assert!(msg.singular_text().unwrap().starts_with("Är du säker"));
        }
        other => panic!("expected Translated, got {other:?}"),
    }
}
