//! Hash-indexed read-only view over one catalog.
//!
//! # Invariants
//!
//! 1. **Immutable after construction**: the index is built once in
//!    [`CatalogStore::new`]; there is no interior mutability, so the store
//!    is freely shared across threads with no locking.
//! 2. **O(1) amortized lookups**: two hash probes (context, then source).
//! 3. **Duplicate policy**: a `(context, source)` pair that appears more
//!    than once keeps the entry authored last; earlier ones are dropped
//!    with a warning at build time.

use rustc_hash::FxHashMap;

use crate::model::{Catalog, Context, Message};

/// Outcome of a single-catalog lookup.
///
/// "Untranslated" (the message exists but carries no servable text) is
/// distinct from "missing" (no such message at all); the resolver reports
/// the two differently even though both ultimately fall back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The message exists and has servable text.
    Translated(&'a Message),
    /// The message exists but its translation is empty or withdrawn.
    Untranslated,
    /// No message with this context and source.
    Missing,
}

/// One catalog plus its lookup index. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalog: Catalog,
    index: FxHashMap<String, FxHashMap<String, (u32, u32)>>,
}

impl CatalogStore {
    /// Wrap a catalog and build its index.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let mut index: FxHashMap<String, FxHashMap<String, (u32, u32)>> = FxHashMap::default();
        for (ci, context) in catalog.contexts().iter().enumerate() {
            let by_source = index.entry(context.name().to_string()).or_default();
            for (mi, message) in context.messages().iter().enumerate() {
                let position = (ci as u32, mi as u32);
                if by_source
                    .insert(message.source().to_string(), position)
                    .is_some()
                {
                    tracing::warn!(
                        locale = catalog.locale(),
                        context = context.name(),
                        source = message.source(),
                        "duplicate catalog entry, keeping the last one"
                    );
                }
            }
        }
        Self { catalog, index }
    }

    /// Look up a message by context name and source text.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str) -> Lookup<'_> {
        let Some(&(ci, mi)) = self.index.get(context).and_then(|m| m.get(source)) else {
            return Lookup::Missing;
        };
        let message = &self.catalog.contexts[ci as usize].messages[mi as usize];
        if message.has_translation() {
            Lookup::Translated(message)
        } else {
            Lookup::Untranslated
        }
    }

    /// Target locale of the wrapped catalog, verbatim as declared.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.catalog.locale()
    }

    /// The wrapped catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether the store knows the given context at all.
    #[must_use]
    pub fn contains_context(&self, context: &str) -> bool {
        self.index.contains_key(context)
    }

    /// Contexts of the wrapped catalog, in document order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.catalog.contexts().iter()
    }

    /// Number of indexed messages (duplicates collapsed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.values().map(FxHashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn store(doc: &str) -> CatalogStore {
        CatalogStore::new(parse(doc.as_bytes()).unwrap())
    }

    fn sv_store() -> CatalogStore {
        store(
            r#"<TS version="2.1" language="sv_SE">
            <context>
                <name>SystemSettingsPage</name>
                <message><source>Check for updates</source><translation>Sök efter uppdateringar</translation></message>
                <message><source>Storage</source><translation></translation></message>
                <message><source>About</source><translation type="vanished">Om</translation></message>
            </context>
            <context>
                <name>SettingsSidebar</name>
                <message><source>System</source><translation>System</translation></message>
            </context>
            </TS>"#,
        )
    }

    #[test]
    fn translated_lookup() {
        let store = sv_store();
        match store.lookup("SystemSettingsPage", "Check for updates") {
            Lookup::Translated(msg) => {
                assert_eq!(msg.singular_text(), Some("Sök efter uppdateringar"));
            }
            other => panic!("expected Translated, got {other:?}"),
        }
    }

    #[test]
    fn empty_translation_is_untranslated_not_missing() {
        let store = sv_store();
        assert_eq!(
            store.lookup("SystemSettingsPage", "Storage"),
            Lookup::Untranslated
        );
    }

    #[test]
    fn vanished_translation_is_untranslated() {
        let store = sv_store();
        assert_eq!(
            store.lookup("SystemSettingsPage", "About"),
            Lookup::Untranslated
        );
    }

    #[test]
    fn unknown_pairs_are_missing() {
        let store = sv_store();
        assert_eq!(
            store.lookup("SystemSettingsPage", "Nonexistent Key"),
            Lookup::Missing
        );
        assert_eq!(store.lookup("NoSuchContext", "System"), Lookup::Missing);
    }

    #[test]
    fn same_source_differs_per_context() {
        let store = store(
            r#"<TS language="de_DE">
            <context><name>A</name>
                <message><source>Open</source><translation>Öffnen</translation></message>
            </context>
            <context><name>B</name>
                <message><source>Open</source><translation>Geöffnet</translation></message>
            </context>
            </TS>"#,
        );
        let a = match store.lookup("A", "Open") {
            Lookup::Translated(m) => m.singular_text().unwrap().to_string(),
            other => panic!("{other:?}"),
        };
        let b = match store.lookup("B", "Open") {
            Lookup::Translated(m) => m.singular_text().unwrap().to_string(),
            other => panic!("{other:?}"),
        };
        assert_eq!(a, "Öffnen");
        assert_eq!(b, "Geöffnet");
    }

    #[test]
    fn duplicate_entry_keeps_the_last_one() {
        let store = store(
            r#"<TS language="en_US">
            <context><name>S</name>
                <message><source>Reset</source><translation>First</translation></message>
                <message><source>Reset</source><translation>Second</translation></message>
            </context>
            </TS>"#,
        );
        assert_eq!(store.len(), 1);
        match store.lookup("S", "Reset") {
            Lookup::Translated(m) => assert_eq!(m.singular_text(), Some("Second")),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn duplicate_across_split_contexts_also_collapses() {
        let store = store(
            r#"<TS language="en_US">
            <context><name>S</name>
                <message><source>Reset</source><translation>First</translation></message>
            </context>
            <context><name>S</name>
                <message><source>Reset</source><translation>Second</translation></message>
            </context>
            </TS>"#,
        );
        match store.lookup("S", "Reset") {
            Lookup::Translated(m) => assert_eq!(m.singular_text(), Some("Second")),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CatalogStore>();
    }

    #[test]
    fn locale_is_preserved_verbatim() {
        assert_eq!(sv_store().locale(), "sv_SE");
    }
}
