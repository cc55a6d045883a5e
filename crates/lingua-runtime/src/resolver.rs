//! Total translation resolution with locale fallback.
//!
//! # Invariants
//!
//! 1. **Total**: every resolve variant returns a displayable, non-empty
//!    string (the source text when resolution degrades). No error type, no
//!    `Option`, no panic.
//! 2. **One snapshot per call**: the registry is read exactly once at the
//!    start of a call; a concurrent reload cannot produce a torn result.
//! 3. **Non-blocking**: after the snapshot clone there is no locking; the
//!    miss log is touched only on the fallback path.

use std::sync::Arc;

use lingua_catalog::{Lookup, Message, PluralRule};

use crate::locale::FallbackChain;
use crate::registry::Registry;
use crate::telemetry::{MissKind, MissLog};

/// Resolves (context, source) pairs to translated text.
///
/// Cheap to construct; typically one per process, created right after the
/// registry is populated. See the crate docs for the wiring example.
#[derive(Debug)]
pub struct Resolver {
    registry: Arc<Registry>,
    misses: MissLog,
}

impl Resolver {
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            misses: MissLog::new(),
        }
    }

    /// The registry this resolver reads from.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Miss telemetry accumulated by this resolver.
    #[must_use]
    pub fn misses(&self) -> &MissLog {
        &self.misses
    }

    /// Resolve `source` within `context` for an explicit locale.
    ///
    /// Walks the locale's fallback chain and returns the first servable
    /// translation; degrades to `source` itself when nothing better
    /// exists. A plural message resolved without a count yields its first
    /// authored variant.
    #[must_use]
    pub fn resolve(&self, context: &str, source: &str, locale: &str) -> String {
        self.resolve_inner(context, source, locale, None)
    }

    /// Resolve a plural message, selecting the variant for `count`.
    ///
    /// The variant is chosen by the plural rule of the locale that supplied
    /// the translation, not the requested one; a catalog shipping fewer
    /// variants than the rule distinguishes serves its last variant.
    #[must_use]
    pub fn resolve_plural(&self, context: &str, source: &str, locale: &str, count: u64) -> String {
        self.resolve_inner(context, source, locale, Some(count))
    }

    /// [`resolve`](Self::resolve) against the registry's active locale.
    #[must_use]
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.resolve_inner(context, source, &self.registry.active(), None)
    }

    /// [`resolve_plural`](Self::resolve_plural) against the active locale.
    #[must_use]
    pub fn trn(&self, context: &str, source: &str, count: u64) -> String {
        self.resolve_inner(context, source, &self.registry.active(), Some(count))
    }

    fn resolve_inner(
        &self,
        context: &str,
        source: &str,
        locale: &str,
        count: Option<u64>,
    ) -> String {
        let snapshot = self.registry.snapshot();
        let chain = FallbackChain::for_locale(locale, self.registry.default_locale());

        let mut found_entry = false;
        for tag in chain.iter() {
            let Some(store) = snapshot.get(tag) else {
                continue;
            };
            match store.lookup(context, source) {
                Lookup::Translated(message) => {
                    if let Some(text) = select_text(message, tag, count) {
                        return text;
                    }
                    // the specific variant was empty; keep falling back
                    found_entry = true;
                }
                Lookup::Untranslated => found_entry = true,
                Lookup::Missing => {}
            }
        }

        let kind = if found_entry {
            MissKind::Untranslated
        } else {
            MissKind::Missing
        };
        self.misses.record(locale, context, source, kind);
        source.to_string()
    }
}

/// Pick the servable text of a translated message, if any.
///
/// Returns `None` when the selected plural variant is empty, which sends
/// the resolver on to the next locale in the chain.
fn select_text(message: &Message, locale_tag: &str, count: Option<u64>) -> Option<String> {
    if let Some(forms) = message.plural_forms() {
        if forms.is_empty() {
            return None;
        }
        let index = match count {
            Some(n) => PluralRule::for_locale(locale_tag)
                .variant_index(n)
                .min(forms.len() - 1),
            None => 0,
        };
        let form = &forms[index];
        if form.is_empty() { None } else { Some(form.clone()) }
    } else {
        let text = message.singular_text().unwrap_or_default();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
