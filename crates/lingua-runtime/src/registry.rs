//! Registry of loaded catalogs, one store per locale.
//!
//! The registry is the only mutable shared structure in the engine, and it
//! mutates by replacement, never in place: the locale map lives behind an
//! `RwLock<Arc<…>>`, readers clone the `Arc` ([`Registry::snapshot`]) and
//! work on a frozen map, and [`Registry::register`] builds a fresh map and
//! swaps it in whole.
//!
//! # Invariants
//!
//! 1. **No torn reads**: a resolve call that took its snapshot before a
//!    reload keeps seeing the complete old catalog until it finishes; the
//!    next call sees the complete new one.
//! 2. **Normalized keys**: every locale entering the registry goes through
//!    [`crate::locale::normalize`], so `sv_SE` and `sv-SE` address the
//!    same store.
//! 3. **Old stores outlive their readers**: a replaced store is dropped
//!    only when the last in-flight snapshot referencing it is dropped.
//!
//! Construct one registry at startup and hand it to whoever resolves
//! (dependency injection); tests can run any number of independent
//! registries side by side.

use std::fmt;
use std::sync::{Arc, RwLock};

use lingua_catalog::CatalogStore;
use rustc_hash::FxHashMap;

use crate::locale;

pub(crate) type LocaleMap = FxHashMap<String, Arc<CatalogStore>>;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No catalog is registered for the requested locale.
    UnknownLocale(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocale(tag) => {
                write!(f, "no catalog registered for locale `{tag}`")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The set of loaded locales plus the active one.
#[derive(Debug)]
pub struct Registry {
    stores: RwLock<Arc<LocaleMap>>,
    active: RwLock<String>,
    default_locale: String,
}

impl Registry {
    /// Create an empty registry.
    ///
    /// `default_locale` terminates every fallback chain and is the initial
    /// active locale. An unusable tag (empty, `C`, `POSIX`) falls back to
    /// `"en"`.
    #[must_use]
    pub fn new(default_locale: &str) -> Self {
        let default_locale =
            locale::normalize(default_locale).unwrap_or_else(|| "en".to_string());
        Self {
            stores: RwLock::new(Arc::new(LocaleMap::default())),
            active: RwLock::new(default_locale.clone()),
            default_locale,
        }
    }

    /// Register a catalog store, replacing any store for the same locale.
    ///
    /// The swap is atomic with respect to readers: in-flight resolve calls
    /// keep the snapshot they started with, later calls see the new store.
    pub fn register(&self, store: CatalogStore) {
        let tag = locale::normalize(store.locale())
            .unwrap_or_else(|| self.default_locale.clone());
        let messages = store.len();
        let store = Arc::new(store);

        let mut guard = self.stores.write().unwrap_or_else(|e| e.into_inner());
        let mut next = LocaleMap::clone(&guard);
        next.insert(tag.clone(), store);
        *guard = Arc::new(next);
        drop(guard);

        tracing::info!(locale = %tag, messages, "catalog registered");
    }

    /// Drop the catalog for a locale, if present.
    ///
    /// In-flight readers keep their snapshot; the active locale is left
    /// untouched (resolution through it degrades to fallback).
    pub fn deregister(&self, locale_tag: &str) {
        let Some(tag) = locale::normalize(locale_tag) else {
            return;
        };
        let mut guard = self.stores.write().unwrap_or_else(|e| e.into_inner());
        if !guard.contains_key(&tag) {
            return;
        }
        let mut next = LocaleMap::clone(&guard);
        next.remove(&tag);
        *guard = Arc::new(next);
        drop(guard);

        tracing::info!(locale = %tag, "catalog deregistered");
    }

    /// One consistent view of the locale map, frozen at call time.
    #[must_use]
    pub fn snapshot(&self) -> Arc<LocaleMap> {
        Arc::clone(&self.stores.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// The store for a locale, if registered.
    #[must_use]
    pub fn store(&self, locale_tag: &str) -> Option<Arc<CatalogStore>> {
        let tag = locale::normalize(locale_tag)?;
        self.snapshot().get(&tag).cloned()
    }

    /// Switch the active locale.
    ///
    /// Fails with [`RegistryError::UnknownLocale`] when no catalog is
    /// registered for the tag; the previous active locale stays in effect.
    /// Reselecting the current locale is a no-op.
    pub fn set_active(&self, locale_tag: &str) -> Result<(), RegistryError> {
        let tag = locale::normalize(locale_tag)
            .ok_or_else(|| RegistryError::UnknownLocale(locale_tag.to_string()))?;

        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if *active == tag {
            return Ok(());
        }
        if !self.snapshot().contains_key(&tag) {
            return Err(RegistryError::UnknownLocale(tag));
        }
        *active = tag.clone();
        drop(active);

        tracing::info!(locale = %tag, "active locale changed");
        Ok(())
    }

    /// The locale used when callers do not name one.
    #[must_use]
    pub fn active(&self) -> String {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The locale terminating every fallback chain.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Whether a catalog is registered for the locale.
    #[must_use]
    pub fn contains(&self, locale_tag: &str) -> bool {
        locale::normalize(locale_tag)
            .is_some_and(|tag| self.snapshot().contains_key(&tag))
    }

    /// Registered locales, sorted.
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.snapshot().keys().cloned().collect();
        tags.sort_unstable();
        tags
    }
}
