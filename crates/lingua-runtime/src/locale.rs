//! Locale tag handling: normalization, parent chains, system detection.
//!
//! Tags arrive in several shapes — `sv_SE`, `sv-SE`, `sv_SE.UTF-8`,
//! `sv_SE@euro` — and all of them must address the same catalog.
//! [`normalize`] maps them onto a single canonical form (`sv-SE`); every
//! registry and resolver entry point normalizes before touching the locale
//! map, so callers never need to care which shape they hold.

use std::env;

use smallvec::SmallVec;

/// Fallback chains are short: requested + parents + default + parents.
pub(crate) type LocaleVec = SmallVec<[String; 4]>;

/// Normalize a locale tag to canonical `ll-RR` form.
///
/// Trims whitespace, drops `.codeset` and `@modifier` suffixes, and maps
/// `_` separators to `-`. Returns `None` for tags with no usable content,
/// including the `C` and `POSIX` pseudo-locales.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.split(['@', '.']).next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(raw.replace('_', "-"))
}

/// Successive truncations of a normalized tag, most specific first.
///
/// `"sv-SE"` yields `["sv-SE", "sv"]`; a bare `"sv"` yields itself only.
#[must_use]
pub fn parent_chain(tag: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = tag;
    loop {
        chain.push(current.to_string());
        match current.rfind('-') {
            Some(i) if i > 0 => current = &current[..i],
            _ => break,
        }
    }
    chain
}

/// Detect the preferred locale from the environment.
///
/// Checks `LC_ALL`, then `LANG`. Returns `None` when neither names a real
/// locale, leaving the choice of default to the caller.
#[must_use]
pub fn detect_system_locale() -> Option<String> {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_from(lc_all.as_deref(), lang.as_deref())
}

fn detect_from(lc_all: Option<&str>, lang: Option<&str>) -> Option<String> {
    lc_all
        .and_then(normalize)
        .or_else(|| lang.and_then(normalize))
}

/// The ordered locales tried during one resolution.
///
/// Built per call from the requested locale and the registry's default:
/// the requested tag and its parents, then the default and its parents,
/// deduplicated. Walking the chain front to back implements
/// "regional variant → base language → default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    locales: LocaleVec,
}

impl FallbackChain {
    /// Build the chain for one resolution.
    #[must_use]
    pub fn for_locale(requested: &str, default_locale: &str) -> Self {
        let mut locales = LocaleVec::new();
        let mut push_with_parents = |tag: &str| {
            for parent in parent_chain(tag) {
                if !locales.iter().any(|l| *l == parent) {
                    locales.push(parent);
                }
            }
        };
        if let Some(tag) = normalize(requested) {
            push_with_parents(&tag);
        }
        if let Some(tag) = normalize(default_locale) {
            push_with_parents(&tag);
        }
        Self { locales }
    }

    /// Locales in fallback order, most specific first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}
