//! Miss accounting for authoring follow-up.
//!
//! A resolution that degrades to the source text is not an error, but it is
//! a signal someone wants: either a catalog entry exists and is waiting on
//! a translator (*untranslated*), or no catalog in the chain knows the
//! string at all (*missing*, usually a string the extraction run hasn't
//! picked up yet). The two cases produce the identical displayed string, so
//! this log is the only place they stay distinguishable.
//!
//! Counters are atomics; the bounded ring of recent misses is the only
//! locked structure, and it is touched only on the miss path, never on a
//! successful resolve.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// How many recent misses are retained for inspection.
pub const RECENT_CAP: usize = 128;

/// Why a resolution fell back to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// No catalog in the fallback chain has the (context, source) pair.
    Missing,
    /// At least one catalog has the pair, but with no servable text.
    Untranslated,
}

/// One recorded fallback, as seen at the original request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    pub locale: String,
    pub context: String,
    pub source: String,
    pub kind: MissKind,
}

/// Shared miss log. Cheap to record, bounded in memory.
#[derive(Debug, Default)]
pub struct MissLog {
    missing: AtomicU64,
    untranslated: AtomicU64,
    recent: Mutex<VecDeque<Miss>>,
}

impl MissLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, locale: &str, context: &str, source: &str, kind: MissKind) {
        match kind {
            MissKind::Missing => self.missing.fetch_add(1, Ordering::Relaxed),
            MissKind::Untranslated => self.untranslated.fetch_add(1, Ordering::Relaxed),
        };
        tracing::debug!(locale, context, source, kind = ?kind, "translation miss");

        let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        if recent.len() == RECENT_CAP {
            recent.pop_front();
        }
        recent.push_back(Miss {
            locale: locale.to_string(),
            context: context.to_string(),
            source: source.to_string(),
            kind,
        });
    }

    /// Resolutions that found no entry anywhere in the chain.
    #[must_use]
    pub fn missing_count(&self) -> u64 {
        self.missing.load(Ordering::Relaxed)
    }

    /// Resolutions that found only untranslated entries.
    #[must_use]
    pub fn untranslated_count(&self) -> u64 {
        self.untranslated.load(Ordering::Relaxed)
    }

    /// Total fallbacks of either kind.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.missing_count() + self.untranslated_count()
    }

    /// The most recent misses, oldest first (bounded at [`RECENT_CAP`]).
    #[must_use]
    pub fn recent(&self) -> Vec<Miss> {
        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Reset counters and the recent ring.
    pub fn clear(&self) {
        self.missing.store(0, Ordering::Relaxed);
        self.untranslated.store(0, Ordering::Relaxed);
        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
