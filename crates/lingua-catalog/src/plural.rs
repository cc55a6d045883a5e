//! Plural-category rules for selecting among authored plural variants.
//!
//! A plural message ships its variants as an ordered list; the order is the
//! locale's category order (CLDR-style). A [`PluralRule`] categorizes a
//! count and maps the category to a position in that list. Rules are pure
//! functions: same count, same category, always.
//!
//! This is deliberately not a grammar engine — it only chooses which
//! authored variant to serve.

use core::fmt;

/// CLDR-style plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Category rule for one language family.
///
/// [`PluralRule::for_locale`] picks the rule from a locale tag's primary
/// language subtag; unknown languages get the binary [`TwoForm`] split.
///
/// [`TwoForm`]: PluralRule::TwoForm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// `one` for exactly 1, `other` for everything else
    /// (English, German, Swedish, Norwegian, …).
    TwoForm,
    /// `one` for 0 and 1, `other` for everything else (French, Hindi, …).
    TwoFormZeroOne,
    /// `one`/`few`/`many` keyed on the last digits
    /// (Russian, Ukrainian, Serbian, …).
    Slavic,
    /// Like [`Slavic`] but only exactly 1 is `one` (Polish).
    ///
    /// [`Slavic`]: PluralRule::Slavic
    Polish,
    /// The full six-category scheme (Arabic).
    Arabic,
    /// No plural distinction at all (Chinese, Japanese, Korean, …).
    NoPlural,
}

impl PluralRule {
    /// Pick the rule for a locale tag (e.g. `"sv_SE"`, `"ru"`, `"zh-CN"`).
    #[must_use]
    pub fn for_locale(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "fr" | "hi" | "bn" | "pt" => Self::TwoFormZeroOne,
            "ru" | "uk" | "sr" | "hr" | "bs" | "be" => Self::Slavic,
            "pl" => Self::Polish,
            "ar" => Self::Arabic,
            "zh" | "ja" | "ko" | "th" | "vi" | "id" | "ms" => Self::NoPlural,
            _ => Self::TwoForm,
        }
    }

    /// The ordered categories this rule distinguishes.
    ///
    /// Plural variants are authored in exactly this order, so the index of
    /// a category here is the index of the variant to serve.
    #[must_use]
    pub fn categories(self) -> &'static [PluralCategory] {
        use PluralCategory::*;
        match self {
            Self::TwoForm | Self::TwoFormZeroOne => &[One, Other],
            Self::Slavic | Self::Polish => &[One, Few, Many],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
            Self::NoPlural => &[Other],
        }
    }

    /// Number of variants a fully authored message carries for this rule.
    #[must_use]
    pub fn variant_count(self) -> usize {
        self.categories().len()
    }

    /// Categorize a count.
    #[must_use]
    pub fn categorize(self, count: u64) -> PluralCategory {
        match self {
            Self::TwoForm => {
                if count == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::TwoFormZeroOne => {
                if count <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::Slavic => slavic(count),
            Self::Polish => polish(count),
            Self::Arabic => arabic(count),
            Self::NoPlural => PluralCategory::Other,
        }
    }

    /// Index of the variant to serve for `count`.
    ///
    /// Always a valid index into [`categories`](Self::categories); callers
    /// clamp against shorter authored lists.
    #[must_use]
    pub fn variant_index(self, count: u64) -> usize {
        let category = self.categorize(count);
        self.categories()
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0)
    }
}

fn slavic(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if mod10 == 1 && mod100 != 11 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn polish(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if n == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn arabic(n: u64) -> PluralCategory {
    let mod100 = n % 100;
    match n {
        0 => PluralCategory::Zero,
        1 => PluralCategory::One,
        2 => PluralCategory::Two,
        _ if (3..=10).contains(&mod100) => PluralCategory::Few,
        _ if (11..=99).contains(&mod100) => PluralCategory::Many,
        _ => PluralCategory::Other,
    }
}
