//! Immutable in-memory representation of a parsed catalog.
//!
//! A [`Catalog`] holds every [`Context`] for one target locale; a context is
//! a named group of [`Message`]s corresponding to one UI screen or
//! component. Messages are keyed by their source text, which is only
//! meaningful within its context — the same source string may appear in
//! several contexts with different translations.
//!
//! All types here are plain values produced by the parser. Nothing mutates
//! them after construction; the locale in particular is fixed for the
//! lifetime of the catalog.

/// Translation lifecycle state, as recorded by the authoring tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationState {
    /// Reviewed and ready to serve.
    Finished,
    /// Present but not yet signed off by a translator.
    Unfinished,
    /// The source string no longer exists in the application; the entry is
    /// kept for authoring history but is never served.
    Vanished,
}

/// Translated text of one message: a single string, or ordered plural
/// variants for messages authored with `numerus="yes"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageText {
    Singular(String),
    /// Variants in the order authored; position maps onto the locale's
    /// plural-category list (see [`crate::plural::PluralRule::categories`]).
    Plural(Vec<String>),
}

/// A single translatable unit: source text plus its translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub(crate) source: String,
    pub(crate) text: MessageText,
    pub(crate) state: TranslationState,
    pub(crate) comment: Option<String>,
    pub(crate) translator_comment: Option<String>,
    pub(crate) extra_comment: Option<String>,
}

impl Message {
    /// Source text. Acts as the lookup key within the owning context.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Translated text (singular or plural variants).
    #[must_use]
    pub fn text(&self) -> &MessageText {
        &self.text
    }

    /// Authoring state of the translation.
    #[must_use]
    pub fn state(&self) -> TranslationState {
        self.state
    }

    /// Disambiguation comment from the developer, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Free-form note left by the translator, if any.
    #[must_use]
    pub fn translator_comment(&self) -> Option<&str> {
        self.translator_comment.as_deref()
    }

    /// Extra comment extracted from application source, if any.
    #[must_use]
    pub fn extra_comment(&self) -> Option<&str> {
        self.extra_comment.as_deref()
    }

    /// Whether this message was authored with plural variants.
    #[must_use]
    pub fn is_plural(&self) -> bool {
        matches!(self.text, MessageText::Plural(_))
    }

    /// The singular translation, or `None` for plural messages.
    #[must_use]
    pub fn singular_text(&self) -> Option<&str> {
        match &self.text {
            MessageText::Singular(s) => Some(s),
            MessageText::Plural(_) => None,
        }
    }

    /// The ordered plural variants, or `None` for singular messages.
    #[must_use]
    pub fn plural_forms(&self) -> Option<&[String]> {
        match &self.text {
            MessageText::Singular(_) => None,
            MessageText::Plural(forms) => Some(forms),
        }
    }

    /// Whether the message carries any servable text.
    ///
    /// Vanished entries and entries whose text is entirely empty do not
    /// count; resolution treats them as untranslated.
    #[must_use]
    pub fn has_translation(&self) -> bool {
        if self.state == TranslationState::Vanished {
            return false;
        }
        match &self.text {
            MessageText::Singular(s) => !s.is_empty(),
            MessageText::Plural(forms) => forms.iter().any(|f| !f.is_empty()),
        }
    }
}

/// A named group of messages, one per logical UI screen or component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub(crate) name: String,
    pub(crate) messages: Vec<Message>,
}

impl Context {
    /// Context name, unique within a catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in authored order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// The full set of contexts for one target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) locale: String,
    pub(crate) format_version: Option<String>,
    pub(crate) contexts: Vec<Context>,
}

impl Catalog {
    /// Target locale identifier as declared by the document
    /// (e.g. `"sv_SE"`). Immutable after parse.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Document format version, when the document declares one.
    #[must_use]
    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    /// Contexts in document order.
    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Whether the catalog has no messages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }
}
