#![forbid(unsafe_code)]

//! Translation catalog foundation for Lingua.
//!
//! A catalog maps `(context, source string)` pairs to translated text for
//! one target locale. This crate owns the document side of the engine:
//!
//! - [`model`]: the immutable in-memory representation
//!   ([`Catalog`] / [`Context`] / [`Message`])
//! - [`parser`]: [`parse`] bytes of the serialized catalog format into a
//!   [`Catalog`], with line-numbered errors
//! - [`escape`]: markup entity escaping with exact round-trip
//! - [`store`]: [`CatalogStore`], the hash-indexed read-only view served
//!   to the resolver
//! - [`plural`]: plural-category rules used to pick among plural variants
//!
//! Locale fallback, the registry, and resolution live in `lingua-runtime`.

pub mod escape;
pub mod model;
pub mod parser;
pub mod plural;
pub mod store;

pub use escape::{EntityError, escape, unescape};
pub use model::{Catalog, Context, Message, MessageText, TranslationState};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use plural::{PluralCategory, PluralRule};
pub use store::{CatalogStore, Lookup};
