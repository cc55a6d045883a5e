#![forbid(unsafe_code)]

//! Runtime half of the Lingua translation engine.
//!
//! `lingua-catalog` turns catalog documents into indexed stores; this crate
//! serves them to a running application:
//!
//! - [`locale`]: tag normalization, parent chains, system-locale
//!   detection, and [`FallbackChain`] construction
//! - [`registry`]: the process-wide (but explicitly injected) set of
//!   loaded locales, with atomic catalog swap for hot reload
//! - [`resolver`]: total `resolve` calls that always return a displayable
//!   string, never an error, never a block beyond one snapshot clone
//! - [`telemetry`]: miss accounting for authoring follow-up
//! - [`loader`]: catalog file discovery plus foreground and cancellable
//!   background loading
//!
//! The intended wiring, once at startup:
//!
//! ```
//! use std::sync::Arc;
//! use lingua_runtime::{Registry, Resolver};
//! use lingua_catalog::{CatalogStore, parse};
//!
//! let registry = Arc::new(Registry::new("en"));
//! let doc = br#"<TS language="sv_SE"><context><name>Hello</name>
//!     <message><source>Hi</source><translation>Hej</translation></message>
//! </context></TS>"#;
//! registry.register(CatalogStore::new(parse(doc).unwrap()));
//! registry.set_active("sv_SE").unwrap();
//!
//! let resolver = Resolver::new(Arc::clone(&registry));
//! assert_eq!(resolver.tr("Hello", "Hi"), "Hej");
//! assert_eq!(resolver.tr("Hello", "Unknown"), "Unknown");
//! ```

pub mod loader;
pub mod locale;
pub mod registry;
pub mod resolver;
pub mod telemetry;

pub use loader::{
    CatalogFile, LoadError, LoadHandle, LoaderConfig, discover, load_file, load_into, spawn_load,
};
pub use locale::{FallbackChain, detect_system_locale, normalize, parent_chain};
pub use registry::{Registry, RegistryError};
pub use resolver::Resolver;
pub use telemetry::{Miss, MissKind, MissLog};

pub use lingua_catalog::{Catalog, CatalogStore, Lookup, ParseError, parse};
