//! Static catalogs consumed by the configurator and the engine.
//!
//! - [`format::FormatCatalog`] — the closed set of debate formats
//! - [`persona::PersonaCatalog`] — the closed set of agent personas
//!
//! Both are built once at startup and shared read-only.

pub mod format;
pub mod persona;
