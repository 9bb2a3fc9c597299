//! Typed property schema engine for notionizer.
//!
//! Maps the service's dynamically-typed property JSON onto local objects:
//! - [`PropertyKind`]: the closed set of wire type tags
//! - [`PropertyTypeRegistry`]: per-owner descriptor tables (accepted inputs,
//!   mutability, update-payload conversion)
//! - [`PropertyObject`]: one property of one entity, row or schema scoped
//! - [`PropertiesCollection`]: ordered name → object map rebuilt from JSON
//! - [`PropertyValue`]: the normalized read result
//!
//! Nothing here talks to the network. Writes produce request payloads; the
//! client crate performs the round trip and rebuilds collections from the
//! server's answer.

mod collection;
mod error;
mod kind;
mod property;
mod registry;
pub mod rich_text;
mod value;

pub use collection::PropertiesCollection;
pub use error::{ModelError, ModelResult};
pub use kind::PropertyKind;
pub use property::{PropertyObject, Scope};
pub use registry::{LocalType, PropertyDescriptor, PropertyTypeRegistry};
pub use value::{PropertyValue, date_string, unwrap_envelope};
