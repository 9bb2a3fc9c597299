//! Client object model for notionizer.
//!
//! - [`NotionClient`] owns the transport, the property registry and the
//!   [`EntityCache`]
//! - [`Database`] and [`Page`] are cheap handles onto cached entity state;
//!   two handles for the same id always observe the same data
//! - [`Transport`] is the seam to the service: [`HttpTransport`] for real
//!   use, [`transport::mock::MockTransport`] for tests
//!
//! Writes are never applied locally first. Each one is validated, sent, and
//! the entity is rebuilt from the server's response; a failed write leaves
//! the cached state untouched.

mod cache;
mod client;
mod config;
mod database;
mod entity;
mod error;
mod page;
mod pagination;
pub mod transport;

pub use cache::{EntityCache, EntityCell};
pub use client::NotionClient;
pub use config::ClientConfig;
pub use database::Database;
pub use entity::{Entity, EntityState, IMMUTABLE_FIELDS, MUTABLE_FIELDS};
pub use error::{ClientError, ClientResult, TransportError};
pub use page::Page;
pub use pagination::QueryRows;
pub use transport::{HttpTransport, Transport};
