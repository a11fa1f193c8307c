//! Reconcile CockroachDB objects against a declared state.
//!
//! roach manages four kinds of objects inside a CockroachDB cluster:
//! databases, roles, role memberships and privilege grants. Each is driven
//! through the same lifecycle ([`Resource`]): create it from a desired
//! record, read it back by id, update it from a previous state to a new
//! desired record, and delete it.
//!
//! Every operation opens one connection through a [`ConnectionProvider`],
//! runs its statements one after the other, and returns the record as the
//! database reports it afterwards.
//!
//! # Example
//!
//! ```ignore
//! use roach::{CockroachProvider, Grant, GrantResource, ObjectType};
//!
//! let provider = CockroachProvider::new(config);
//! let grants = GrantResource::new(&provider);
//!
//! let synced = grants
//!     .create(&Grant {
//!         role: "app_reader".into(),
//!         database: "shop".into(),
//!         schema: Some("public".into()),
//!         object_type: ObjectType::Table,
//!         objects: vec![],
//!         privileges: vec!["SELECT".into()],
//!         id: String::new(),
//!     })
//!     .await?;
//! assert_eq!(synced.id, "app_reader|shop|table");
//! ```

pub mod database;
mod error;
pub mod grant;
pub mod membership;
mod provider;
mod resource;
pub mod role;
mod row;
mod tls;
mod traced;
mod value;

pub use database::{Database, DatabaseResource};
pub use error::{Error, ValidationError};
pub use grant::{Grant, GrantResource, ObjectType, identity, parse_identity};
pub use membership::{Membership, MembershipResource};
pub use provider::{CockroachProvider, ConnectionProvider};
pub use resource::Resource;
pub use role::{Role, RoleResource};
pub use row::{Row, ScanError};
pub use tls::TlsError;
pub use traced::{BoxFuture, Connection, ConnectionExt, TracedConn};
pub use value::Value;

// Re-export the configuration types callers need to build a provider.
pub use roach_config::{Config, SslConfig, SslMode};

/// Result type for roach operations.
pub type Result<T> = std::result::Result<T, Error>;
