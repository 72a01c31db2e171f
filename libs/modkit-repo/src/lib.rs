#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `ModKit` typed repository layer over `SeaORM`.
//!
//! Define a column descriptor for an entity once, then express reads, writes,
//! scopes and pagination through typed column handles instead of raw column
//! strings. The same condition closure drives a `SELECT`, an `UPDATE` and a
//! `DELETE`.
//!
//! # Building blocks
//! - [`Col`]: typed handle for one column; builds predicates, sort keys and assignments
//! - [`HasColumns`]: entity-provided descriptor constructor
//! - [`Query`]: entity-agnostic filter/order/limit/offset description
//! - [`Scope`] and [`Pagination`]: reusable query transformations
//! - [`RepoTemplate`] / [`TableRepo`]: connection-free repository definitions
//! - [`QueryRepo`]: executes statements on a connection or transaction
//! - [`BuilderRepo`]: returns the un-executed `SeaORM` statements
//! - [`ExecCtx`] and [`RepoConfig`]: per-call deadline/cancellation and config
//!
//! # Example
//! ```rust,ignore
//! use modkit_repo::{Col, Decoration, HasColumns, Pagination, RepoTemplate};
//!
//! pub struct AccountColumns {
//!     pub id: Col<account::Entity, i64>,
//!     pub username: Col<account::Entity, String>,
//! }
//!
//! impl HasColumns for account::Entity {
//!     type Columns = AccountColumns;
//!     fn columns(d: &Decoration) -> AccountColumns {
//!         AccountColumns {
//!             id: Col::new(account::Column::Id, d),
//!             username: Col::new(account::Column::Username, d),
//!         }
//!     }
//! }
//!
//! let accounts = RepoTemplate::<account::Entity, AccountColumns>::of();
//! let repo = accounts.repo(&db);
//! let latest = repo
//!     .find_page(|q, _| q, |c| c.id.desc(), Pagination::first(10))
//!     .await?;
//! ```

pub mod class;
pub mod column;
pub mod config;
pub mod ctx;
pub mod error;
pub mod order;
pub mod pagination;
pub mod query;
pub mod repo;
pub mod scope;
pub mod table;
pub mod template;
pub mod values;
pub mod wrap;

mod key;
mod shared;

#[cfg(test)]
mod test_support;

pub use class::{HasColumns, columns, table_columns, use_table};
pub use column::{Col, Decoration};
pub use config::RepoConfig;
pub use ctx::ExecCtx;
pub use error::{ConfigError, NotFoundOr, RepoError};
pub use order::OrderBy;
pub use pagination::Pagination;
pub use query::Query;
pub use repo::QueryRepo;
pub use scope::Scope;
pub use table::TableRepo;
pub use template::RepoTemplate;
pub use values::{ColumnValue, ColumnValues};
pub use wrap::BuilderRepo;

// Re-exported so callers can name engine types without a direct dependency.
pub use sea_orm;
