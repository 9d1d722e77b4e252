//! core types for tollgate - an action-grant authorization engine.
//!
//! this crate provides the fundamental data structures used throughout tollgate:
//! - [`Actor`] / [`ActorSet`] / [`Principal`]: who is asking
//! - [`Actions`]: one action id or several, OR'd together
//! - [`SegmentId`]: the partition a grant lives in
//! - [`GeneralGrant`] / [`ObjectGrant`]: the two persisted record kinds
//! - [`Config`]: application configuration

#![warn(missing_docs)]

mod action;
mod actor;
mod config;
mod error;
mod grant;
mod segment;

pub use action::Actions;
pub use actor::{Actor, ActorSet, Identifiable, Identity, Principal};
pub use config::{ActorFilter, Config, DatabaseConfig, QueryConfig, SqliteConfig};
pub use error::Error;
pub use grant::{GeneralGrant, ObjectGrant};
pub use segment::SegmentId;

/// result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;
