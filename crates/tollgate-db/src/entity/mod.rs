//! database entity models for sea-orm.
//!
//! these entities map to database tables and are built from the grant
//! records in `tollgate_types`.

pub mod general_grant;
pub mod object_grant;
