//! error types for tollgate-grants.

use thiserror::Error;
use tollgate_types::{Actions, Actor};

/// errors that can occur in tollgate-grants.
#[derive(Debug, Error)]
pub enum Error {
    /// a grant could not be written.
    #[error(transparent)]
    Grant(#[from] GrantError),

    /// a revocation could not be carried out.
    #[error(transparent)]
    Revoke(#[from] RevokeError),

    /// the call was malformed. raised before the store is touched.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// the store failed while answering a read.
    #[error("permission lookup failed: {0}")]
    Store(#[from] tollgate_db::Error),
}

/// grant write failures.
///
/// a duplicate grant is never one of these: it counts as success.
#[derive(Debug, Error)]
pub enum GrantError {
    /// grants are written for exactly one identity.
    #[error("grants need a single actor, got {0}")]
    NotSingleActor(String),

    /// the store rejected the insert.
    #[error("could not grant action {action} on {object_type}{} to {actor}", on_object(.object_id))]
    Store {
        /// numeric action id.
        action: i64,
        /// namespace of the grant.
        object_type: String,
        /// object id, for action-on-object grants.
        object_id: Option<i64>,
        /// identity the grant was for.
        actor: Actor,
        /// underlying store error.
        #[source]
        source: tollgate_db::Error,
    },
}

/// revocation failures. revoking something never granted is not one of these.
#[derive(Debug, Error)]
pub enum RevokeError {
    /// revocations target exactly one identity.
    #[error("revocations need a single actor, got {0}")]
    NotSingleActor(String),

    /// the store rejected the delete.
    #[error("could not revoke action {action} on {object_type}{} from {actor}", on_object(.object_id))]
    Store {
        /// numeric action id.
        action: i64,
        /// namespace of the grant.
        object_type: String,
        /// object id, for action-on-object grants.
        object_id: Option<i64>,
        /// identity the grant was held by.
        actor: Actor,
        /// underlying store error.
        #[source]
        source: tollgate_db::Error,
    },

    /// the store rejected a namespace-wide delete.
    #[error("could not revoke action {action} on {object_type} from all actors")]
    Bulk {
        /// numeric action id.
        action: i64,
        /// namespace of the grant.
        object_type: String,
        /// underlying store error.
        #[source]
        source: tollgate_db::Error,
    },
}

/// malformed calls into the engine or a policy.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// the action name was never registered on the policy.
    #[error("{action} is not a registered action for {policy}")]
    UnknownAction {
        /// requested action name.
        action: String,
        /// policy type name.
        policy: String,
    },

    /// a general action was called with an object.
    #[error("{action} is not defined as an action-on-object for {policy}")]
    UnexpectedObject {
        /// requested action name.
        action: String,
        /// policy type name.
        policy: String,
    },

    /// an action-on-object was called without an object.
    #[error("{action} is not defined as a general action for {policy}")]
    MissingObject {
        /// requested action name.
        action: String,
        /// policy type name.
        policy: String,
    },

    /// only actions-on-object can be listed.
    #[error("{action} is not defined as an action-on-object for {policy} and cannot be listed")]
    NotListable {
        /// requested action name.
        action: String,
        /// policy type name.
        policy: String,
    },

    /// listing takes exactly one action id.
    #[error("listing takes a single action id, got {0}")]
    NotSingleAction(Actions),
}

fn on_object(object_id: &Option<i64>) -> String {
    match object_id {
        Some(id) => format!(" (object {id})"),
        None => String::new(),
    }
}

/// result type for tollgate-grants operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mentions_object() {
        let err = GrantError::Store {
            action: 2,
            object_type: "Post".to_string(),
            object_id: Some(11),
            actor: Actor::new("User", 7),
            source: tollgate_db::Error::Database("disk I/O error".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "could not grant action 2 on Post (object 11) to User:7"
        );

        let err = RevokeError::Store {
            action: 1,
            object_type: "Post".to_string(),
            object_id: None,
            actor: Actor::new("User", 7),
            source: tollgate_db::Error::Database("disk I/O error".to_string()),
        };
        assert_eq!(err.to_string(), "could not revoke action 1 on Post from User:7");
    }

    #[test]
    fn test_argument_error_names_policy() {
        let err = Error::from(ArgumentError::MissingObject {
            action: "edit".to_string(),
            policy: "PostPolicy".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "edit is not defined as a general action for PostPolicy"
        );
    }
}
