// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-route authorization policy.
//!
//! A [`RoutePolicy`] is attached to a route when the router is composed
//! (see `api::router`) and evaluated by the `authorize` middleware after the
//! authentication filter has run. Evaluation is a pure function of the
//! identity, the policy and the route's path parameters.

use super::{AuthError, Identity, Role};

/// Path parameter holding the target subject id for [`RoutePolicy::SelfOrRole`].
pub const TARGET_ID_PARAM: &str = "id";

/// Access rule attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Public; no identity needed.
    NoAuth,
    /// Any verified identity.
    Authenticated,
    /// Identity with exactly this role.
    Role(Role),
    /// The subject named by the `id` path parameter, or anyone with this role.
    SelfOrRole(Role),
}

impl RoutePolicy {
    /// Decide whether `identity` may use the route.
    ///
    /// `target_id` is the raw `id` path parameter, if the route has one. For
    /// `SelfOrRole` it is parsed first, so a malformed id is reported as
    /// `InvalidTargetId` regardless of who is asking.
    pub fn evaluate(
        &self,
        identity: Option<&Identity>,
        target_id: Option<&str>,
    ) -> Result<(), AuthError> {
        match self {
            RoutePolicy::NoAuth => Ok(()),
            RoutePolicy::Authenticated => require_identity(identity).map(|_| ()),
            RoutePolicy::Role(role) => {
                let identity = require_identity(identity)?;
                if identity.has_role(role) {
                    Ok(())
                } else {
                    Err(AuthError::InsufficientPermissions)
                }
            }
            RoutePolicy::SelfOrRole(role) => {
                let target = parse_subject_id(target_id.ok_or(AuthError::InvalidTargetId)?)?;
                let identity = require_identity(identity)?;
                if identity.has_role(role) || identity.subject_id == target {
                    Ok(())
                } else {
                    Err(AuthError::InsufficientPermissions)
                }
            }
        }
    }
}

fn require_identity(identity: Option<&Identity>) -> Result<&Identity, AuthError> {
    identity.ok_or(AuthError::AuthenticationRequired)
}

/// Parse a subject id from a path segment. Ids are positive integers.
pub fn parse_subject_id(raw: &str) -> Result<u64, AuthError> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(AuthError::InvalidTargetId),
        Ok(id) => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ErrorKind;

    fn identity(id: u64, role: Role) -> Identity {
        Identity::new(id, format!("user{id}@example.com"), role)
    }

    fn kind(result: Result<(), AuthError>) -> Option<ErrorKind> {
        result.err().map(|e| e.kind())
    }

    #[test]
    fn no_auth_always_allows() {
        assert!(RoutePolicy::NoAuth.evaluate(None, None).is_ok());
        assert!(RoutePolicy::NoAuth
            .evaluate(Some(&identity(1, Role::Student)), Some("abc"))
            .is_ok());
    }

    #[test]
    fn authenticated_requires_identity() {
        let policy = RoutePolicy::Authenticated;
        assert!(policy.evaluate(Some(&identity(1, Role::Student)), None).is_ok());
        assert_eq!(kind(policy.evaluate(None, None)), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn role_policy_distinguishes_401_and_403() {
        let policy = RoutePolicy::Role(Role::Teacher);
        assert!(policy.evaluate(Some(&identity(2, Role::Teacher)), None).is_ok());
        assert_eq!(
            kind(policy.evaluate(Some(&identity(3, Role::Student)), None)),
            Some(ErrorKind::Forbidden)
        );
        assert_eq!(kind(policy.evaluate(None, None)), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn role_policy_has_no_hierarchy() {
        let policy = RoutePolicy::Role(Role::Teacher);
        assert_eq!(
            kind(policy.evaluate(Some(&identity(1, Role::Admin)), None)),
            Some(ErrorKind::Forbidden)
        );
    }

    #[test]
    fn self_or_teacher_on_target_seven() {
        let policy = RoutePolicy::SelfOrRole(Role::Teacher);

        assert!(policy
            .evaluate(Some(&identity(7, Role::Student)), Some("7"))
            .is_ok());
        assert_eq!(
            kind(policy.evaluate(Some(&identity(8, Role::Student)), Some("7"))),
            Some(ErrorKind::Forbidden)
        );
        assert!(policy
            .evaluate(Some(&identity(8, Role::Teacher)), Some("7"))
            .is_ok());
    }

    #[test]
    fn self_or_role_without_identity_is_401() {
        let policy = RoutePolicy::SelfOrRole(Role::Teacher);
        assert_eq!(kind(policy.evaluate(None, Some("7"))), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn malformed_target_is_400_before_any_permission_check() {
        let policy = RoutePolicy::SelfOrRole(Role::Teacher);

        for identity in [None, Some(identity(8, Role::Student)), Some(identity(8, Role::Teacher))] {
            let result = policy.evaluate(identity.as_ref(), Some("abc"));
            assert_eq!(kind(result), Some(ErrorKind::BadRequest));
        }
        assert_eq!(kind(policy.evaluate(None, None)), Some(ErrorKind::BadRequest));
    }

    #[test]
    fn parse_subject_id_accepts_positive_integers_only() {
        assert_eq!(parse_subject_id("42").unwrap(), 42);
        assert!(matches!(parse_subject_id("0"), Err(AuthError::InvalidTargetId)));
        assert!(matches!(parse_subject_id("-1"), Err(AuthError::InvalidTargetId)));
        assert!(matches!(parse_subject_id("7a"), Err(AuthError::InvalidTargetId)));
        assert!(matches!(parse_subject_id(""), Err(AuthError::InvalidTargetId)));
    }
}
