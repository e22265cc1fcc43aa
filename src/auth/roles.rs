// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};

/// Coarse privilege tag carried in every token.
///
/// ## Known Roles
///
/// - `Admin` - Bootstrap/system accounts
/// - `Teacher` - Manages users, contests and training plans
/// - `Student` - Regular account, can only act on itself
///
/// The set is open: tags the server does not know are kept verbatim in
/// `Other` so that a token round-trips without losing information. Role
/// checks compare tags exactly; there is no hierarchy between roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Other(String),
}

impl Role {
    /// Parse a role tag. Matching is exact (`"Teacher"` is not `teacher`).
    pub fn parse(tag: &str) -> Role {
        match tag {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            "student" => Role::Student,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Other(tag) => tag,
        }
    }
}

impl Default for Role {
    /// Accounts created without an explicit role are students.
    fn default() -> Self {
        Role::Student
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Role::parse(&tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("teacher"), Role::Teacher);
        assert_eq!(Role::parse("student"), Role::Student);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Role::parse("Teacher"), Role::Other("Teacher".to_string()));
        assert_ne!(Role::parse("TEACHER"), Role::Teacher);
    }

    #[test]
    fn unknown_tags_are_preserved() {
        let role = Role::parse("coach");
        assert_eq!(role.as_str(), "coach");
        assert_eq!(String::from(role), "coach");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, r#""teacher""#);

        let role: Role = serde_json::from_str(r#""coach""#).unwrap();
        assert_eq!(role, Role::Other("coach".to_string()));
    }

    #[test]
    fn default_role_is_student() {
        assert_eq!(Role::default(), Role::Student);
    }
}
