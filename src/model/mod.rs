//! Entity Model
//!
//! `User` and `Role` records and their many-to-many relationship. The
//! mapped tables are `users`, `roles`, and the `users_roles` join table;
//! mapping presence for both entities is what the consistency verifier
//! checks in the ORM configuration.

use std::fmt;

/// Closed enumeration of role names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    Admin,
    User,
}

impl RoleName {
    /// Database string form (`roles.role` column value)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "ADMIN",
            RoleName::User => "USER",
        }
    }

    /// Parse the database string form
    ///
    /// # Errors
    ///
    /// Returns the offending string for anything outside the closed
    /// ADMIN/USER enumeration.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "ADMIN" => Ok(RoleName::Admin),
            "USER" => Ok(RoleName::User),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role record (`roles` table)
///
/// Roles are independent of users: deleting a role never cascades to the
/// users holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Surrogate key
    pub id: i64,
    /// Role name (stored in the `role` column)
    pub role_name: RoleName,
}

/// A user record (`users` table) with its associated roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Surrogate key
    pub id: i64,
    /// Unique, non-null email
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Associated roles (unordered, unique membership)
    pub roles: Vec<Role>,
}

impl User {
    /// Check whether any associated role carries the given name
    #[must_use]
    pub fn has_role(&self, role_name: RoleName) -> bool {
        self.roles.iter().any(|role| role.role_name == role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_round_trip() {
        assert_eq!(RoleName::parse("ADMIN"), Ok(RoleName::Admin));
        assert_eq!(RoleName::parse("USER"), Ok(RoleName::User));
        assert_eq!(RoleName::Admin.as_str(), "ADMIN");
        assert_eq!(RoleName::User.to_string(), "USER");
    }

    #[test]
    fn test_role_name_rejects_unknown_values() {
        assert_eq!(RoleName::parse("SUPERADMIN"), Err("SUPERADMIN".to_string()));
    }

    #[test]
    fn test_has_role() {
        let user = User {
            id: 1,
            email: "user@example.com".to_string(),
            password: "qwerty".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            roles: vec![Role {
                id: 2,
                role_name: RoleName::User,
            }],
        };
        assert!(user.has_role(RoleName::User));
        assert!(!user.has_role(RoleName::Admin));
    }
}
