//! Typed repository over the migrated schema
//!
//! Replaces an ORM session with explicit query methods: no lazy proxies,
//! every association is loaded in the same round trip via an explicit join.

use crate::model::{Role, RoleName, User};
use rusqlite::{params, Connection};
use std::fmt;

/// Repository error type
#[derive(Debug)]
pub enum RepoError {
    /// Database error, wrapped with the operation that failed
    Database {
        context: String,
        source: rusqlite::Error,
    },
    /// A stored value could not be decoded into the entity model
    Decode(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Database { context, source } => {
                write!(f, "{context}: {source}")
            }
            RepoError::Decode(message) => {
                write!(f, "Decode error: {message}")
            }
        }
    }
}

impl std::error::Error for RepoError {}

/// New user data for insertion (the surrogate key is database-assigned)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Typed query methods over a borrowed connection
///
/// The connection is expected to hold an already-migrated schema; this type
/// never creates or alters tables.
pub struct UserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> UserRepository<'a> {
    /// Create a repository over an existing connection
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Find a user by exact email match, roles eagerly loaded
    ///
    /// Issues a single query with outer-join semantics: a user with zero
    /// roles is still returned, with an empty role list. A nonexistent
    /// email returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Database` naming the failed lookup, or
    /// `RepoError::Decode` if a stored role name falls outside the closed
    /// enumeration.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let context = || format!("Can't find the user by email: {email}");

        let mut statement = self
            .conn
            .prepare(
                "SELECT u.id, u.email, u.password, u.first_name, u.last_name, r.id, r.role \
                 FROM users u \
                 LEFT JOIN users_roles ur ON ur.user_id = u.id \
                 LEFT JOIN roles r ON r.id = ur.role_id \
                 WHERE u.email = ?1",
            )
            .map_err(|e| RepoError::Database {
                context: context(),
                source: e,
            })?;

        let rows = statement
            .query_map(params![email], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })
            .map_err(|e| RepoError::Database {
                context: context(),
                source: e,
            })?;

        let mut user: Option<User> = None;
        for row in rows {
            let (id, email, password, first_name, last_name, role_id, role_name) =
                row.map_err(|e| RepoError::Database {
                    context: context(),
                    source: e,
                })?;

            let user = user.get_or_insert_with(|| User {
                id,
                email,
                password,
                first_name,
                last_name,
                roles: Vec::new(),
            });

            if let (Some(role_id), Some(role_name)) = (role_id, role_name) {
                let role_name = RoleName::parse(&role_name).map_err(|value| {
                    RepoError::Decode(format!(
                        "role '{value}' (id {role_id}) is outside the ADMIN/USER enumeration"
                    ))
                })?;
                user.roles.push(Role {
                    id: role_id,
                    role_name,
                });
            }
        }

        Ok(user)
    }

    /// Insert a role and return it with its assigned key
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Database` on execution failure.
    pub fn insert_role(&self, role_name: RoleName) -> Result<Role, RepoError> {
        self.conn
            .execute(
                "INSERT INTO roles (role) VALUES (?1)",
                params![role_name.as_str()],
            )
            .map_err(|e| RepoError::Database {
                context: format!("Can't insert the role: {role_name}"),
                source: e,
            })?;
        Ok(Role {
            id: self.conn.last_insert_rowid(),
            role_name,
        })
    }

    /// Insert a user and return it with its assigned key and no roles
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Database` on execution failure, including unique
    /// email violations.
    pub fn insert_user(&self, new_user: NewUser) -> Result<User, RepoError> {
        self.conn
            .execute(
                "INSERT INTO users (email, password, first_name, last_name) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new_user.email,
                    new_user.password,
                    new_user.first_name,
                    new_user.last_name
                ],
            )
            .map_err(|e| RepoError::Database {
                context: format!("Can't insert the user: {}", new_user.email),
                source: e,
            })?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            email: new_user.email,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            roles: Vec::new(),
        })
    }

    /// Associate a role with a user
    ///
    /// The join table's composite primary key enforces unique membership.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Database` on execution failure, including a
    /// duplicate association or unknown keys.
    pub fn assign_role(&self, user_id: i64, role_id: i64) -> Result<(), RepoError> {
        self.conn
            .execute(
                "INSERT INTO users_roles (user_id, role_id) VALUES (?1, ?2)",
                params![user_id, role_id],
            )
            .map_err(|e| RepoError::Database {
                context: format!("Can't assign role {role_id} to user {user_id}"),
                source: e,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrated_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 email TEXT NOT NULL UNIQUE,
                 password TEXT NOT NULL,
                 first_name TEXT NOT NULL,
                 last_name TEXT NOT NULL
             );
             CREATE TABLE roles (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 role TEXT NOT NULL
             );
             CREATE TABLE users_roles (
                 user_id INTEGER NOT NULL REFERENCES users (id),
                 role_id INTEGER NOT NULL REFERENCES roles (id),
                 PRIMARY KEY (user_id, role_id)
             );",
        )
        .unwrap();
        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "qwerty".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn test_persist_and_find_round_trip() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);

        let role = repo.insert_role(RoleName::Admin).unwrap();
        let user = repo.insert_user(new_user("test@example.com")).unwrap();
        repo.assign_role(user.id, role.id).unwrap();

        let found = repo
            .find_user_by_email("test@example.com")
            .unwrap()
            .expect("persisted user should be found");
        assert_eq!(found.id, user.id);
        assert!(found.has_role(RoleName::Admin));
        assert!(!found.has_role(RoleName::User));
    }

    #[test]
    fn test_user_without_roles_is_still_returned() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);
        repo.insert_user(new_user("lonely@example.com")).unwrap();

        let found = repo
            .find_user_by_email("lonely@example.com")
            .unwrap()
            .expect("user with zero roles should still be returned");
        assert!(found.roles.is_empty());
    }

    #[test]
    fn test_nonexistent_email_returns_none() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);
        assert!(repo.find_user_by_email("ghost@example.com").unwrap().is_none());
    }

    #[test]
    fn test_multiple_roles_loaded_in_one_query() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);

        let admin = repo.insert_role(RoleName::Admin).unwrap();
        let plain = repo.insert_role(RoleName::User).unwrap();
        let user = repo.insert_user(new_user("both@example.com")).unwrap();
        repo.assign_role(user.id, admin.id).unwrap();
        repo.assign_role(user.id, plain.id).unwrap();

        let found = repo.find_user_by_email("both@example.com").unwrap().unwrap();
        assert_eq!(found.roles.len(), 2);
        assert!(found.has_role(RoleName::Admin));
        assert!(found.has_role(RoleName::User));
    }

    #[test]
    fn test_duplicate_email_is_database_error() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);
        repo.insert_user(new_user("dup@example.com")).unwrap();

        let err = repo.insert_user(new_user("dup@example.com")).unwrap_err();
        match err {
            RepoError::Database { context, .. } => {
                assert!(context.contains("dup@example.com"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_role_value_is_decode_error() {
        let conn = migrated_connection();
        let repo = UserRepository::new(&conn);
        let user = repo.insert_user(new_user("odd@example.com")).unwrap();
        conn.execute("INSERT INTO roles (role) VALUES ('SUPERADMIN')", [])
            .unwrap();
        let role_id = conn.last_insert_rowid();
        repo.assign_role(user.id, role_id).unwrap();

        let err = repo.find_user_by_email("odd@example.com").unwrap_err();
        assert!(matches!(err, RepoError::Decode(_)));
    }
}
