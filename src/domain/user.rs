//! Signed-in user session.
//!
//! The session is what the client keeps locally after signing in: who the user
//! is, what they may do, and how to show them. It lives in a
//! [`SessionStore`](crate::storage::SessionStore) that is loaded at start-up and
//! cleared on logout.

use serde::{Deserialize, Serialize};

/// Display name used when no session is stored or the stored name is blank.
pub const DEFAULT_DISPLAY_NAME: &str = "Usuario";

/// Authorization role of a user.
///
/// Only administrators may use the article management panel. Any role string the
/// backend sends that is not `"admin"` is treated as a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    /// Parses a backend role string.
    ///
    /// ```
    /// use ecocampus::domain::Role;
    ///
    /// assert_eq!(Role::from_name("admin"), Role::Admin);
    /// assert_eq!(Role::from_name("editor"), Role::User);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "Usuario",
        }
    }
}

/// Locally persisted session of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl UserSession {
    /// Creates a regular-user session without avatar or tokens.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role: Role::User,
            avatar: None,
            access_token: None,
            refresh_token: None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to greet the user with, falling back to [`DEFAULT_DISPLAY_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            trimmed
        }
    }
}

/// Entry of the user directory shown in the admin panel.
///
/// Unlike [`UserSession`] this carries no tokens; it is what an administrator
/// may see about other accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(alias = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl UserRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Upper-cased first letter of every word of the name, for the avatar.
    ///
    /// ```
    /// use ecocampus::domain::{Role, UserRecord};
    ///
    /// let user = UserRecord::new("u1", "ana maría  lópez", "ana@alumnos.udg.mx", Role::User);
    /// assert_eq!(user.initials(), "AML");
    /// ```
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Case-insensitive substring match on name or email. A blank query
    /// matches everyone.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.email.to_lowercase().contains(&query)
    }
}

/// Display name for an optional session.
///
/// ```
/// use ecocampus::domain::user::display_name;
///
/// assert_eq!(display_name(None), "Usuario");
/// ```
#[must_use]
pub fn display_name(session: Option<&UserSession>) -> &str {
    session.map_or(DEFAULT_DISPLAY_NAME, UserSession::display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_deserialize_as_user() {
        let json = r#"{"id":"u1","email":"a@b.mx","name":"Ana","role":"moderator"}"#;
        let session: UserSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.role, Role::User);

        let json = r#"{"id":"u1","email":"a@b.mx","name":"Ana","role":"admin"}"#;
        let session: UserSession = serde_json::from_str(json).unwrap();
        assert!(session.is_admin());
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let session = UserSession::new("u1", "a@b.mx", "   ");
        assert_eq!(session.display_name(), DEFAULT_DISPLAY_NAME);
        assert_eq!(display_name(Some(&UserSession::new("u1", "a@b.mx", "Ana"))), "Ana");
    }

    #[test]
    fn user_records_accept_the_backend_column_names() {
        let json = r#"{"id":"u7","nombre":"Luis Pérez","email":"luis@alumnos.udg.mx","role":"admin"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, "Luis Pérez");
        assert_eq!(user.role.label(), "Admin");
        assert_eq!(user.initials(), "LP");

        let json = r#"{"id":"u8","name":"Eva","email":"eva@alumnos.udg.mx"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.role.label(), "Usuario");
    }

    #[test]
    fn user_search_looks_at_name_and_email() {
        let user = UserRecord::new("u1", "Ana López", "ana.lopez@alumnos.udg.mx", Role::User);
        assert!(user.matches("  "));
        assert!(user.matches("LÓPEZ"));
        assert!(user.matches("@alumnos"));
        assert!(!user.matches("luis"));
    }
}
