//! User wire type.

use std::fmt;

use chrono::{DateTime, Utc};
use commerce_core::{Email, UserId};
use serde::{Deserialize, Serialize};

use super::wire_time;
use crate::models::{Timestamps, User};

/// Wire form of a [`User`].
///
/// `password` is write-only: it is accepted inbound and never produced by
/// `From<&User>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserDto {
    /// Attach a plaintext password, e.g. before registering.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for UserDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDto")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: None,
            created_at: user.timestamps.created_at,
            updated_at: user.timestamps.updated_at,
            deleted_at: user.timestamps.deleted_at,
        }
    }
}

impl From<UserDto> for User {
    /// A missing password becomes empty, which keeps the stored hash on update.
    fn from(dto: UserDto) -> Self {
        Self {
            id: None,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            password: dto.password.unwrap_or_default(),
            timestamps: Timestamps::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn stored_user() -> User {
        let mut user = User::new(
            "Ada",
            "Lovelace",
            Email::parse("ada@example.com").unwrap(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
        );
        user.id = Some(UserId::new(3));
        user.timestamps.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        user.timestamps.updated_at = user.timestamps.created_at;
        user
    }

    #[test]
    fn test_outbound_never_carries_password() {
        let dto = UserDto::from(&stored_user());
        assert!(dto.password.is_none());

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["id"], 3);
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["created_at"], "01/02/2024 03:04:05");
    }

    #[test]
    fn test_inbound_ignores_identity_and_audit() {
        let json = r#"{
            "id": 99,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "password": "hunter22",
            "created_at": "01/02/2024 03:04:05"
        }"#;
        let dto: UserDto = serde_json::from_str(json).unwrap();
        let user = User::from(dto);

        assert_eq!(user.id, None);
        assert_eq!(user.password, "hunter22");
        assert_eq!(user.timestamps, Timestamps::default());
    }

    #[test]
    fn test_round_trip_preserves_profile_fields() {
        let stored = stored_user();
        let back = User::from(UserDto::from(&stored));

        assert_eq!(back.first_name, stored.first_name);
        assert_eq!(back.last_name, stored.last_name);
        assert_eq!(back.email, stored.email);
        assert!(back.password.is_empty());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let json = r#"{"first_name":"A","last_name":"B","email":"not-an-email"}"#;
        assert!(serde_json::from_str::<UserDto>(json).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let dto = UserDto::from(&stored_user()).with_password("hunter22");
        let debug = format!("{dto:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("[REDACTED]"));
    }
}
