use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the credential store. `email` is normalized and unique;
/// `password_hash` is an Argon2 PHC string and never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// User projection returned to callers. Has no hash field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl From<UserRecord> for PublicUser {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
        }
    }
}

/// Lookup key for emails: surrounding whitespace dropped, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Blank display names are stored as absent.
pub fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn normalize_name_drops_blank() {
        assert_eq!(normalize_name(None), None);
        assert_eq!(normalize_name(Some("   ")), None);
        assert_eq!(normalize_name(Some(" Ada ")), Some("Ada".to_string()));
    }

    #[test]
    fn public_user_serialization_has_no_hash() {
        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            name: Some("Test".into()),
            password_hash: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&PublicUser::from(record)).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("id"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }
}
