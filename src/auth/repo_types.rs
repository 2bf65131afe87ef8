use mongodb::bson;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as the rest of the service sees it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // unique across users, stored as submitted
    pub username: String,           // display name, not unique
    pub password_hash: String,      // Argon2 PHC string, never plaintext
    pub created_at: OffsetDateTime, // set once at creation
}

/// Shape of a user in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            password: user.password_hash.clone(),
            created_at: bson::DateTime::from_time_0_3(user.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            username: "alice".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            created_at: datetime!(2024-05-01 12:30:45.123 UTC),
        }
    }

    #[test]
    fn document_uses_stored_field_names() {
        let doc = UserDocument::from(&sample_user());
        let bson_doc = bson::to_document(&doc).expect("serialize document");
        for key in ["_id", "email", "username", "password", "createdAt"] {
            assert!(bson_doc.contains_key(key), "missing {key}");
        }
        assert!(bson_doc.get_datetime("createdAt").is_ok());
    }

    #[test]
    fn document_keeps_user_fields() {
        let user = sample_user();
        let doc = UserDocument::from(&user);
        assert_eq!(doc.id, user.id.to_string());
        assert_eq!(doc.email, "a@b.com");
        assert_eq!(doc.username, "alice");
        assert_eq!(doc.password, user.password_hash);
        assert_eq!(doc.created_at.to_time_0_3(), user.created_at);
    }
}
