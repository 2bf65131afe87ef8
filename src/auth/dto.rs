use serde::{Deserialize, Deserializer, Serialize};

/// Request body for user registration.
///
/// Absent keys and explicit `null`s decode as empty strings so they fail
/// presence validation instead of being rejected by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RegisterRequest {
    pub fn has_all_fields(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty() && !self.username.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
