use serde::{Deserialize, Serialize};

/// Credential record used to authorize remote posts on a user's behalf.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub private_key: String,
    pub public_key: String,
    pub address: String,
    pub created_at: String,
}

/// Public view of a credential record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub public_key: String,
    pub address: String,
    pub created_at: String,
}

impl From<CredentialRecord> for UserProfile {
    fn from(record: CredentialRecord) -> Self {
        UserProfile {
            username: record.username,
            public_key: record.public_key,
            address: record.address,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
