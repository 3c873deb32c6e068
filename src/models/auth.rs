// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Claims carried by the access tokens the auth service issues.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Owning user id
    pub exp: usize, // Expiration time
    #[serde(default)]
    pub email: Option<String>,
}

// The caller, as established by `auth_guard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
}
