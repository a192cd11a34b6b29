use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

/// Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: String,
}

impl From<crate::repos::user_repo::UserRow> for UserResponse {
    fn from(u: crate::repos::user_repo::UserRow) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            address: u.address,
            role: u.role,
        }
    }
}
