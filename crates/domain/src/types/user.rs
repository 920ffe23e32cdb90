//! Account types returned by the authentication endpoints

use serde::{Deserialize, Serialize};

/// Profile of the signed-in console user (`GET /users/me`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UserInfo {
    /// Whether the user holds `permission`
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin || self.permissions.iter().any(|p| p == permission)
    }
}
