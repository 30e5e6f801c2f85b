use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company: Option<String>,
    pub graduation_year: Option<i32>,
    pub verified: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.map(|oid| oid.to_hex()),
            name: u.name,
            email: u.email,
            role: u.role,
            company: u.company,
            graduation_year: u.graduation_year,
            verified: u.verified,
        }
    }
}

/// Registration and login live in the external auth service; this is the
/// shape it persists and the one joined onto leaderboard reads.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company: Option<String>,
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub enum Role {
    Student,
    Alumni,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Alumni => write!(f, "Alumni"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}
