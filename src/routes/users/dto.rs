use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{sea_orm_active_enums::RoleEnum, user};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "ana.gomez@instituto.edu.ar")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "Ana Gómez")]
    pub full_name: String,

    #[schema(example = "student")]
    pub role: RoleEnum,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("Invalid email address".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<RoleEnum>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQueryParams {
    pub role: Option<RoleEnum>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: RoleEnum,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Ana Gómez".to_string(),
            role: RoleEnum::Student,
        }
    }

    #[test]
    fn test_validate_create_user() {
        assert!(request("ana@instituto.edu.ar", "password123").validate().is_ok());
        assert!(request("ana", "password123").validate().is_err());
        assert!(request("ana@instituto.edu.ar", "short").validate().is_err());
    }
}
