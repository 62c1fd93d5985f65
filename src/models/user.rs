use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::{Uuid, fmt::Hyphenated};

use crate::{
    error::Result,
    validation::{Violations, non_empty},
};

/// Database user model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    #[sqlx(try_from = "Hyphenated")]
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<User> for UserIdentity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Login request body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Checked login credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials> {
        let mut violations = Violations::new();
        let username = violations.required_text("username", self.username, "Username is required");
        // Passwords are compared verbatim, so only emptiness is checked.
        let password = match self.password.filter(|password| !password.is_empty()) {
            Some(password) => password,
            None => {
                violations.push("password", "Password is required");
                String::new()
            }
        };
        violations.finish(Credentials { username, password })
    }
}

/// Signup request body
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// Checked signup data
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewUser> {
        let mut violations = Violations::new();

        let username = violations.required_text("username", self.username, "Username is required");
        if !username.is_empty() {
            violations.min_len("username", &username, 3, "Username must be at least 3 characters");
        }

        let email = violations.required_text("email", self.email, "Email is required");
        if !email.is_empty() {
            violations.email("email", &email);
        }

        let password = self.password.unwrap_or_default();
        violations.min_len("password", &password, 6, "Password must be at least 6 characters");

        violations.finish(NewUser {
            username,
            email,
            password,
            full_name: non_empty(self.full_name),
        })
    }
}

/// Body of `GET /api/auth/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<UserIdentity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation { details, .. } => {
                details.into_iter().map(|detail| detail.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let request = SignupRequest {
            username: Some("ab".into()),
            email: Some("not-an-email".into()),
            password: Some("12345".into()),
            full_name: None,
        };

        let fields = field_names(request.validate().unwrap_err());
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn signup_normalizes_blank_full_name() {
        let request = SignupRequest {
            username: Some("  clerk ".into()),
            email: Some("clerk@example.com".into()),
            password: Some("secret1".into()),
            full_name: Some("  ".into()),
        };

        let user = request.validate().unwrap();
        assert_eq!(user.username, "clerk");
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn login_requires_both_fields() {
        let fields = field_names(LoginRequest::default().validate().unwrap_err());
        assert_eq!(fields, vec!["username", "password"]);
    }

    #[test]
    fn identity_drops_the_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: "$argon2id$secret".into(),
            email: Some("admin@example.com".into()),
            full_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserIdentity::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "admin");
    }
}
