use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::AdminSeed,
    db::user_store::{UserRecord, UserStore},
    error::{AppError, Result},
    models::user::{Credentials, NewUser, UserIdentity},
    services::password::PasswordService,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Credential checks and account creation. Session bookkeeping stays in the
/// HTTP handlers.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    passwords: PasswordService,
    // Verified when the username is unknown so both failure paths cost the same.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub async fn new(users: UserStore, passwords: PasswordService) -> Result<Self> {
        let dummy_hash = passwords.hash("timing-equalizer".into()).await?.into();
        Ok(Self {
            users,
            passwords,
            dummy_hash,
        })
    }

    pub async fn login(&self, credentials: Credentials) -> Result<UserIdentity> {
        let Credentials { username, password } = credentials;

        let Some(user) = self.users.find_by_username(&username).await? else {
            self.passwords
                .verify(password, self.dummy_hash.to_string())
                .await?;
            tracing::warn!(%username, "login failed: unknown username");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
        };

        let matches = self
            .passwords
            .verify(password, user.password_hash.clone())
            .await?;

        if !matches {
            tracing::warn!(%username, "login failed: wrong password");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
        }
        if !user.is_active {
            tracing::warn!(%username, "login failed: account inactive");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
        }

        tracing::info!(user_id = %user.id, %username, "user logged in");
        Ok(user.into())
    }

    pub async fn signup(&self, new_user: NewUser) -> Result<UserIdentity> {
        if self.users.username_exists(&new_user.username).await? {
            return Err(AppError::Conflict("Username already taken".into()));
        }
        if self.users.email_exists(&new_user.email).await? {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = self.passwords.hash(new_user.password).await?;
        let user = self
            .users
            .insert(UserRecord {
                username: &new_user.username,
                email: Some(&new_user.email),
                password_hash: &password_hash,
                full_name: new_user.full_name.as_deref(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Resolves the identity behind a session. Unknown and inactive users
    /// resolve to `None`.
    pub async fn current_user(&self, user_id: Uuid) -> Result<Option<UserIdentity>> {
        let user = self.users.find_by_id(user_id).await?;
        Ok(user.filter(|user| user.is_active).map(UserIdentity::from))
    }

    /// Creates the administrator account unless its username already exists.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<bool> {
        let password_hash = self.passwords.hash(seed.password.clone()).await?;
        let created = self
            .users
            .insert_if_absent(UserRecord {
                username: &seed.username,
                email: Some(&seed.email),
                password_hash: &password_hash,
                full_name: Some(&seed.full_name),
            })
            .await?;

        if created {
            tracing::info!(username = %seed.username, "Default administrator created");
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::HashingCost, db};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::setup_database(&pool).await.unwrap();

        let passwords = PasswordService::new(HashingCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        AuthService::new(UserStore::new(pool), passwords).await.unwrap()
    }

    #[tokio::test]
    async fn dummy_hash_is_a_verifiable_argon2_hash() {
        let auth = service().await;
        assert!(auth.dummy_hash.starts_with("$argon2id$"));
        assert!(
            PasswordService::verify_blocking("timing-equalizer", &auth.dummy_hash).unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_invalid_credentials() {
        let auth = service().await;
        let err = auth
            .login(Credentials {
                username: "ghost".into(),
                password: "whatever".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(message) if message == INVALID_CREDENTIALS));
    }
}
