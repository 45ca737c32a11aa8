use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::model::{normalize_email, normalize_name, PublicUser, UserRecord};
use super::password::{hash_password, verify_dummy, verify_password};
use super::store::{StoreError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("User already exists")]
    UserExists,
    #[error("storage unavailable: {0}")]
    Storage(#[source] anyhow::Error),
    #[error("password hashing failed: {0}")]
    Hashing(#[source] anyhow::Error),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => UserError::UserExists,
            StoreError::Backend(e) => UserError::Storage(e),
        }
    }
}

/// Creates users and checks login attempts against the credential store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Check-then-insert; not atomic. A concurrent insert of the same email
    /// that slips past the check is caught by the store's unique constraint.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<PublicUser, UserError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(UserError::InvalidInput("Email and password are required."));
        }

        if self.store.find_one_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(UserError::UserExists);
        }

        let password_hash = hash_password(password).map_err(UserError::Hashing)?;
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email,
            name: normalize_name(name),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.store.insert_one(&user).await {
            match &e {
                StoreError::Duplicate => warn!(email = %user.email, "lost insert race on email"),
                StoreError::Backend(err) => error!(error = %err, "insert user failed"),
            }
            return Err(e.into());
        }

        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user.into())
    }

    /// Absent for an unknown email and for a wrong password alike.
    #[instrument(skip(self, password))]
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<PublicUser>, UserError> {
        let Some(user) = self.find_by_email(email).await? else {
            verify_dummy(password);
            return Ok(None);
        };

        let ok = verify_password(password, &user.password_hash).map_err(UserError::Hashing)?;
        if !ok {
            return Ok(None);
        }

        debug!(user_id = %user.id, "credentials valid");
        Ok(Some(user.into()))
    }

    /// Raw record lookup, hash included. Not for returning to callers.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        let email = normalize_email(email);
        Ok(self.store.find_one_by_email(&email).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, UserError> {
        Ok(self.store.find_one_by_id(id).await?.map(PublicUser::from))
    }
}
