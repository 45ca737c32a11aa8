use tracing::{debug, warn};

use super::dto::Credentials;
use crate::users::{PublicUser, UserError, UserService};

/// Bridges a credentials form to the user service.
///
/// Returns `Ok(None)` when the form is incomplete, the email is unknown, or
/// the password does not match. The rejection is logged the same way in all
/// three cases. Only storage and hashing failures surface as `Err`.
pub async fn authorize(
    users: &UserService,
    credentials: &Credentials,
) -> Result<Option<PublicUser>, UserError> {
    let email = credentials.email.as_deref().unwrap_or_default();
    let password = credentials.password.as_deref().unwrap_or_default();

    if email.trim().is_empty() || password.is_empty() {
        debug!("credentials incomplete");
        return Ok(None);
    }

    match users.validate_credentials(email, password).await? {
        Some(user) => {
            debug!(user_id = %user.id, "authorization succeeded");
            Ok(Some(user))
        }
        None => {
            warn!("authorization rejected");
            Ok(None)
        }
    }
}
