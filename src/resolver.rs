//! Phone-to-user resolution over the platform's paginated user list.

use std::sync::Arc;

use phonenumber::country;

use crate::error::RelayError;
use crate::phone::{self, PhoneKey};
use crate::platform::PlatformApi;
use crate::platform::types::{NewUser, User};

/// Resolves a phone number to a platform user, creating a placeholder
/// when no match exists anywhere in the user list.
pub struct UserResolver {
    platform: Arc<dyn PlatformApi>,
    region: country::Id,
}

impl UserResolver {
    pub fn new(platform: Arc<dyn PlatformApi>, region: country::Id) -> Self {
        Self { platform, region }
    }

    /// Exhaustive paged scan with two-tier matching.
    ///
    /// A perfect match (email on file AND matching phone) wins immediately,
    /// on any page. An anonymous match (no email, matching phone) is carried
    /// — first one found — but only returned once every page has been
    /// visited without a perfect match. If the phone appears nowhere, a
    /// placeholder user is created.
    ///
    /// Pages are fetched strictly sequentially; each fetch depends on the
    /// previous page's cursor. Transport errors propagate unchanged.
    pub async fn resolve_or_create(&self, phone: &PhoneKey) -> Result<User, RelayError> {
        let mut cursor: Option<String> = None;
        let mut anonymous: Option<User> = None;

        loop {
            let page = self.platform.list_users(cursor.as_deref()).await?;

            for user in page.users {
                if !self.phone_matches(&user, phone) {
                    continue;
                }
                if user.has_email() {
                    return Ok(user);
                }
                if anonymous.is_none() {
                    anonymous = Some(user);
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        if let Some(user) = anonymous {
            return Ok(user);
        }

        let new_user = NewUser {
            phone: phone.as_str().to_string(),
            user_id: uuid::Uuid::new_v4().to_string(),
        };
        tracing::info!(phone = %phone, external_id = %new_user.user_id, "creating placeholder user");
        self.platform.create_user(&new_user).await
    }

    /// Compare a stored phone against the target key. A stored phone that
    /// fails to normalize never matches; it is not an error here.
    fn phone_matches(&self, user: &User, target: &PhoneKey) -> bool {
        matches!(
            phone::normalize(user.phone.as_deref(), self.region),
            Ok(Some(ref key)) if key == target
        )
    }
}
