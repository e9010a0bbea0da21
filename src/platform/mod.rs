//! Collaborator API seams — the support platform and the SMS carrier.
//!
//! Both collaborators are consumed through object-safe traits so the relay
//! logic can be exercised against fixtures without a network.

pub mod intercom;
pub mod twilio;
pub mod types;

use async_trait::async_trait;

use crate::error::RelayError;
use self::types::{Conversation, NewUser, User, UserPage};

/// Operations the bridge consumes from the support platform.
///
/// Contracts match the platform's REST semantics; network and 5xx failures
/// surface as [`RelayError::Transport`], a missing user as
/// [`RelayError::NotFound`].
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<User, RelayError>;

    /// Fetch one page of the full user list. `cursor` is the opaque
    /// `next_cursor` from the previous page, or `None` for the first page.
    async fn list_users(&self, cursor: Option<&str>) -> Result<UserPage, RelayError>;

    async fn create_user(&self, new_user: &NewUser) -> Result<User, RelayError>;

    /// List a user's conversations, most recently updated first.
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, RelayError>;

    /// Start a new conversation with a message authored by the user.
    async fn create_message(&self, from_user_id: &str, body: &str) -> Result<(), RelayError>;

    /// Append a comment-type reply authored by the user.
    async fn reply_to_conversation(
        &self,
        conversation_id: &str,
        as_user_id: &str,
        body: &str,
    ) -> Result<(), RelayError>;

    async fn mark_conversation_read(&self, conversation_id: &str) -> Result<(), RelayError>;
}

/// Operations the bridge consumes from the SMS carrier.
#[async_trait]
pub trait SmsApi: Send + Sync {
    /// Send one SMS. `from` is the bridge's fixed source number.
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), RelayError>;
}

pub use self::intercom::IntercomClient;
pub use self::twilio::TwilioClient;
