//! Entity and webhook payload types for the support platform.
//!
//! Everything here is owned by the external platform; the bridge fetches
//! these fresh per request and discards them when the bridging transaction
//! completes.

use serde::{Deserialize, Serialize};

/// A platform user record.
///
/// A user without an email is a placeholder identity this bridge created
/// for an SMS-only contact; the distinction drives match tie-breaking in
/// the resolver.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// External id set when this bridge created the user as a placeholder.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl User {
    /// Whether this record carries a real (emailed) identity.
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Fields sent to the platform when creating a placeholder user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub phone: String,
    pub user_id: String,
}

/// One page of the platform's paginated user list.
///
/// `next_cursor` is opaque to the resolver; `None` means last page.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<User>,
    pub next_cursor: Option<String>,
}

/// A message body as the platform delivers it (rich text / markup).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageBody {
    #[serde(default)]
    pub body: Option<String>,
}

/// Wrapper matching the platform's nested parts shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConversationParts {
    #[serde(default)]
    pub conversation_parts: Vec<MessageBody>,
}

/// Reference to the user a conversation belongs to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserRef {
    pub id: String,
}

/// A platform conversation.
///
/// "SMS-relayed" is not a field — it is derived per call by the classifier
/// from the message bodies, so the same conversation can classify
/// differently as new messages arrive.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub user: Option<UserRef>,
    /// The conversation's latest top-level message.
    #[serde(default)]
    pub conversation_message: Option<MessageBody>,
    /// Historical parts, most recent first.
    #[serde(default)]
    pub conversation_parts: Option<ConversationParts>,
}

impl Conversation {
    /// The raw body of the latest top-level message, if any.
    pub fn latest_body(&self) -> Option<&str> {
        self.conversation_message.as_ref()?.body.as_deref()
    }

    /// Historical part bodies in delivered order.
    pub fn part_bodies(&self) -> impl Iterator<Item = &str> {
        self.conversation_parts
            .iter()
            .flat_map(|p| p.conversation_parts.iter())
            .filter_map(|m| m.body.as_deref())
    }
}

/// Platform webhook envelope: `{data: {item: {...}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformEvent {
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub item: Option<Conversation>,
}

/// Carrier webhook payload, in the carrier's native field casing.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsEvent {
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
}
