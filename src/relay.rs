//! The relay orchestrator — four entry points bridging SMS and the platform.
//!
//! Each entry point is one short saga of collaborator calls with no rollback:
//! webhook redelivery by the upstream platforms is the retry mechanism, and
//! partial completion (e.g. a conversation marked read whose reply then
//! fails) is an accepted outcome.

use std::sync::Arc;

use crate::classify::{self, Classifier};
use crate::config::BridgeConfig;
use crate::error::RelayError;
use crate::phone::{self, PhoneKey};
use crate::platform::types::{PlatformEvent, SmsEvent};
use crate::platform::{PlatformApi, SmsApi};
use crate::resolver::UserResolver;

/// An SMS ready to hand to the carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsOut {
    pub to: PhoneKey,
    pub body: String,
}

/// A received SMS, normalized for the platform-bound leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsIn {
    pub from: PhoneKey,
    pub to: Option<PhoneKey>,
    pub body: String,
}

/// Top-level bridge between the SMS carrier and the support platform.
pub struct Relay {
    config: BridgeConfig,
    platform: Arc<dyn PlatformApi>,
    sms: Arc<dyn SmsApi>,
    classifier: Classifier,
    resolver: UserResolver,
}

impl Relay {
    pub fn new(
        config: BridgeConfig,
        platform: Arc<dyn PlatformApi>,
        sms: Arc<dyn SmsApi>,
    ) -> Self {
        let classifier = Classifier::new(config.outbound_tag.as_str(), config.inbound_marker.as_str());
        let resolver = UserResolver::new(Arc::clone(&platform), config.default_region);
        Self {
            config,
            platform,
            sms,
            classifier,
            resolver,
        }
    }

    /// Handle an inbound platform webhook.
    ///
    /// Returns `Ok(None)` when the conversation is not an SMS relay
    /// candidate — a routine no-op, not an error. Otherwise yields the SMS
    /// to send to the conversation user's phone.
    pub async fn receive_from_platform(
        &self,
        event: &PlatformEvent,
    ) -> Result<Option<SmsOut>, RelayError> {
        let item = event
            .data
            .as_ref()
            .and_then(|d| d.item.as_ref())
            .ok_or_else(|| RelayError::validation("missing data.item"))?;

        let user_ref = item
            .user
            .as_ref()
            .ok_or_else(|| RelayError::validation("no user on conversation"))?;

        let Some(latest_part) = item
            .conversation_parts
            .as_ref()
            .and_then(|p| p.conversation_parts.first())
        else {
            return Err(RelayError::validation("no conversation parts"));
        };

        if !self.classifier.is_inbound_relay_candidate(item) {
            return Ok(None);
        }

        let user = self.platform.find_user_by_id(&user_ref.id).await?;
        let to = phone::normalize(user.phone.as_deref(), self.config.default_region)?
            .ok_or(RelayError::MissingPhone { user_id: user.id })?;

        let body = self
            .classifier
            .strip_leading_tag(&classify::plain_text(latest_part.body.as_deref().unwrap_or_default()));

        Ok(Some(SmsOut { to, body }))
    }

    /// Handle an inbound carrier webhook. No platform lookups happen here;
    /// resolution is deferred to [`Relay::send_to_platform`].
    pub async fn receive_from_sms(&self, event: &SmsEvent) -> Result<SmsIn, RelayError> {
        let from = non_empty(event.from.as_deref())
            .ok_or_else(|| RelayError::validation("no From phone"))?;
        let body = non_empty(event.body.as_deref())
            .ok_or_else(|| RelayError::validation("no sms Body"))?;

        let from = phone::normalize(Some(from), self.config.default_region)?
            .ok_or_else(|| RelayError::validation("empty From phone"))?;
        let to = phone::normalize(event.to.as_deref(), self.config.default_region)?;

        Ok(SmsIn {
            from,
            to,
            body: body.to_string(),
        })
    }

    /// Deliver a received SMS into the platform.
    ///
    /// Resolves the sender to a user, then either appends to the live
    /// relayed conversation (mark read, then reply as the user) or starts a
    /// new message tagged so later webhooks recognize the thread.
    pub async fn send_to_platform(&self, sender_phone: &str, body: &str) -> Result<(), RelayError> {
        let sender_phone = non_empty(Some(sender_phone))
            .ok_or_else(|| RelayError::validation("no sender phone"))?;
        let body =
            non_empty(Some(body)).ok_or_else(|| RelayError::validation("no message body"))?;

        let key = phone::normalize(Some(sender_phone), self.config.default_region)?
            .ok_or_else(|| RelayError::validation("empty sender phone"))?;
        let user = self.resolver.resolve_or_create(&key).await?;

        match self.find_active_relayed_conversation(&user.id).await? {
            None => {
                let tagged = format!("{}{body}", self.config.outbound_tag);
                tracing::debug!(user = %user.id, "starting new relayed conversation");
                self.platform.create_message(&user.id, &tagged).await
            }
            Some(conversation_id) => {
                tracing::debug!(user = %user.id, conversation = %conversation_id, "replying to relayed conversation");
                self.platform.mark_conversation_read(&conversation_id).await?;
                self.platform
                    .reply_to_conversation(&conversation_id, &user.id, body)
                    .await
            }
        }
    }

    /// Send an SMS to a destination phone from the fixed source number.
    pub async fn send_to_sms(&self, destination: &str, body: &str) -> Result<(), RelayError> {
        let to = phone::normalize(Some(destination), self.config.default_region)?
            .ok_or_else(|| RelayError::validation("no destination phone"))?;
        let from = phone::normalize(
            Some(&self.config.sms_source_number),
            self.config.default_region,
        )?
        .ok_or_else(|| RelayError::validation("no source number configured"))?;

        self.sms
            .send(from.as_str(), to.as_str(), &classify::plain_text(body))
            .await
    }

    /// The most recently updated open conversation classified as relayed,
    /// if any. SMS is single-channel per phone number, so at most one
    /// logical thread should be live; when the platform shows several, the
    /// freshest one is assumed to be it.
    async fn find_active_relayed_conversation(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, RelayError> {
        let conversations = self.platform.list_conversations(user_id).await?;

        let mut relayed = conversations
            .iter()
            .filter(|c| self.classifier.is_relayed(c));

        let first = relayed.next();
        if first.is_some() && relayed.next().is_some() {
            tracing::warn!(user = %user_id, "multiple open relayed conversations; using most recent");
        }

        Ok(first.and_then(|c| c.id.clone()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ── Tests ───────────────────────────────────────────────────────────
//
// Saga-level behavior (resolver interplay, call ordering, tagging) is
// covered in tests/relay_integration.rs against mock collaborators.
