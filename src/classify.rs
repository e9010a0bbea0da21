//! Conversation classification — deriving "SMS-relayed" from tag prefixes.
//!
//! There is no persisted thread mapping. Whether a conversation belongs to
//! the SMS bridge is re-derived on every inspection from the message bodies
//! alone, so the same conversation can classify differently as new messages
//! arrive. Everything here is pure; fixtures are enough to test it.

use crate::platform::types::Conversation;

/// Rendering width for rich-text bodies. Wide enough that short support
/// messages never wrap.
const RENDER_WIDTH: usize = 1000;

/// Tag-prefix classifier for platform conversations.
#[derive(Debug, Clone)]
pub struct Classifier {
    outbound_tag: String,
    inbound_marker: String,
}

impl Classifier {
    pub fn new(outbound_tag: impl Into<String>, inbound_marker: impl Into<String>) -> Self {
        Self {
            outbound_tag: outbound_tag.into(),
            inbound_marker: inbound_marker.into(),
        }
    }

    pub fn outbound_tag(&self) -> &str {
        &self.outbound_tag
    }

    /// Whether this conversation is part of an SMS-relayed thread.
    ///
    /// True iff the conversation is open and the outbound tag appears at
    /// the start of the latest message or of any historical part. A tag
    /// appearing mid-body never matches.
    pub fn is_relayed(&self, convo: &Conversation) -> bool {
        self.classify(convo, |latest| latest.starts_with(&self.outbound_tag))
    }

    /// Whether an inbound event's conversation should be relayed to SMS.
    ///
    /// Inbound classification happens before any reply has been tagged, so
    /// the latest-message check looks for the agent-typed intent marker
    /// (case-insensitive) instead of the outbound tag. The historical-part
    /// scan still recognizes previously tagged replies.
    pub fn is_inbound_relay_candidate(&self, convo: &Conversation) -> bool {
        self.classify(convo, |latest| {
            starts_with_ignore_ascii_case(latest, &self.inbound_marker)
        })
    }

    fn classify(&self, convo: &Conversation, latest_matches: impl Fn(&str) -> bool) -> bool {
        if !convo.open {
            return false;
        }

        let latest = plain_text(convo.latest_body().unwrap_or_default());
        if latest.is_empty() {
            return false;
        }
        if latest_matches(&latest) {
            return true;
        }

        convo
            .part_bodies()
            .any(|part| plain_text(part).starts_with(&self.outbound_tag))
    }

    /// Strip a leading tag artifact from an already-rendered body, so the
    /// marker an agent typed never leaks into the SMS text.
    pub fn strip_leading_tag(&self, body: &str) -> String {
        if let Some(rest) = body.strip_prefix(&self.outbound_tag) {
            return rest.trim_start().to_string();
        }
        if starts_with_ignore_ascii_case(body, &self.inbound_marker) {
            let marker_len = self.inbound_marker.chars().count();
            let rest: String = body.chars().skip(marker_len).collect();
            return rest.trim_start().to_string();
        }
        body.to_string()
    }
}

/// Render a rich-text/markup body to plain text.
pub fn plain_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    html2text::from_read(markup.as_bytes(), RENDER_WIDTH)
        .trim()
        .to_string()
}

fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    let head: String = text.chars().take(prefix.chars().count()).collect();
    head.eq_ignore_ascii_case(prefix)
}

// ── Tests ───────────────────────────────────────────────────────────
