//! Twilio-shaped SMS carrier client.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::config::CarrierConfig;
use crate::error::RelayError;
use crate::platform::SmsApi;

/// REST client for the SMS carrier.
pub struct TwilioClient {
    config: CarrierConfig,
    client: reqwest::Client,
}

impl TwilioClient {
    pub fn new(config: CarrierConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsApi for TwilioClient {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), RelayError> {
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(RelayError::Transport(format!(
                "send sms returned {status}: {detail}"
            )));
        }

        tracing::info!(to, "sms sent");
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
