//! Configuration types.

use phonenumber::country;
use secrecy::SecretString;

/// Bridge configuration.
///
/// Passed into each component at construction so tests can inject fixtures;
/// nothing in the core reads ambient process state.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Home region used to parse phone numbers without a country prefix.
    pub default_region: country::Id,
    /// Carrier-side source number all outbound SMS are sent from.
    pub sms_source_number: String,
    /// Prefix prepended to every platform message this bridge creates from
    /// an SMS. Later inbound webhooks recognize the thread by this prefix.
    pub outbound_tag: String,
    /// Prefix a support agent types to route a conversation to SMS.
    /// Matched case-insensitively.
    pub inbound_marker: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_region: country::US,
            sms_source_number: String::new(),
            outbound_tag: "SMS: ".to_string(),
            inbound_marker: "sms:".to_string(),
        }
    }
}

/// Credentials for the support platform API.
#[derive(Debug)]
pub struct PlatformConfig {
    pub token: SecretString,
    pub base_url: String,
}

impl PlatformConfig {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            base_url: "https://api.intercom.io".to_string(),
        }
    }
}

/// Credentials for the SMS carrier API.
#[derive(Debug)]
pub struct CarrierConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    pub base_url: String,
}

impl CarrierConfig {
    pub fn new(account_sid: String, auth_token: SecretString) -> Self {
        Self {
            account_sid,
            auth_token,
            base_url: "https://api.twilio.com".to_string(),
        }
    }
}
