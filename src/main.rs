use std::sync::Arc;

use axum::extract::{Form, Json, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use secrecy::SecretString;
use tower_http::trace::TraceLayer;

use sms_bridge::config::{BridgeConfig, CarrierConfig, PlatformConfig};
use sms_bridge::error::ConfigError;
use sms_bridge::platform::types::{PlatformEvent, SmsEvent};
use sms_bridge::platform::{IntercomClient, TwilioClient};
use sms_bridge::relay::Relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Fail fast on missing credentials
    let intercom_token = required_env("INTERCOM_TOKEN")?;
    let twilio_sid = required_env("TWILIO_SID")?;
    let twilio_token = required_env("TWILIO_TOKEN")?;
    let twilio_number = required_env("TWILIO_NUMBER")?;

    let region = match std::env::var("BRIDGE_REGION") {
        Ok(raw) => raw
            .trim()
            .to_uppercase()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_REGION".to_string(),
                message: format!("unknown region code: {raw}"),
            })?,
        Err(_) => phonenumber::country::US,
    };

    let port: u16 = std::env::var("BRIDGE_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let config = BridgeConfig {
        default_region: region,
        sms_source_number: twilio_number,
        ..BridgeConfig::default()
    };

    let platform = Arc::new(IntercomClient::new(PlatformConfig::new(SecretString::from(
        intercom_token,
    ))));
    let sms = Arc::new(TwilioClient::new(CarrierConfig::new(
        twilio_sid,
        SecretString::from(twilio_token),
    )));

    let relay = Arc::new(Relay::new(config, platform, sms));

    let app = Router::new()
        .route("/sms", post(sms_webhook))
        .route("/intercom", post(platform_webhook))
        // Everything else (carrier status callbacks, probes) gets a bare 200.
        .fallback(|| async { StatusCode::OK })
        .layer(TraceLayer::new_for_http())
        .with_state(relay);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Listening on port {port}");
    axum::serve(listener, app).await?;

    Ok(())
}

fn required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Carrier webhook. Acknowledges with an empty TwiML response immediately;
/// the bridging saga runs detached so handler latency never blocks the
/// carrier's delivery pipeline.
async fn sms_webhook(
    State(relay): State<Arc<Relay>>,
    Form(event): Form<SmsEvent>,
) -> impl IntoResponse {
    tokio::spawn(async move {
        let result = async {
            let received = relay.receive_from_sms(&event).await?;
            relay
                .send_to_platform(received.from.as_str(), &received.body)
                .await
        }
        .await;

        if let Err(err) = result {
            if err.is_transport() {
                tracing::error!("SMS error: {err}");
            } else {
                tracing::warn!("SMS event dropped: {err}");
            }
        }
    });

    (
        [(header::CONTENT_TYPE, "text/xml")],
        "<Response></Response>",
    )
}

/// Platform webhook. Acknowledges immediately; relays to SMS detached.
async fn platform_webhook(
    State(relay): State<Arc<Relay>>,
    Json(event): Json<PlatformEvent>,
) -> impl IntoResponse {
    tokio::spawn(async move {
        let result = async {
            match relay.receive_from_platform(&event).await? {
                Some(out) => relay.send_to_sms(out.to.as_str(), &out.body).await,
                None => {
                    tracing::debug!("conversation is not relayed; ignoring");
                    Ok(())
                }
            }
        }
        .await;

        if let Err(err) = result {
            if err.is_transport() {
                tracing::error!("Intercom error: {err}");
            } else {
                tracing::warn!("Intercom event dropped: {err}");
            }
        }
    });

    StatusCode::OK
}
