//! Intercom-shaped support platform client.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::PlatformConfig;
use crate::error::RelayError;
use crate::platform::PlatformApi;
use crate::platform::types::{Conversation, NewUser, User, UserPage};

/// REST client for the support platform.
pub struct IntercomClient {
    config: PlatformConfig,
    client: reqwest::Client,
}

/// Wire shape of `GET /users`.
#[derive(Deserialize)]
struct UserListPage {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Deserialize)]
struct Pages {
    /// Full URL of the next page; absent on the last page.
    #[serde(default)]
    next: Option<String>,
}

/// Wire shape of `GET /conversations`.
#[derive(Deserialize)]
struct ConversationList {
    #[serde(default)]
    conversations: Vec<Conversation>,
}

impl IntercomClient {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(self.config.token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Map a non-success status into the error taxonomy.
    async fn check(
        resp: reqwest::Response,
        what: &'static str,
    ) -> Result<reqwest::Response, RelayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(RelayError::Transport(format!(
            "{what} returned {status}: {body}"
        )))
    }
}

#[async_trait]
impl PlatformApi for IntercomClient {
    async fn find_user_by_id(&self, id: &str) -> Result<User, RelayError> {
        let resp = self
            .authed(self.client.get(self.api_url(&format!("/users/{id}"))))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RelayError::NotFound {
                entity: "user",
                id: id.to_string(),
            });
        }
        let resp = Self::check(resp, "find user").await?;
        Ok(resp.json().await?)
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<UserPage, RelayError> {
        // The cursor is the platform's own next-page URL.
        let url = match cursor {
            Some(next) => next.to_string(),
            None => self.api_url("/users?per_page=50"),
        };

        let resp = self.authed(self.client.get(url)).send().await?;
        let resp = Self::check(resp, "list users").await?;
        let page: UserListPage = resp.json().await?;

        Ok(UserPage {
            users: page.users,
            next_cursor: page.pages.and_then(|p| p.next),
        })
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, RelayError> {
        let resp = self
            .authed(self.client.post(self.api_url("/users")))
            .json(new_user)
            .send()
            .await?;
        let resp = Self::check(resp, "create user").await?;
        Ok(resp.json().await?)
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, RelayError> {
        let resp = self
            .authed(self.client.get(self.api_url("/conversations")))
            .query(&[
                ("type", "user"),
                ("intercom_user_id", user_id),
                ("sort", "updated_at"),
            ])
            .send()
            .await?;
        let resp = Self::check(resp, "list conversations").await?;
        let list: ConversationList = resp.json().await?;
        Ok(list.conversations)
    }

    async fn create_message(&self, from_user_id: &str, body: &str) -> Result<(), RelayError> {
        let resp = self
            .authed(self.client.post(self.api_url("/messages")))
            .json(&serde_json::json!({
                "from": { "type": "user", "id": from_user_id },
                "body": body,
            }))
            .send()
            .await?;
        Self::check(resp, "create message").await?;
        Ok(())
    }

    async fn reply_to_conversation(
        &self,
        conversation_id: &str,
        as_user_id: &str,
        body: &str,
    ) -> Result<(), RelayError> {
        let resp = self
            .authed(
                self.client
                    .post(self.api_url(&format!("/conversations/{conversation_id}/reply"))),
            )
            .json(&serde_json::json!({
                "type": "user",
                "intercom_user_id": as_user_id,
                "message_type": "comment",
                "body": body,
            }))
            .send()
            .await?;
        Self::check(resp, "reply to conversation").await?;
        Ok(())
    }

    async fn mark_conversation_read(&self, conversation_id: &str) -> Result<(), RelayError> {
        let resp = self
            .authed(
                self.client
                    .put(self.api_url(&format!("/conversations/{conversation_id}"))),
            )
            .json(&serde_json::json!({ "read": true }))
            .send()
            .await?;
        Self::check(resp, "mark conversation read").await?;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
