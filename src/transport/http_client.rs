use async_trait::async_trait;
use serde_json::json;

use super::{ChatTransport, OutboundMessage};
use crate::error::{Error, Result};

/// Posts messages to a generic "bot API" base URL: a thin reqwest client
/// that fires a JSON payload per call.
pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl HttpChatTransport {
    pub fn new(base_url: String, bot_token: String) -> Self {
        Self { client: reqwest::Client::new(), base_url, bot_token }
    }

    fn inline_keyboard(buttons: &[Vec<(String, String)>]) -> serde_json::Value {
        let rows: Vec<Vec<serde_json::Value>> = buttons
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(label, data)| json!({ "text": label, "callback_data": data }))
                    .collect()
            })
            .collect();
        json!({ "inline_keyboard": rows })
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send_message(&self, message: OutboundMessage) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let mut body = json!({
            "chat_id": message.chat_id,
            "text": message.text,
        });
        if !message.buttons.is_empty() {
            body["reply_markup"] = Self::inline_keyboard(&message.buttons);
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::TransportTransient(e.to_string()))?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::TransportUserBlocked);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(Error::TransportTransient(format!("{status}: {body_text}")));
        }
        Ok(())
    }
}
