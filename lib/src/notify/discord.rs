use std::time::Duration;

use serde_derive::Serialize;
use tracing::debug;

use crate::error::WatchError;

use super::{split_message, Notifier};

pub const DISCORD_API_ENDPOINT: &str = "https://discord.com/api/v10";

/// Discord's limit on the length of a single message.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Posts notifications to a Discord channel as a bot user.
pub struct DiscordNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    channel_id: String,
}

impl DiscordNotifier {
    pub fn new(bot_token: String, channel_id: String, timeout: Duration) -> Result<Self, WatchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| WatchError::Other(format!("Error building HTTP client: {err}").into()))?;

        Ok(Self {
            client,
            bot_token,
            channel_id,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", DISCORD_API_ENDPOINT, self.channel_id)
    }

    fn send_chunk(&self, content: &str) -> Result<(), WatchError> {
        let response = self
            .client
            .post(self.messages_url())
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.bot_token))
            .json(&CreateMessage { content })
            .send()
            .map_err(|err| WatchError::Notify(err.to_string().into()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();

            return Err(WatchError::Notify(format!("Discord responded with {status}: {body}").into()));
        }

        Ok(())
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, message: &str) -> Result<(), WatchError> {
        let chunks = split_message(message, DISCORD_MESSAGE_LIMIT);

        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Sending message part {}/{} to channel {}.", i + 1, chunks.len(), self.channel_id);

            self.send_chunk(chunk)?;
        }

        Ok(())
    }
}
