//! Client → server WebSocket messages

use localmind_domain::ResearchMode;
use serde::Deserialize;

/// A message sent by the dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a research run
    Research {
        #[serde(default)]
        query: String,
        #[serde(default)]
        mode: Option<String>,
    },
    /// Liveness probe, answered with `pong`
    Ping,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Requested mode; unknown or missing values mean `auto`
    pub fn mode(&self) -> ResearchMode {
        match self {
            ClientMessage::Research { mode, .. } => ResearchMode::parse_lenient(mode.as_deref()),
            ClientMessage::Ping => ResearchMode::default(),
        }
    }
}
