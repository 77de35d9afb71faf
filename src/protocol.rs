use serde::{Deserialize, Serialize};

use crate::context::FileContext;
use crate::error::{Error, Result};

/// Messages exchanged between the panel controller and its rendered view.
///
/// The wire form is a JSON object tagged by `command`. `ask` flows from the
/// view to the controller, `response` and `seed` flow the other way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Message {
    Ask {
        text: String,
    },
    Response {
        text: String,
    },
    Seed {
        prompt: String,
        context: Option<FileContext>,
    },
}

impl Message {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Protocol)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Protocol)
    }

    pub fn command(&self) -> &'static str {
        match self {
            Message::Ask { .. } => "ask",
            Message::Response { .. } => "response",
            Message::Seed { .. } => "seed",
        }
    }
}
