use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// User-facing strings and panel identity. Every field has a default, so an
/// empty object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub title: String,
    pub view_type: String,
    pub heading: String,
    pub placeholder: String,
    pub user_label: String,
    pub assistant_label: String,
    /// Directory under the extension root the view may load resources from.
    pub resource_dir: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            title: "ARKAIOS Assistant".into(),
            view_type: "arkaiosChat".into(),
            heading: "ARKAIOS AI Builder".into(),
            placeholder: "Type your question or command...".into(),
            user_label: "You".into(),
            assistant_label: "ARKAIOS".into(),
            resource_dir: "media".into(),
        }
    }
}

impl AssistantConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }
}
