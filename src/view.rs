use serde_json::json;

use crate::config::AssistantConfig;

const TEMPLATE: &str = include_str!("../assets/panel.html");

/// Renders the chat view markup for `config`.
pub fn render(config: &AssistantConfig) -> String {
    let data = json!({
        "userLabel": config.user_label,
        "assistantLabel": config.assistant_label,
    })
    .to_string()
    .replace('<', "\\u003c");

    TEMPLATE
        .replace("{{title}}", &escape_html(&config.title))
        .replace("{{heading}}", &escape_html(&config.heading))
        .replace("{{placeholder}}", &escape_html(&config.placeholder))
        .replace("{{data}}", &data)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
