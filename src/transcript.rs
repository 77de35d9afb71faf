//! An in-memory panel host. It backs the slash-command surface, where the
//! "panel" is the text handed back to the assistant, and doubles as the host
//! used in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::AssistantConfig;
use crate::host::{
    EditorHost, EditorSnapshot, PanelHandle, PanelHost, PanelId, PanelOptions, Subscription,
    ViewColumn,
};
use crate::protocol::Message;

#[derive(Clone, Debug)]
pub struct PanelRecord {
    options: PanelOptions,
    html: String,
    messages: Vec<Message>,
    column: ViewColumn,
    reveals: Vec<Option<ViewColumn>>,
    disposed: bool,
}

impl PanelRecord {
    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Every message posted to this panel, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Column the panel currently sits in.
    pub fn column(&self) -> ViewColumn {
        self.column
    }

    /// Reveal requests in order; `None` means "stay where you are".
    pub fn reveals(&self) -> &[Option<ViewColumn>] {
        &self.reveals
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[derive(Default)]
struct Shared {
    next_id: u64,
    panels: BTreeMap<PanelId, PanelRecord>,
    outbox: Vec<Message>,
    live_subscriptions: usize,
}

#[derive(Clone, Default)]
pub struct TranscriptHost {
    shared: Arc<Mutex<Shared>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TranscriptHost {
    pub fn panel(&self, id: PanelId) -> Option<PanelRecord> {
        lock(&self.shared).panels.get(&id).cloned()
    }

    pub fn created(&self) -> usize {
        lock(&self.shared).panels.len()
    }

    pub fn live_panels(&self) -> usize {
        lock(&self.shared)
            .panels
            .values()
            .filter(|panel| !panel.disposed)
            .count()
    }

    pub fn live_subscriptions(&self) -> usize {
        lock(&self.shared).live_subscriptions
    }

    /// Messages delivered to any panel since the last call.
    pub fn take_outbox(&self) -> Vec<Message> {
        std::mem::take(&mut lock(&self.shared).outbox)
    }
}

impl PanelHost for TranscriptHost {
    type Panel = TranscriptPanel;

    fn create_panel(&mut self, options: PanelOptions) -> TranscriptPanel {
        let mut shared = lock(&self.shared);
        shared.next_id += 1;
        let id = PanelId(shared.next_id);
        shared.panels.insert(
            id,
            PanelRecord {
                column: options.column,
                options,
                html: String::new(),
                messages: Vec::new(),
                reveals: Vec::new(),
                disposed: false,
            },
        );
        TranscriptPanel {
            id,
            shared: self.shared.clone(),
        }
    }
}

pub struct TranscriptPanel {
    id: PanelId,
    shared: Arc<Mutex<Shared>>,
}

impl TranscriptPanel {
    fn update<R>(&self, f: impl FnOnce(&mut PanelRecord) -> R) -> Option<R> {
        lock(&self.shared).panels.get_mut(&self.id).map(f)
    }

    fn subscribe(&mut self) -> Subscription {
        lock(&self.shared).live_subscriptions += 1;
        let shared = self.shared.clone();
        Subscription::new(move || {
            let mut shared = lock(&shared);
            shared.live_subscriptions = shared.live_subscriptions.saturating_sub(1);
        })
    }
}

impl PanelHandle for TranscriptPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn set_html(&mut self, html: String) {
        self.update(|panel| panel.html = html);
    }

    fn post_message(&mut self, message: &Message) -> bool {
        let mut shared = lock(&self.shared);
        let Some(panel) = shared.panels.get_mut(&self.id) else {
            return false;
        };
        if panel.disposed {
            return false;
        }
        panel.messages.push(message.clone());
        shared.outbox.push(message.clone());
        true
    }

    fn reveal(&mut self, column: Option<ViewColumn>) {
        self.update(|panel| {
            if let Some(column) = column {
                panel.column = column;
            }
            panel.reveals.push(column);
        });
    }

    fn on_did_receive_message(&mut self) -> Subscription {
        self.subscribe()
    }

    fn on_did_dispose(&mut self) -> Subscription {
        self.subscribe()
    }

    fn dispose(&mut self) {
        self.update(|panel| panel.disposed = true);
    }
}

/// An [`EditorHost`] over a fixed snapshot that records warnings.
#[derive(Default)]
pub struct StaticEditor {
    snapshot: Option<EditorSnapshot>,
    warnings: RefCell<Vec<String>>,
}

impl StaticEditor {
    pub fn new(snapshot: EditorSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            warnings: RefCell::default(),
        }
    }

    /// No editor is focused.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A document whose whole text is selected.
    pub fn with_selection(path: &str, language_id: &str, text: &str) -> Self {
        Self::new(EditorSnapshot {
            file_path: path.to_string(),
            language_id: language_id.to_string(),
            text: text.to_string(),
            selection: 0..text.len(),
            column: None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl EditorHost for StaticEditor {
    fn active_editor(&self) -> Option<EditorSnapshot> {
        self.snapshot.clone()
    }

    fn show_warning(&self, message: &str) {
        log::warn!("{message}");
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Renders messages the way the chat view would display them.
pub fn render_messages(messages: &[Message], config: &AssistantConfig) -> String {
    let mut lines = Vec::new();
    for message in messages {
        match message {
            Message::Ask { text } => lines.push(format!("{}: {text}", config.user_label)),
            Message::Response { text } => {
                lines.push(format!("{}: {text}", config.assistant_label))
            }
            Message::Seed { prompt, context } => {
                if let Some(context) = context {
                    lines.push(format!(
                        "Context loaded: {} ({})",
                        context.file_name, context.language
                    ));
                }
                if !prompt.is_empty() {
                    lines.push(prompt.clone());
                }
            }
        }
    }
    lines.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disposed_panel_rejects_messages() {
        let mut host = TranscriptHost::default();
        let mut panel = host.create_panel(PanelOptions {
            view_type: "t".into(),
            title: "t".into(),
            column: ViewColumn::ONE,
            enable_scripts: true,
            local_resource_roots: Vec::new(),
        });
        let message = Message::Response { text: "a".into() };
        assert!(panel.post_message(&message));
        panel.dispose();
        assert!(!panel.post_message(&message));

        let record = host.panel(panel.id()).unwrap();
        assert!(record.is_disposed());
        assert_eq!(record.messages(), &[message.clone()]);
        assert_eq!(host.take_outbox(), vec![message]);
        assert!(host.take_outbox().is_empty());
    }

    #[test]
    fn test_render_messages() {
        let messages = [
            Message::Seed {
                prompt: String::new(),
                context: Some(FileContext::new("foo.ts", "typescript", "let a=1;")),
            },
            Message::Response { text: "ok".into() },
        ];
        assert_eq!(
            render_messages(&messages, &AssistantConfig::default()),
            "Context loaded: foo.ts (typescript)\n\nARKAIOS: ok"
        );
    }
}
