use std::path::PathBuf;

use log::{debug, warn};

use crate::config::AssistantConfig;
use crate::context::FileContext;
use crate::error::Result;
use crate::host::{
    EditorHost, PanelEvent, PanelHandle, PanelHost, PanelId, PanelOptions, Subscription,
};
use crate::protocol::Message;
use crate::responder::Responder;
use crate::view;

struct PanelState<P> {
    panel: P,
    initial_prompt: Option<String>,
    file_context: Option<FileContext>,
    subscriptions: Vec<Subscription>,
}

impl<P: PanelHandle> PanelState<P> {
    fn set_initial_data(&mut self, prompt: Option<String>, context: Option<FileContext>) {
        self.initial_prompt = prompt.filter(|prompt| !prompt.is_empty());
        self.file_context = context;
        self.send_initial_data();
    }

    fn send_initial_data(&mut self) {
        if self.initial_prompt.is_none() && self.file_context.is_none() {
            return;
        }
        let seed = Message::Seed {
            prompt: self.initial_prompt.clone().unwrap_or_default(),
            context: self.file_context.clone(),
        };
        if !self.panel.post_message(&seed) {
            warn!("{} dropped seed message", self.panel.id());
        }
    }
}

/// Owns the single assistant panel.
///
/// At most one panel is alive per controller. Asking for a panel while one is
/// open reveals it and replaces its seed data instead of creating another.
pub struct PanelController<H: PanelHost> {
    host: H,
    config: AssistantConfig,
    extension_root: PathBuf,
    responder: Box<dyn Responder>,
    current: Option<PanelState<H::Panel>>,
}

impl<H: PanelHost> PanelController<H> {
    pub fn new(
        host: H,
        config: AssistantConfig,
        extension_root: impl Into<PathBuf>,
        responder: impl Responder + 'static,
    ) -> Self {
        Self {
            host,
            config,
            extension_root: extension_root.into(),
            responder: Box::new(responder),
            current: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Replaces the configuration. An open panel is re-rendered with it.
    pub fn set_config(&mut self, config: AssistantConfig) {
        self.config = config;
        if let Some(state) = self.current.as_mut() {
            state.panel.set_html(view::render(&self.config));
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn panel_id(&self) -> Option<PanelId> {
        self.current.as_ref().map(|state| state.panel.id())
    }

    pub fn create_or_show(
        &mut self,
        editor: &dyn EditorHost,
        initial_prompt: Option<String>,
        file_context: Option<FileContext>,
    ) -> PanelId {
        let column = editor.active_column();

        if let Some(state) = self.current.as_mut() {
            state.panel.reveal(column);
            state.set_initial_data(initial_prompt, file_context);
            return state.panel.id();
        }

        let options = PanelOptions {
            view_type: self.config.view_type.clone(),
            title: self.config.title.clone(),
            column: column.unwrap_or_default(),
            enable_scripts: true,
            local_resource_roots: vec![self.extension_root.join(&self.config.resource_dir)],
        };
        let mut panel = self.host.create_panel(options);
        let id = panel.id();
        debug!("created {id}");

        panel.set_html(view::render(&self.config));
        let subscriptions = vec![panel.on_did_dispose(), panel.on_did_receive_message()];

        let mut state = PanelState {
            panel,
            initial_prompt: None,
            file_context: None,
            subscriptions,
        };
        state.set_initial_data(initial_prompt, file_context);
        self.current = Some(state);
        id
    }

    /// Routes an event the host observed on panel `id`. Events for a panel
    /// that is no longer current are dropped.
    pub fn handle_event(&mut self, id: PanelId, event: PanelEvent) {
        if self.panel_id() != Some(id) {
            debug!("ignoring {event:?} for stale {id}");
            return;
        }
        match event {
            PanelEvent::Disposed => self.dispose(),
            PanelEvent::Message(Message::Ask { text }) => self.handle_chat(&text),
            PanelEvent::Message(message) => {
                warn!("unexpected {} message from view", message.command());
            }
        }
    }

    /// Parses a raw view message and routes it to panel `id`.
    pub fn handle_view_json(&mut self, id: PanelId, json: &str) -> Result<()> {
        let message = Message::from_json(json)?;
        self.handle_event(id, PanelEvent::Message(message));
        Ok(())
    }

    fn handle_chat(&mut self, text: &str) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        let response = Message::Response {
            text: self.responder.respond(text),
        };
        if !state.panel.post_message(&response) {
            warn!("{} dropped response message", state.panel.id());
        }
    }

    /// Closes the panel and releases its subscriptions. No-op when closed.
    pub fn dispose(&mut self) {
        let Some(mut state) = self.current.take() else {
            return;
        };
        debug!("disposing {}", state.panel.id());
        state.panel.dispose();
        while let Some(subscription) = state.subscriptions.pop() {
            subscription.dispose();
        }
    }
}

impl<H: PanelHost> Drop for PanelController<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
