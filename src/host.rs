//! The editor and panel surface the assistant is hosted in.
//!
//! Nothing in this module talks to a real editor; hosts implement these traits
//! and drive the [`PanelController`](crate::panel::PanelController) with
//! [`PanelEvent`]s.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use crate::context::{base_name, FileContext};
use crate::protocol::Message;

/// One-based editor column a panel is shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewColumn(pub u8);

impl ViewColumn {
    pub const ONE: ViewColumn = ViewColumn(1);
}

impl Default for ViewColumn {
    fn default() -> Self {
        Self::ONE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel-{}", self.0)
    }
}

/// State of the active editor at the moment a command fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub file_path: String,
    pub language_id: String,
    pub text: String,
    /// Byte range into `text`.
    pub selection: Range<usize>,
    pub column: Option<ViewColumn>,
}

impl EditorSnapshot {
    pub fn selected_text(&self) -> &str {
        self.text.get(self.selection.clone()).unwrap_or_default()
    }

    pub fn file_context(&self) -> FileContext {
        FileContext::new(
            base_name(&self.file_path),
            self.language_id.clone(),
            self.text.clone(),
        )
    }
}

pub trait EditorHost {
    fn active_editor(&self) -> Option<EditorSnapshot>;

    fn show_warning(&self, message: &str);

    fn active_column(&self) -> Option<ViewColumn> {
        self.active_editor().and_then(|editor| editor.column)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelOptions {
    pub view_type: String,
    pub title: String,
    pub column: ViewColumn,
    pub enable_scripts: bool,
    /// The view may only load resources from beneath these roots.
    pub local_resource_roots: Vec<PathBuf>,
}

pub trait PanelHost {
    type Panel: PanelHandle;

    fn create_panel(&mut self, options: PanelOptions) -> Self::Panel;
}

pub trait PanelHandle {
    fn id(&self) -> PanelId;

    fn set_html(&mut self, html: String);

    /// Queues a message for the view. Returns false when the view is gone.
    fn post_message(&mut self, message: &Message) -> bool;

    /// Focuses the panel, moving it to `column` when one is given.
    fn reveal(&mut self, column: Option<ViewColumn>);

    /// Starts forwarding view messages as [`PanelEvent::Message`] until the
    /// returned subscription is released.
    fn on_did_receive_message(&mut self) -> Subscription;

    /// Starts forwarding host-side closure as [`PanelEvent::Disposed`].
    fn on_did_dispose(&mut self) -> Subscription;

    fn dispose(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    Message(Message),
    /// The user closed the view.
    Disposed,
}

/// A disposal handle. Runs its release callback once, either through
/// [`Subscription::dispose`] or when dropped.
#[must_use]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.release.is_some())
            .finish()
    }
}
