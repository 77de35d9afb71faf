pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod panel;
pub mod protocol;
pub mod responder;
pub mod transcript;
pub mod view;

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use zed_extension_api::{self as zed, SlashCommand, SlashCommandOutput, Worktree};

pub use commands::{activate, deactivate, run_command, Command};
pub use config::AssistantConfig;
pub use context::FileContext;
pub use error::{Error, Result};
pub use panel::PanelController;
pub use protocol::Message;

use host::EditorSnapshot;
use responder::EchoResponder;
use serde_json::json;
use transcript::{StaticEditor, TranscriptHost};

/// Optional per-project overrides, read from the worktree root.
const CONFIG_FILE: &str = "arkaios.json";

/// Read access to the files of the project a slash command runs in.
trait ProjectFiles {
    fn read_text_file(&self, path: &str) -> std::result::Result<String, String>;
}

impl ProjectFiles for Worktree {
    fn read_text_file(&self, path: &str) -> std::result::Result<String, String> {
        Worktree::read_text_file(self, path)
    }
}

struct Session {
    controller: PanelController<TranscriptHost>,
    config_loaded: bool,
}

impl Session {
    fn new(extension_root: PathBuf) -> Self {
        Self {
            controller: PanelController::new(
                TranscriptHost::default(),
                AssistantConfig::default(),
                extension_root,
                EchoResponder,
            ),
            config_loaded: false,
        }
    }

    fn load_config(&mut self, files: &dyn ProjectFiles) -> Result<()> {
        if self.config_loaded {
            return Ok(());
        }
        match files.read_text_file(CONFIG_FILE) {
            Ok(json) => {
                self.controller.set_config(AssistantConfig::from_json(&json)?);
                log::info!("loaded {CONFIG_FILE}");
            }
            Err(error) => log::debug!("using default config: {error}"),
        }
        self.config_loaded = true;
        Ok(())
    }

    fn run(
        &mut self,
        name: &str,
        args: &[String],
        files: Option<&dyn ProjectFiles>,
    ) -> Result<String> {
        if let Some(files) = files {
            self.load_config(files)?;
        }

        let mut shown = Vec::new();
        match name {
            "arkaios" => {
                run_command(Command::OpenPanel, &StaticEditor::empty(), &mut self.controller)?;
            }
            "arkaios-explain" | "arkaios-refactor" => {
                let (language, code) = args
                    .split_first()
                    .ok_or(Error::MissingArgument("language"))?;
                let editor = StaticEditor::with_selection("", language, &code.join(" "));
                let command = if name == "arkaios-explain" {
                    Command::ExplainCode
                } else {
                    Command::RefactorCode
                };
                run_command(command, &editor, &mut self.controller)?;
            }
            "arkaios-file" => {
                let path = args.join(" ");
                if path.is_empty() {
                    return Err(Error::MissingArgument("path"));
                }
                let files =
                    files.ok_or_else(|| Error::Worktree("no worktree is open".to_string()))?;
                let text = files.read_text_file(&path).map_err(Error::Worktree)?;
                let editor = StaticEditor::new(EditorSnapshot {
                    language_id: context::language_for_path(&path).to_string(),
                    file_path: path,
                    text,
                    selection: 0..0,
                    column: None,
                });
                run_command(Command::AskWithContext, &editor, &mut self.controller)?;
            }
            "arkaios-ask" => {
                let text = args.join(" ");
                if text.trim().is_empty() {
                    return Err(Error::MissingArgument("question"));
                }
                let id = match self.controller.panel_id() {
                    Some(id) => id,
                    None => self
                        .controller
                        .create_or_show(&StaticEditor::empty(), None, None),
                };
                let json = json!({ "command": "ask", "text": text }).to_string();
                self.controller.handle_view_json(id, &json)?;
                shown.push(Message::Ask { text });
            }
            _ => return Err(Error::UnknownCommand(name.to_string())),
        }

        shown.extend(self.controller.host().take_outbox());
        let config = self.controller.config();
        if shown.is_empty() {
            return Ok(format!("{} is open.", config.title));
        }
        Ok(transcript::render_messages(&shown, config))
    }
}

struct ArkaiosExtension {
    session: Mutex<Session>,
}

impl zed::Extension for ArkaiosExtension {
    fn new() -> Self {
        activate();
        Self {
            session: Mutex::new(Session::new(std::env::current_dir().unwrap_or_default())),
        }
    }

    fn run_slash_command(
        &self,
        command: SlashCommand,
        args: Vec<String>,
        worktree: Option<&Worktree>,
    ) -> zed::Result<SlashCommandOutput> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let files = worktree.map(|worktree| worktree as &dyn ProjectFiles);
        let text = session.run(&command.name, &args, files)?;
        Ok(SlashCommandOutput {
            text,
            sections: Vec::new(),
        })
    }
}

impl Drop for ArkaiosExtension {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.lock() {
            deactivate(&mut session.controller);
        }
    }
}

zed::register_extension!(ArkaiosExtension);
