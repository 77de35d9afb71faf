use log::{debug, info};

use crate::error::{Error, Result};
use crate::host::{EditorHost, PanelHost};
use crate::panel::PanelController;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    OpenPanel,
    ExplainCode,
    RefactorCode,
    AskWithContext,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::OpenPanel,
        Command::ExplainCode,
        Command::RefactorCode,
        Command::AskWithContext,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Command::OpenPanel => "arkaios.openPanel",
            Command::ExplainCode => "arkaios.explainCode",
            Command::RefactorCode => "arkaios.refactorCode",
            Command::AskWithContext => "arkaios.askWithContext",
        }
    }
}

pub fn explain_prompt(language: &str, code: &str) -> String {
    format!("Explain this {language} code clearly and concisely:\n\n```{language}\n{code}\n```")
}

pub fn refactor_prompt(language: &str, code: &str) -> String {
    format!(
        "Refactor this {language} code to make it cleaner, more efficient, \
         and aligned with best practices:\n\n```{language}\n{code}\n```"
    )
}

/// Runs `command` against the active editor.
///
/// Precondition failures are shown to the user as warnings and returned;
/// the panel is left untouched in that case.
pub fn run_command<H: PanelHost>(
    command: Command,
    editor: &dyn EditorHost,
    controller: &mut PanelController<H>,
) -> Result<()> {
    debug!("running {}", command.id());
    let result = dispatch(command, editor, controller);
    if let Err(error) = &result {
        if error.is_user_warning() {
            editor.show_warning(&error.to_string());
        }
    }
    result
}

fn dispatch<H: PanelHost>(
    command: Command,
    editor: &dyn EditorHost,
    controller: &mut PanelController<H>,
) -> Result<()> {
    match command {
        Command::OpenPanel => {
            controller.create_or_show(editor, None, None);
        }
        Command::ExplainCode | Command::RefactorCode => {
            let snapshot = editor.active_editor().ok_or(Error::NoActiveEditor)?;
            let selection = snapshot.selected_text();
            if selection.trim().is_empty() {
                return Err(Error::EmptySelection);
            }
            let prompt = if command == Command::ExplainCode {
                explain_prompt(&snapshot.language_id, selection)
            } else {
                refactor_prompt(&snapshot.language_id, selection)
            };
            controller.create_or_show(editor, Some(prompt), None);
        }
        Command::AskWithContext => {
            let snapshot = editor.active_editor().ok_or(Error::NoActiveEditor)?;
            controller.create_or_show(editor, None, Some(snapshot.file_context()));
        }
    }
    Ok(())
}

pub fn activate() -> &'static [Command] {
    info!("ARKAIOS extension activated");
    &Command::ALL
}

pub fn deactivate<H: PanelHost>(controller: &mut PanelController<H>) {
    controller.dispose();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistantConfig;
    use crate::context::FileContext;
    use crate::host::EditorSnapshot;
    use crate::protocol::Message;
    use crate::responder::EchoResponder;
    use crate::transcript::{StaticEditor, TranscriptHost};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn controller() -> PanelController<TranscriptHost> {
        PanelController::new(
            TranscriptHost::default(),
            AssistantConfig::default(),
            "/ext",
            EchoResponder,
        )
    }

    #[test]
    fn test_activate_registers_every_command() {
        let ids: HashSet<_> = activate().iter().map(|command| command.id()).collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|id| id.starts_with("arkaios.")));
    }

    #[test]
    fn test_selection_commands_need_an_editor() {
        for command in [Command::ExplainCode, Command::RefactorCode, Command::AskWithContext] {
            let mut controller = controller();
            let editor = StaticEditor::empty();

            let error = run_command(command, &editor, &mut controller).unwrap_err();

            assert!(matches!(error, Error::NoActiveEditor));
            assert_eq!(editor.warnings(), vec!["ARKAIOS: No active editor".to_string()]);
            assert!(!controller.is_open());
            assert!(controller.host().take_outbox().is_empty());
        }
    }

    #[test]
    fn test_whitespace_selection_is_rejected() {
        for command in [Command::ExplainCode, Command::RefactorCode] {
            let mut controller = controller();
            let editor = StaticEditor::with_selection("a.py", "python", "  \n\t ");

            let error = run_command(command, &editor, &mut controller).unwrap_err();

            assert!(matches!(error, Error::EmptySelection));
            assert_eq!(
                editor.warnings(),
                vec!["ARKAIOS: Select some code first".to_string()]
            );
            assert!(controller.host().take_outbox().is_empty());
        }
    }

    #[test]
    fn test_explain_prompt_fences_code() {
        let mut controller = controller();
        let editor = StaticEditor::with_selection("a.py", "python", "x=1");

        run_command(Command::ExplainCode, &editor, &mut controller).unwrap();

        let outbox = controller.host().take_outbox();
        assert_eq!(outbox.len(), 1);
        let Message::Seed { prompt, context } = &outbox[0] else {
            panic!("expected seed, got {:?}", outbox[0]);
        };
        assert!(prompt.contains("python"));
        assert!(prompt.contains("```python\nx=1\n```"), "{prompt}");
        assert!(prompt.starts_with("Explain"));
        assert_eq!(context, &None);
        assert!(editor.warnings().is_empty());
    }

    #[test]
    fn test_refactor_uses_selection_only() {
        let mut controller = controller();
        let editor = StaticEditor::new(EditorSnapshot {
            file_path: "lib.rs".into(),
            language_id: "rust".into(),
            text: "fn a() {}\nfn b() {}".into(),
            selection: 10..19,
            column: None,
        });

        run_command(Command::RefactorCode, &editor, &mut controller).unwrap();

        assert_eq!(
            controller.host().take_outbox(),
            vec![Message::Seed {
                prompt: refactor_prompt("rust", "fn b() {}"),
                context: None,
            }]
        );
    }

    #[test]
    fn test_ask_with_context_sends_file_snapshot() {
        let mut controller = controller();
        let editor = StaticEditor::new(EditorSnapshot {
            file_path: "/repo/src/foo.ts".into(),
            language_id: "typescript".into(),
            text: "let a=1;".into(),
            selection: 0..0,
            column: None,
        });

        run_command(Command::AskWithContext, &editor, &mut controller).unwrap();

        assert_eq!(
            controller.host().take_outbox(),
            vec![Message::Seed {
                prompt: String::new(),
                context: Some(FileContext::new("foo.ts", "typescript", "let a=1;")),
            }]
        );
    }

    #[test]
    fn test_open_panel_twice_then_deactivate() {
        let mut controller = controller();
        let editor = StaticEditor::empty();

        run_command(Command::OpenPanel, &editor, &mut controller).unwrap();
        run_command(Command::OpenPanel, &editor, &mut controller).unwrap();
        assert_eq!(controller.host().live_panels(), 1);
        assert!(controller.host().take_outbox().is_empty());

        deactivate(&mut controller);
        assert_eq!(controller.host().live_panels(), 0);
        assert_eq!(controller.host().live_subscriptions(), 0);
    }
}
