use std::path::Path;

use serde::{Deserialize, Serialize};

const UNTITLED: &str = "untitled";

/// Snapshot of a document taken when a command was invoked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContext {
    pub file_name: String,
    pub language: String,
    pub content: String,
}

impl FileContext {
    pub fn new(
        file_name: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            language: language.into(),
            content: content.into(),
        }
    }
}

pub fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Best-effort language id for hosts that only hand us a path.
pub fn language_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "rs" => "rust",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "py" => "python",
        "go" => "go",
        "rb" => "ruby",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" => "markdown",
        "html" | "htm" => "html",
        "css" => "css",
        "sh" | "bash" => "shellscript",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_name_strips_directories() {
        let context = FileContext::new(base_name("/work/src/foo.ts"), "typescript", "let a=1;");
        assert_eq!(
            context,
            FileContext {
                file_name: "foo.ts".into(),
                language: "typescript".into(),
                content: "let a=1;".into(),
            }
        );
    }

    #[test]
    fn test_base_name_falls_back_to_untitled() {
        assert_eq!(base_name(""), "untitled");
        assert_eq!(base_name("/"), "untitled");
        assert_eq!(base_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_serializes_camel_case() {
        let context = FileContext::new("a.py", "python", "x=1");
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fileName": "a.py", "language": "python", "content": "x=1"})
        );
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path("src/lib.rs"), "rust");
        assert_eq!(language_for_path("app/Main.TS"), "typescript");
        assert_eq!(language_for_path("Makefile"), "plaintext");
    }
}
