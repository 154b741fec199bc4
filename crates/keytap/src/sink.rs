use crate::keystroke::{Keystroke, NamedKey};
use derive_more::Display;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// Placeholder replaced by the text or key name in a [`CommandTemplate`].
pub const PLACEHOLDER: &str = "{}";

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("Command template is empty")]
    EmptyTemplate,
    #[error("Invalid command template: {0}")]
    Template(#[from] shell_words::ParseError),
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Receives keystrokes produced by the typing core.
pub trait KeySink {
    fn send(&mut self, stroke: &Keystroke) -> Result<(), InjectError>;

    fn send_all(&mut self, strokes: &[Keystroke]) -> Result<(), InjectError> {
        strokes.iter().try_for_each(|s| self.send(s))
    }
}

/// A shell-style command line such as `xdotool type --clearmodifiers -- {}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct CommandTemplate(String);

crate::impl_string_newtype!(CommandTemplate);

impl CommandTemplate {
    /// Splits the template into argv, substituting `arg` for every placeholder.
    /// A template without a placeholder gets `arg` appended as the last argument.
    pub fn render(&self, arg: &str) -> Result<Vec<String>, InjectError> {
        let words = shell_words::split(&self.0)?;
        if words.is_empty() {
            return Err(InjectError::EmptyTemplate);
        }

        let has_placeholder = words.iter().any(|w| w.contains(PLACEHOLDER));
        let mut argv: Vec<String> = words
            .into_iter()
            .map(|w| w.replace(PLACEHOLDER, arg))
            .collect();
        if !has_placeholder {
            argv.push(arg.to_string());
        }
        Ok(argv)
    }
}

/// Injects keystrokes by running an external tool once per keystroke.
#[derive(Debug, Clone)]
pub struct CommandSink {
    pub type_command: CommandTemplate,
    pub key_command: CommandTemplate,
}

impl Default for CommandSink {
    fn default() -> Self {
        Self {
            type_command: CommandTemplate::new("xdotool type --clearmodifiers -- {}"),
            key_command: CommandTemplate::new("xdotool key --clearmodifiers {}"),
        }
    }
}

impl CommandSink {
    pub fn new(type_command: CommandTemplate, key_command: CommandTemplate) -> Self {
        Self {
            type_command,
            key_command,
        }
    }

    fn run(argv: Vec<String>) -> Result<(), InjectError> {
        let (program, args) = argv.split_first().ok_or(InjectError::EmptyTemplate)?;
        let status = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| InjectError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(InjectError::Failed {
                program: program.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl KeySink for CommandSink {
    fn send(&mut self, stroke: &Keystroke) -> Result<(), InjectError> {
        let argv = match stroke {
            Keystroke::Text(text) if text.is_empty() => return Ok(()),
            Keystroke::Text(text) => self.type_command.render(text)?,
            Keystroke::Key(key) => self.key_command.render(key.keysym())?,
        };
        Self::run(argv)
    }
}

/// Dry-run sink: logs what would have been typed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl KeySink for LogSink {
    fn send(&mut self, stroke: &Keystroke) -> Result<(), InjectError> {
        match stroke {
            Keystroke::Text(text) => log::info!("type {:?}", text),
            Keystroke::Key(key) => log::info!("key {}", key),
        }
        Ok(())
    }
}

/// Collects keystrokes in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    strokes: Arc<Mutex<Vec<Keystroke>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> Vec<Keystroke> {
        self.strokes.lock().clone()
    }

    /// Replays the recording into a plain string, applying backspaces.
    pub fn rendered(&self) -> String {
        let mut out = String::new();
        for stroke in self.strokes.lock().iter() {
            match stroke {
                Keystroke::Text(text) => out.push_str(text),
                Keystroke::Key(NamedKey::Backspace) => {
                    out.pop();
                }
                Keystroke::Key(NamedKey::Enter) => out.push('\n'),
                Keystroke::Key(_) => {}
            }
        }
        out
    }

    pub fn clear(&self) {
        self.strokes.lock().clear();
    }
}

impl KeySink for RecordingSink {
    fn send(&mut self, stroke: &Keystroke) -> Result<(), InjectError> {
        self.strokes.lock().push(stroke.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitutes_placeholder() {
        let t = CommandTemplate::new("xdotool type --clearmodifiers -- {}");
        assert_eq!(
            t.render("hello world").unwrap(),
            vec!["xdotool", "type", "--clearmodifiers", "--", "hello world"]
        );
    }

    #[test]
    fn test_template_without_placeholder_appends() {
        let t = CommandTemplate::new("wtype -k");
        assert_eq!(t.render("Return").unwrap(), vec!["wtype", "-k", "Return"]);
    }

    #[test]
    fn test_template_quoting() {
        let t = CommandTemplate::new("sh -c 'printf %s \"{}\"'");
        assert_eq!(
            t.render("x").unwrap(),
            vec!["sh", "-c", "printf %s \"x\""]
        );
    }

    #[test]
    fn test_template_errors() {
        assert!(matches!(
            CommandTemplate::new("   ").render("a"),
            Err(InjectError::EmptyTemplate)
        ));
        assert!(matches!(
            CommandTemplate::new("xdotool 'type").render("a"),
            Err(InjectError::Template(_))
        ));
    }

    #[test]
    fn test_recording_sink_renders_edits() {
        let mut sink = RecordingSink::new();
        let reader = sink.clone();
        sink.send_all(&[
            Keystroke::text("mo"),
            Keystroke::Key(NamedKey::Backspace),
            Keystroke::text("y "),
            Keystroke::Key(NamedKey::Left),
        ])
        .unwrap();

        assert_eq!(reader.strokes().len(), 4);
        assert_eq!(reader.rendered(), "my ");

        reader.clear();
        assert!(sink.strokes().is_empty());
    }

    #[test]
    fn test_command_sink_reports_missing_program() {
        let mut sink = CommandSink::new(
            CommandTemplate::new("/nonexistent/keytap-test-binary {}"),
            CommandTemplate::new("/nonexistent/keytap-test-binary {}"),
        );
        let err = sink.send(&Keystroke::text("a")).unwrap_err();
        assert!(matches!(err, InjectError::Spawn { .. }));

        // empty text never spawns anything
        assert!(sink.send(&Keystroke::text("")).is_ok());
    }
}
