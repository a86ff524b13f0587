//! Writing text to the system clipboard.
//!
//! The serializer never touches the clipboard itself; a [`Clipboard`] backend
//! receives the finished string. Backends are chosen from the `[clipboard]`
//! config section by [`clipboard_from_config`].

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::{ClipboardBackend, ClipboardConfig};
use crate::error::ClipboardError;

/// A destination for copied text.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Short description for log messages.
    fn name(&self) -> String;
}

/// Pipes text into a clipboard program such as `pbcopy` or `wl-copy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Build from an argv list. Returns `None` for an empty list.
    pub fn new(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Find the first clipboard program for this platform on `PATH`.
    pub fn detect() -> Result<Self, ClipboardError> {
        let candidates = candidates();
        for argv in &candidates {
            if find_in_path(argv[0]) {
                let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
                if let Some(clipboard) = Self::new(&argv) {
                    log::debug!("using clipboard program {}", clipboard.program);
                    return Ok(clipboard);
                }
            }
        }

        Err(ClipboardError::NoProgram {
            tried: candidates
                .iter()
                .map(|argv| argv[0])
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn candidates() -> Vec<Vec<&'static str>> {
    if cfg!(target_os = "macos") {
        vec![vec!["pbcopy"]]
    } else if cfg!(windows) {
        vec![vec!["clip"]]
    } else {
        let mut list = Vec::new();
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            list.push(vec!["wl-copy"]);
        }
        list.push(vec!["xclip", "-selection", "clipboard"]);
        list.push(vec!["xsel", "--clipboard", "--input"]);
        list
    }
}

fn find_in_path(program: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        is_file(&candidate) || (cfg!(windows) && is_file(&candidate.with_extension("exe")))
    })
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let spawn_error = |source| ClipboardError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Dropping stdin closes the pipe so the program sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        // Always reap the child; its exit status explains a broken pipe
        let output = child.wait_with_output().map_err(spawn_error)?;
        if !output.status.success() {
            if let Err(e) = &written {
                log::debug!("{} closed its input early: {}", self.program, e);
            }
            return Err(ClipboardError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;
        Ok(())
    }

    fn name(&self) -> String {
        self.program.clone()
    }
}

/// Sets the clipboard through the terminal with an OSC 52 escape sequence.
/// Works over SSH in terminals that support it.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{}\x07", encoded)?;
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> String {
        "osc52".to_string()
    }
}

/// Prints the text instead of copying it.
pub struct StdoutClipboard<W: Write> {
    out: W,
}

impl<W: Write> StdoutClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl StdoutClipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Clipboard for StdoutClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> String {
        "stdout".to_string()
    }
}

/// Keeps the last copied text in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// How many times text was written.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

/// Build the clipboard backend the config asks for.
///
/// `auto` uses the configured command, else a detected program, and falls
/// back to OSC 52 when stdout is a terminal.
pub fn clipboard_from_config(
    config: &ClipboardConfig,
) -> Result<Box<dyn Clipboard>, ClipboardError> {
    match config.backend {
        ClipboardBackend::Stdout => Ok(Box::new(StdoutClipboard::stdout())),
        ClipboardBackend::Osc52 => Ok(Box::new(Osc52Clipboard::stdout())),
        ClipboardBackend::Command => match CommandClipboard::new(&config.command) {
            Some(clipboard) => Ok(Box::new(clipboard)),
            None => Ok(Box::new(CommandClipboard::detect()?)),
        },
        ClipboardBackend::Auto => {
            if let Some(clipboard) = CommandClipboard::new(&config.command) {
                return Ok(Box::new(clipboard));
            }
            match CommandClipboard::detect() {
                Ok(clipboard) => Ok(Box::new(clipboard)),
                Err(e) if io::stdout().is_terminal() => {
                    log::info!("{}, falling back to OSC 52", e);
                    Ok(Box::new(Osc52Clipboard::stdout()))
                }
                Err(e) => Err(e),
            }
        }
    }
}
