//! Line-oriented terminal host.
//!
//! The binary drives the widget from stdin. Each line is a [`Command`], which
//! maps to zero or more [`UiEvent`]s. Dialogs opened by the widget read their
//! answer from the same input, so they block the command loop just like a
//! native browser dialog blocks the page.

use crate::app::UiEvent;
use crate::error::{Result, WidgetError};
use crate::render::RowControl;
use std::io::{BufRead, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use todo_widget_core::environment::Dialogs;

/// Text printed by the `help` command
pub const HELP: &str = "\
commands:
  type <text>     type into the todo input
  submit          submit the form
  add <text>      type and submit in one go
  remove <row>    click Remove on a row (rows start at 1)
  edit <row>      click Edit on a row
  done <row>      click Completed on a row
  clear           click Remove all
  search <query>  type into the search field
  color <value>   pick a background color
  dark            click Dark mode
  list            print the list
  show            print the page
  dump            print the todos as JSON
  help            print this text
  quit            exit";

/// A parsed terminal command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `type <text>`
    Type(String),
    /// `submit`
    Submit,
    /// `add <text>`
    Add(String),
    /// `remove <row>`, zero-based
    Remove(usize),
    /// `edit <row>`, zero-based
    Edit(usize),
    /// `done <row>`, zero-based
    Done(usize),
    /// `clear`
    Clear,
    /// `search <query>`, the query may be empty
    Search(String),
    /// `color <value>`
    Color(String),
    /// `dark`
    Dark,
    /// `list`
    List,
    /// `show`
    Show,
    /// `dump`
    Dump,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    /// Parses one input line
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Command`] for an unknown command, a missing
    /// argument or a bad row number.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match name {
            "type" => Self::Type(required(name, rest)?),
            "submit" => Self::Submit,
            "add" => Self::Add(required(name, rest)?),
            "remove" => Self::Remove(row(rest)?),
            "edit" => Self::Edit(row(rest)?),
            "done" => Self::Done(row(rest)?),
            "clear" => Self::Clear,
            "search" => Self::Search(rest.to_string()),
            "color" => Self::Color(required(name, rest)?),
            "dark" => Self::Dark,
            "list" => Self::List,
            "show" => Self::Show,
            "dump" => Self::Dump,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(WidgetError::Command(format!("unknown command `{other}`"))),
        };
        Ok(Some(command))
    }

    /// Events the command stands for
    ///
    /// Commands that only inspect the page map to no events.
    #[must_use]
    pub fn into_events(self) -> Vec<UiEvent> {
        let row_click = |row, control| UiEvent::RowClicked { row, control };
        match self {
            Self::Type(text) => vec![UiEvent::TypeText { text }],
            Self::Submit => vec![UiEvent::Submit],
            Self::Add(text) => vec![UiEvent::TypeText { text }, UiEvent::Submit],
            Self::Remove(row) => vec![row_click(row, RowControl::Remove)],
            Self::Edit(row) => vec![row_click(row, RowControl::Edit)],
            Self::Done(row) => vec![row_click(row, RowControl::Complete)],
            Self::Clear => vec![UiEvent::RemoveAllClicked],
            Self::Search(value) => vec![UiEvent::SearchInput { value }],
            Self::Color(value) => vec![UiEvent::ColorInput { value }],
            Self::Dark => vec![UiEvent::DarkModeClicked],
            Self::List | Self::Show | Self::Dump | Self::Help | Self::Quit => Vec::new(),
        }
    }
}

fn required(name: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(WidgetError::Command(format!("`{name}` needs an argument")));
    }
    Ok(rest.to_string())
}

fn row(rest: &str) -> Result<usize> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(WidgetError::Command(format!(
            "expected a row number starting at 1, got `{rest}`"
        ))),
    }
}

/// Dialogs and command input sharing one terminal
///
/// Prompts show the current value as a default; an empty answer keeps it and
/// end of input cancels. Confirmations accept `y` or `yes`.
pub struct TerminalDialogs {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalDialogs {
    /// Creates dialogs over arbitrary input and output
    #[must_use]
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Dialogs on the process's stdin and stdout
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            Box::new(std::io::BufReader::new(std::io::stdin())),
            Box::new(std::io::stdout()),
        )
    }

    /// Reads one line without its line ending, `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dialog`] if reading fails.
    pub fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = lock(&self.input).read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Writes `text` followed by a newline
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dialog`] if writing fails.
    pub fn write_line(&self, text: &str) -> Result<()> {
        let mut output = lock(&self.output);
        writeln!(output, "{text}")?;
        output.flush()?;
        Ok(())
    }

    /// Writes `text` without a newline, for prompts
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dialog`] if writing fails.
    pub fn write_prompt(&self, text: &str) -> Result<()> {
        let mut output = lock(&self.output);
        write!(output, "{text}")?;
        output.flush()?;
        Ok(())
    }

    fn ask(&self, question: &str) -> Option<String> {
        let answer = self
            .write_prompt(question)
            .and_then(|()| self.read_line());
        match answer {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Dialog failed, treating as cancelled");
                None
            }
        }
    }
}

impl Dialogs for TerminalDialogs {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        let answer = self.ask(&format!("{message} [{default}]: "))?;
        if answer.trim().is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]: "))
            .is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl std::fmt::Debug for TerminalDialogs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDialogs").finish_non_exhaustive()
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
