//! Sources of placeholder values.

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::{TemplateError, TemplateResult};

/// Supplies one value per placeholder name.
///
/// Returning an empty string means "no value"; the resolver then keeps the
/// `<name>` text.
pub trait ValueSource: Send {
    fn value_for(&mut self, placeholder: &str) -> TemplateResult<String>;
}

/// Interactive source: prompts on a writer and reads one line per placeholder.
pub struct StdinValueSource<R = BufReader<Stdin>, W = Stdout> {
    reader: R,
    writer: W,
}

impl StdinValueSource {
    /// Prompt on stdout, read from stdin.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> StdinValueSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead + Send, W: Write + Send> ValueSource for StdinValueSource<R, W> {
    fn value_for(&mut self, placeholder: &str) -> TemplateResult<String> {
        let input_err = |e: io::Error| TemplateError::Input {
            placeholder: placeholder.to_string(),
            message: e.to_string(),
        };

        write!(self.writer, "Enter value for {}: ", placeholder).map_err(input_err)?;
        self.writer.flush().map_err(input_err)?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(input_err)?;
        Ok(line.trim().to_string())
    }
}

/// Non-interactive source backed by a map. Unknown names yield no value.
#[derive(Debug, Clone, Default)]
pub struct MapValueSource {
    values: HashMap<String, String>,
}

impl MapValueSource {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// A source that never supplies a value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(placeholder.into(), value.into());
        self
    }
}

impl ValueSource for MapValueSource {
    fn value_for(&mut self, placeholder: &str) -> TemplateResult<String> {
        Ok(self.values.get(placeholder).cloned().unwrap_or_default())
    }
}

/// Answers in a fixed order, recording every prompt. Meant for tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedValueSource {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedValueSource {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Placeholder names asked for, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl ValueSource for ScriptedValueSource {
    fn value_for(&mut self, placeholder: &str) -> TemplateResult<String> {
        self.prompts.push(placeholder.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
