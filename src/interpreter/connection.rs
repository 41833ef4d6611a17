use std::{
    collections::VecDeque,
    io::{self, Write},
};

use crate::interpreter::value::Value;

/// A text connection the IO builtins read from and write to.
///
/// Implementations report failures as plain messages; the evaluator turns
/// them into runtime errors carrying the call's line.
pub trait Connection {
    /// Reads up to `n` lines; a negative `n` reads everything left.
    fn read_lines(&mut self, n: i64) -> Result<Vec<String>, String>;
    /// Writes each value followed by `sep`.
    fn write_lines(&mut self, lines: &[String], sep: &str) -> Result<(), String>;
    /// Flushes buffered output.
    fn flush(&mut self) -> Result<(), String>;
    /// Closes the connection; later operations fail.
    fn close(&mut self) -> Result<(), String>;
    /// Human-readable description used by `print`.
    fn description(&self) -> &str;
}

/// The process standard output.
#[derive(Debug, Default)]
pub struct StdoutConnection;

impl Connection for StdoutConnection {
    fn read_lines(&mut self, _n: i64) -> Result<Vec<String>, String> {
        Err("cannot read from this connection".to_string())
    }

    fn write_lines(&mut self, lines: &[String], sep: &str) -> Result<(), String> {
        let mut out = io::stdout().lock();
        for line in lines {
            write!(out, "{line}{sep}").map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), String> {
        io::stdout().flush().map_err(|e| e.to_string())
    }

    fn close(&mut self) -> Result<(), String> {
        Err("cannot close standard connections".to_string())
    }

    fn description(&self) -> &str {
        "stdout"
    }
}

/// An in-memory connection.
///
/// Reads consume the input lines it was created with; writes accumulate in
/// an output buffer split into lines on `\n`.
#[derive(Debug, Default)]
pub struct TextConnection {
    input:   VecDeque<String>,
    output:  Vec<String>,
    partial: String,
    open:    bool,
}

impl TextConnection {
    /// Creates an open connection reading `input`.
    ///
    /// # Example
    /// ```
    /// use statcore::interpreter::connection::{Connection, TextConnection};
    ///
    /// let mut con = TextConnection::new(vec!["a".into(), "b".into(), "c".into()]);
    /// assert_eq!(con.read_lines(2).unwrap(), vec!["a", "b"]);
    /// assert_eq!(con.read_lines(-1).unwrap(), vec!["c"]);
    /// ```
    #[must_use]
    pub fn new(input: Vec<String>) -> Self {
        Self { input:   input.into(),
               output:  Vec::new(),
               partial: String::new(),
               open:    true, }
    }

    /// Complete lines written so far, plus any unterminated tail.
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        let mut lines = self.output.clone();
        if !self.partial.is_empty() {
            lines.push(self.partial.clone());
        }
        lines
    }

    fn check_open(&self) -> Result<(), String> {
        if self.open { Ok(()) } else { Err("invalid connection".to_string()) }
    }
}

impl Connection for TextConnection {
    fn read_lines(&mut self, n: i64) -> Result<Vec<String>, String> {
        self.check_open()?;
        let count = usize::try_from(n).map_or(self.input.len(), |n| n.min(self.input.len()));
        Ok(self.input.drain(..count).collect())
    }

    fn write_lines(&mut self, lines: &[String], sep: &str) -> Result<(), String> {
        self.check_open()?;
        for line in lines {
            self.partial.push_str(line);
            self.partial.push_str(sep);
        }
        while let Some(pos) = self.partial.find('\n') {
            let rest = self.partial.split_off(pos + 1);
            let mut done = std::mem::replace(&mut self.partial, rest);
            done.pop();
            self.output.push(done);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), String> {
        self.check_open()
    }

    fn close(&mut self) -> Result<(), String> {
        self.check_open()?;
        self.open = false;
        Ok(())
    }

    fn description(&self) -> &str {
        "textConnection"
    }
}

/// Dispatch target of `.Call`.
///
/// The core never links native code itself; an embedder registers an
/// implementation on the `Context` and `.Call("symbol", ...)` forwards the
/// evaluated arguments to it.
pub trait NativeCall {
    /// Invokes `symbol` with the given arguments.
    fn invoke(&self, symbol: &str, args: &[Value]) -> Result<Value, String>;
}
