//! Environment struct (stdin/stdout/etc.)

use std::io::{self, Read, Stdin, Stdout};

/// Execution environment
pub struct Environment {
    pub stdin: Stdin,
    pub stdout: Stdout,
    pub stdin_isatty: bool,
    pub program_name: String,
}

impl Environment {
    pub fn init() -> Self {
        Self::default()
    }

    /// Read all of stdin, refusing when it is an interactive terminal
    pub fn read_stdin(&mut self) -> io::Result<Option<String>> {
        if self.stdin_isatty {
            return Ok(None);
        }
        let mut input = String::new();
        self.stdin.lock().read_to_string(&mut input)?;
        Ok(Some(input))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            stdin_isatty: atty::is(atty::Stream::Stdin),
            program_name: "apisnip".to_string(),
        }
    }
}
