// Console PromptSource implementation
// reason: rpassword for non-echoing password entry on a terminal

use std::io::{self, BufRead, BufReader, Write};
use std::sync::Mutex;

use mylib_core::error::{AppError, Result};
use mylib_core::port::PromptSource;

/// Line-oriented prompt over a reader/writer pair
pub struct ConsolePrompt {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
    /// Read secrets from the terminal without echo
    tty_secrets: bool,
}

impl ConsolePrompt {
    /// Prompt on stdin/stdout; passwords are read without echo
    pub fn stdio() -> Self {
        Self {
            input: Mutex::new(Box::new(BufReader::new(io::stdin()))),
            output: Mutex::new(Box::new(io::stdout())),
            tty_secrets: true,
        }
    }

    /// Prompt on arbitrary streams; secrets are read like any other answer
    pub fn with_io(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
            tty_secrets: false,
        }
    }

    fn write_out(&self, text: &str, newline: bool) -> Result<()> {
        let mut out = self.output.lock().map_err(|_| poisoned())?;
        if newline {
            writeln!(out, "{}", text)?;
        } else {
            write!(out, "{}", text)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn poisoned() -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::Other, "console lock poisoned"))
}

impl PromptSource for ConsolePrompt {
    fn notify(&self, message: &str) -> Result<()> {
        self.write_out(message, true)
    }

    fn ask(&self, question: &str) -> Result<String> {
        self.write_out(question, false)?;

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .map_err(|_| poisoned())?
            .read_line(&mut line)?;
        if read == 0 {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input while waiting for an answer",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&self, question: &str) -> Result<String> {
        if self.tty_secrets {
            return Ok(rpassword::prompt_password(question)?);
        }
        self.ask(question)
    }
}
