// Prompt Source Port
// Interactive input for credential creation, injectable for tests

use crate::error::Result;

/// Source of interactive answers
pub trait PromptSource: Send + Sync {
    /// Show an informational line to the user
    fn notify(&self, message: &str) -> Result<()>;

    /// Ask a question and return the raw answer (without line terminator)
    fn ask(&self, question: &str) -> Result<String>;

    /// Ask for a secret; implementations should not echo the answer
    fn ask_secret(&self, question: &str) -> Result<String> {
        self.ask(question)
    }
}

/// `Some(true)` for an answer starting with Y, `Some(false)` for N (any case).
/// Leading whitespace is not skipped.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('Y') => Some(true),
        Some('N') => Some(false),
        _ => None,
    }
}

/// Ask a Y/N question until the answer is valid
pub fn ask_yes_no(prompt: &dyn PromptSource, question: &str) -> Result<bool> {
    loop {
        if let Some(yes) = parse_yes_no(&prompt.ask(question)?) {
            return Ok(yes);
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers questions from a fixed script and records the conversation
    pub struct ScriptedPrompt {
        answers: Mutex<VecDeque<String>>,
        transcript: Mutex<Vec<String>>,
    }

    impl ScriptedPrompt {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
                transcript: Mutex::new(Vec::new()),
            }
        }

        /// Every notification and question seen so far, in order
        pub fn transcript(&self) -> Vec<String> {
            self.transcript.lock().unwrap().clone()
        }

        pub fn remaining(&self) -> usize {
            self.answers.lock().unwrap().len()
        }
    }

    impl PromptSource for ScriptedPrompt {
        fn notify(&self, message: &str) -> Result<()> {
            self.transcript.lock().unwrap().push(message.to_string());
            Ok(())
        }

        fn ask(&self, question: &str) -> Result<String> {
            self.transcript.lock().unwrap().push(question.to_string());
            self.answers.lock().unwrap().pop_front().ok_or_else(|| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "script exhausted",
                ))
            })
        }
    }
}
