// mylib Infrastructure - System Adapters
// Implements: PromptSource (console), Reporter (console, mail)

pub mod console_prompt;
pub mod console_reporter;
pub mod mail_reporter;
pub mod reporter_factory;

pub use console_prompt::ConsolePrompt;
pub use console_reporter::ConsoleReporter;
pub use mail_reporter::MailReporter;
pub use reporter_factory::{build_reporter, default_mail_recipient, resolve_recipients};
