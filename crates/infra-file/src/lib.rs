// mylib Infrastructure - File Adapter
// Implements: CredentialRepository as a JSON file

mod json_credential_file;
mod path;

pub use json_credential_file::JsonCredentialFile;
pub use path::expand_path;
