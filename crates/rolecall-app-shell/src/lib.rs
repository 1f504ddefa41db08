//! Headless shell that drives a Rolecall composition.
//!
//! The shell owns the composition, tracks focus and dispatches the input a
//! user would produce: clicks, keystrokes, Enter and form submission. Every
//! interaction settles recomposition before it returns.

mod error;
mod settings;
mod shell;

pub use error::ShellError;
pub use settings::ShellSettings;
pub use shell::AppShell;
