pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::narrator::{ConsoleNarrator, Transcript};
pub use adapters::report::ReportFormat;
pub use config::toml_config::LessonsConfig;
pub use crate::core::runner::LessonRunner;
pub use crate::core::{Lesson, LessonKind, Narrator, RunReport};
pub use utils::error::{LessonError, Result};
