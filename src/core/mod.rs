pub mod brackets;
pub mod call_stack;
pub mod containers;
pub mod fibonacci;
pub mod graph;
pub mod recursion;
pub mod rpn;
pub mod runner;

pub use crate::domain::model::{BenchmarkRow, LessonKind, LessonOutcome, LessonSummary, RunReport};
pub use crate::domain::ports::{Lesson, Narrator};
pub use crate::utils::error::Result;
