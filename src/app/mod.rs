pub mod lessons;

use crate::adapters::narrator::ConsoleNarrator;
use crate::config::toml_config::LessonsConfig;
use crate::core::runner::LessonRunner;
use crate::core::{LessonKind, RunReport};
use crate::utils::error::Result;

/// 獨立腳本的進入點：以預設設定執行單一課程並輸出到 stdout
pub async fn run_single(kind: LessonKind) -> Result<RunReport> {
    let config = LessonsConfig::default();
    let runner = LessonRunner::new(lessons::select(&[kind], &config));
    let mut narrator = ConsoleNarrator::stdout();
    runner.run(&mut narrator).await
}
