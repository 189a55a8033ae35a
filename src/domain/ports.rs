use crate::domain::model::{LessonKind, LessonOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 敘述輸出的去處 (終端機或記憶體)
pub trait Narrator: Send {
    fn line(&mut self, text: &str) -> Result<()>;

    fn lines_written(&self) -> usize;

    fn rule(&mut self) -> Result<()> {
        self.line(&"=".repeat(60))
    }

    fn section(&mut self, title: &str) -> Result<()> {
        self.line("")?;
        self.rule()?;
        self.line(title)?;
        self.rule()
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        self.line("╔═══════════════════════════════════════════════════════════╗")?;
        self.line(&format!("║ {:^57} ║", title))?;
        self.line("╚═══════════════════════════════════════════════════════════╝")
    }

    fn insights(&mut self, heading: &str, points: &[&str]) -> Result<()> {
        self.section(heading)?;
        for point in points {
            self.line(&format!("• {}", point))?;
        }
        self.rule()
    }
}

#[async_trait]
pub trait Lesson: Send + Sync {
    fn kind(&self) -> LessonKind;

    fn title(&self) -> &'static str {
        self.kind().title()
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome>;
}
