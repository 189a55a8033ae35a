use crate::core::{Lesson, LessonSummary, Narrator, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::LessonMonitor;
use std::time::Instant;

pub struct LessonRunner {
    lessons: Vec<Box<dyn Lesson>>,
    monitor: LessonMonitor,
}

impl LessonRunner {
    pub fn new(lessons: Vec<Box<dyn Lesson>>) -> Self {
        Self {
            lessons,
            monitor: LessonMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(lessons: Vec<Box<dyn Lesson>>, enable_monitoring: bool) -> Self {
        Self {
            lessons,
            monitor: LessonMonitor::new(enable_monitoring),
        }
    }

    /// 依序執行所有課程；任一課程失敗即中止
    pub async fn run(&self, narrator: &mut dyn Narrator) -> Result<RunReport> {
        tracing::info!("Starting {} lesson(s)", self.lessons.len());
        self.monitor.begin(self.lessons.len());

        let mut summaries = Vec::with_capacity(self.lessons.len());
        for (index, lesson) in self.lessons.iter().enumerate() {
            if index > 0 {
                narrator.line("")?;
            }

            let kind = lesson.kind();
            tracing::info!("▶ Running lesson '{}'", kind);
            let lines_before = narrator.lines_written();
            let start = Instant::now();

            let outcome = lesson.run(narrator).await.map_err(|e| {
                tracing::error!("❌ Lesson '{}' failed: {}", kind, e);
                e
            })?;

            let summary = LessonSummary {
                lesson: kind,
                title: lesson.title().to_string(),
                lines: narrator.lines_written() - lines_before,
                elapsed_micros: start.elapsed().as_micros(),
                benchmarks: outcome.benchmarks,
            };
            tracing::info!(
                "✅ Lesson '{}' finished: {} lines in {}µs",
                kind,
                summary.lines,
                summary.elapsed_micros
            );
            self.monitor.record_lesson(kind.name(), summary.lines, start.elapsed());
            summaries.push(summary);
        }

        self.monitor.finish();
        Ok(RunReport::new(summaries))
    }
}
