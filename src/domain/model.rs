use crate::utils::error::LessonError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum LessonKind {
    Fibonacci,
    StackHello,
    StackFrames,
    StackOverflow,
    StackVsQueue,
}

impl LessonKind {
    /// 目錄順序
    pub const ALL: [LessonKind; 5] = [
        LessonKind::Fibonacci,
        LessonKind::StackHello,
        LessonKind::StackFrames,
        LessonKind::StackOverflow,
        LessonKind::StackVsQueue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LessonKind::Fibonacci => "fibonacci",
            LessonKind::StackHello => "stack-hello",
            LessonKind::StackFrames => "stack-frames",
            LessonKind::StackOverflow => "stack-overflow",
            LessonKind::StackVsQueue => "stack-vs-queue",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LessonKind::Fibonacci => "Fibonacci - Multiple Approaches & Optimization",
            LessonKind::StackHello => "Stack Hello World - Bury and Unbury",
            LessonKind::StackFrames => "Stack Frames - Call Stack Introspection",
            LessonKind::StackOverflow => "Stack Safety & Recursion Protection",
            LessonKind::StackVsQueue => "Stack vs Queue - LIFO and FIFO",
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LessonKind {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        LessonKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| LessonError::UnknownLesson {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub strategy: String,
    pub n: u32,
    pub result: Option<u64>,
    pub elapsed_micros: u128,
    pub calls: Option<u64>,
    pub space: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSummary {
    pub lesson: LessonKind,
    pub title: String,
    pub lines: usize,
    pub elapsed_micros: u128,
    pub benchmarks: Vec<BenchmarkRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub lessons: Vec<LessonSummary>,
}

impl RunReport {
    pub fn new(lessons: Vec<LessonSummary>) -> Self {
        Self {
            generated_at: Utc::now(),
            lessons,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.lessons.iter().map(|l| l.lines).sum()
    }
}

/// 一次課程執行的產出 (敘述行數由 runner 計算)
#[derive(Debug, Clone, Default)]
pub struct LessonOutcome {
    pub benchmarks: Vec<BenchmarkRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_kind_round_trip_names() {
        for kind in LessonKind::ALL {
            assert_eq!(kind.name().parse::<LessonKind>().unwrap(), kind);
        }
        assert_eq!(
            "stack_vs_queue".parse::<LessonKind>().unwrap(),
            LessonKind::StackVsQueue
        );
    }

    #[test]
    fn test_unknown_lesson_name() {
        let err = "heap-sort".parse::<LessonKind>().unwrap_err();
        assert!(matches!(err, LessonError::UnknownLesson { name } if name == "heap-sort"));
    }
}
