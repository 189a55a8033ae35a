pub mod fibonacci;
pub mod stack_frames;
pub mod stack_hello;
pub mod stack_overflow;
pub mod stack_vs_queue;

use crate::config::toml_config::LessonsConfig;
use crate::core::{Lesson, LessonKind};

pub use fibonacci::FibonacciLesson;
pub use stack_frames::StackFramesLesson;
pub use stack_hello::StackHelloLesson;
pub use stack_overflow::StackOverflowLesson;
pub use stack_vs_queue::StackVsQueueLesson;

/// 依設定建立單一課程
pub fn build(kind: LessonKind, config: &LessonsConfig) -> Box<dyn Lesson> {
    match kind {
        LessonKind::Fibonacci => Box::new(FibonacciLesson::new(config.fibonacci.clone())),
        LessonKind::StackHello => Box::new(StackHelloLesson::new(config.stack.clone())),
        LessonKind::StackFrames => Box::new(StackFramesLesson),
        LessonKind::StackOverflow => Box::new(StackOverflowLesson::new(config.recursion.clone())),
        LessonKind::StackVsQueue => Box::new(StackVsQueueLesson::new(config.graph.clone())),
    }
}

/// Lessons in the given order; duplicates run twice.
pub fn select(kinds: &[LessonKind], config: &LessonsConfig) -> Vec<Box<dyn Lesson>> {
    kinds.iter().map(|kind| build(*kind, config)).collect()
}

/// Every lesson in catalogue order.
pub fn catalog(config: &LessonsConfig) -> Vec<Box<dyn Lesson>> {
    select(&LessonKind::ALL, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_follows_lesson_order() {
        let lessons = catalog(&LessonsConfig::default());
        let kinds: Vec<LessonKind> = lessons.iter().map(|lesson| lesson.kind()).collect();
        assert_eq!(kinds, LessonKind::ALL.to_vec());
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let lessons = select(
            &[LessonKind::StackVsQueue, LessonKind::Fibonacci],
            &LessonsConfig::default(),
        );
        assert_eq!(lessons[0].kind(), LessonKind::StackVsQueue);
        assert_eq!(lessons[1].title(), LessonKind::Fibonacci.title());
    }
}
