use stack_lessons::utils::logger;
use stack_lessons::{app, LessonKind};

#[tokio::main]
async fn main() {
    logger::init_script_logger();

    if let Err(e) = app::run_single(LessonKind::StackHello).await {
        tracing::error!("❌ Lesson failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }
}
