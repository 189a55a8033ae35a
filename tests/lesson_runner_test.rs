use stack_lessons::adapters::report::{self, ReportFormat};
use stack_lessons::app::lessons;
use stack_lessons::{LessonKind, LessonRunner, LessonsConfig, RunReport, Transcript};
use tempfile::TempDir;

async fn run_into_transcript(kinds: &[LessonKind], config: &LessonsConfig) -> (RunReport, Transcript) {
    let runner = LessonRunner::new(lessons::select(kinds, config));
    let mut transcript = Transcript::new();
    let report = runner.run(&mut transcript).await.unwrap();
    (report, transcript)
}

#[tokio::test]
async fn test_full_catalog_narrates_every_lesson() {
    let config = LessonsConfig::default();
    let (report, transcript) = run_into_transcript(&LessonKind::ALL, &config).await;

    assert_eq!(report.lessons.len(), 5);
    assert_eq!(report.total_lines(), transcript.lines().len() - 4);
    for kind in LessonKind::ALL {
        assert!(transcript.contains(kind.title()), "missing banner for {}", kind);
    }
    assert!(transcript.contains("KEY RUST INSIGHTS:"));
}

#[tokio::test]
async fn test_fibonacci_lesson_output() {
    let (report, transcript) =
        run_into_transcript(&[LessonKind::Fibonacci], &LessonsConfig::default()).await;

    assert!(transcript.contains("→ fib(5) called"));
    assert!(transcript.contains("[BASE CASE]"));
    assert!(transcript.contains("fib(5) = 3 + 2 = 5"));
    assert!(transcript.contains("[CACHED]"));
    assert!(transcript.contains("Cache info: hits=4, misses=6, size=6"));
    assert!(transcript.contains("[0, 1, 1, 2, 3, 5, 8, 13, 21, 34]"));
    assert!(transcript.contains("fib(10) computed at compile time = 55"));

    let benchmarks = &report.lessons[0].benchmarks;
    assert_eq!(benchmarks.len(), 4);
    assert!(benchmarks.iter().all(|row| row.n == 20 && row.result == Some(6765)));
}

#[tokio::test]
async fn test_stack_lessons_output() {
    let mut config = LessonsConfig::default();
    config.stack.message = "abc".to_string();
    let (_, transcript) = run_into_transcript(
        &[LessonKind::StackHello, LessonKind::StackVsQueue],
        &config,
    )
    .await;

    assert!(transcript.contains("Reversed: cba"));
    assert!(transcript.contains("Pop order: E D C B A"));
    assert!(transcript.contains("Dequeue order: A B C D E"));
    assert!(transcript.contains("Consumer drained stack: [5, 4, 3, 2, 1]"));
    assert!(transcript.contains("queue size 40"));
    assert!(transcript.contains("Order: A → B → C → D → E → F"));
    assert!(transcript.contains("Order: A → B → D → E → C → F"));
    assert!(transcript.contains("Redo: Type ' World'"));
    assert!(transcript.contains("Stack underflow"));
    assert!(transcript.contains("Found closing ']' - matches with '['"));
    assert!(transcript.contains("✓ Expression is balanced!"));
    assert!(transcript.contains("Mismatched ')' at position 7, expected ']'"));
    assert!(transcript.contains("Unclosed '(' opened at position 2"));
    assert!(transcript.contains("1 of 3 examples balanced"));
    assert!(transcript.contains("3 job(s) waiting, 8 page(s) in total"));
    let printed: Vec<&str> = transcript
        .lines()
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("Printing #"))
        .collect();
    assert_eq!(
        printed,
        [
            "Printing #1 'Doc1' [DONE]",
            "Printing #2 'Doc2' [DONE]",
            "Printing #3 'Doc3' [DONE]"
        ]
    );
}

#[tokio::test]
async fn test_frames_and_overflow_lessons_output() {
    let mut config = LessonsConfig::default();
    config.recursion.limit = 300;
    config.recursion.deep_depth = 10_000;
    let (_, transcript) = run_into_transcript(
        &[LessonKind::StackFrames, LessonKind::StackOverflow],
        &config,
    )
    .await;

    assert!(transcript.contains("function_b(param1=\"hello\", param2=99"));
    assert!(transcript.contains("Back in the caller: call stack depth = 0"));
    assert!(transcript.contains("counter() = 11"));
    assert!(transcript.contains("maximum recursion depth exceeded (limit 300)"));
    assert!(transcript.contains("Reached depth: 1000"));
    assert!(transcript.contains("factorial(5) = 120"));
    assert!(transcript.contains("Result: 50005000 (expected 50005000)"));
    assert!(
        transcript.contains("Soft limit:") || transcript.contains("unavailable on this system")
    );
}

#[tokio::test]
async fn test_overflow_lesson_survives_depths_past_the_test_thread_stack() {
    // Each depth runs on its own sized thread, not on the 2 MiB test thread.
    let mut config = LessonsConfig::default();
    config.recursion.limit = 50_000;
    config.recursion.safe_depth = 50_000;
    config.recursion.controlled_depth = 5_000;
    config.recursion.deep_depth = 100_000;
    let (report, transcript) = run_into_transcript(&[LessonKind::StackOverflow], &config).await;

    assert_eq!(report.lessons.len(), 1);
    assert!(transcript.contains("maximum recursion depth exceeded (limit 50000)"));
    assert!(transcript.contains("Reached depth: 50000"));
    assert!(transcript.contains("Depth reached: 5000"));
}

#[tokio::test]
async fn test_reports_are_written() {
    let temp_dir = TempDir::new().unwrap();
    let (report, _) =
        run_into_transcript(&[LessonKind::Fibonacci, LessonKind::StackHello], &LessonsConfig::default())
            .await;

    let json_path = temp_dir.path().join("reports/run.json");
    report::write_report(&json_path, ReportFormat::Json, &report).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["lessons"][0]["lesson"], "fibonacci");
    assert_eq!(json["lessons"][1]["lesson"], "stack-hello");

    let csv_path = temp_dir.path().join("run.csv");
    report::write_report(&csv_path, ReportFormat::Csv, &report).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("lesson,strategy,n,result,elapsed_micros,calls,space")
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.starts_with("fibonacci,")));
    assert!(rows.iter().any(|row| row.starts_with("fibonacci,naive,20,6765,")));
}

#[tokio::test]
async fn test_monitored_run_reports_the_same_lines() {
    let config = LessonsConfig::default();
    let kinds = [LessonKind::StackHello, LessonKind::StackFrames];
    let runner = LessonRunner::new_with_monitoring(lessons::select(&kinds, &config), true);
    let mut transcript = Transcript::new();
    let report = runner.run(&mut transcript).await.unwrap();

    assert_eq!(report.lessons.len(), 2);
    assert_eq!(report.total_lines(), transcript.lines().len() - 1);
}
