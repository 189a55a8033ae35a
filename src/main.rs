use clap::Parser;
use stack_lessons::adapters::report;
use stack_lessons::app::lessons;
use stack_lessons::config::toml_config::LessonsConfig;
use stack_lessons::utils::{logger, validation::Validate};
use stack_lessons::{CliConfig, ConsoleNarrator, LessonError, LessonKind, LessonRunner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting stack-lessons CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if cli.list {
        print_catalog();
        return Ok(());
    }

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");

    let selected = cli.selected_lessons();
    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No lesson will be run");
        display_config_summary(&config, &selected);
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let runner = LessonRunner::new_with_monitoring(lessons::select(&selected, &config), monitor_enabled);
    let mut narrator = ConsoleNarrator::stdout();

    let outcome = match runner.run(&mut narrator).await {
        Ok(run_report) => write_report_if_enabled(&config, &run_report).map(|()| run_report),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(run_report) => {
            tracing::info!(
                "✅ {} lesson(s) completed, {} lines narrated",
                run_report.lessons.len(),
                run_report.total_lines()
            );
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn write_report_if_enabled(
    config: &LessonsConfig,
    run_report: &stack_lessons::RunReport,
) -> stack_lessons::Result<()> {
    if !config.report.enabled {
        return Ok(());
    }
    let path = config
        .report
        .path
        .as_deref()
        .ok_or_else(|| LessonError::MissingConfigError {
            field: "report.path".to_string(),
        })?;
    report::write_report(path, config.report.format, run_report)?;
    tracing::info!("📁 Report saved to: {}", path);
    Ok(())
}

fn exit_with(e: LessonError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Lesson run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = e.severity().exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

fn print_catalog() {
    println!("📚 Available lessons:");
    for kind in LessonKind::ALL {
        println!("  {:<16} {}", kind.name(), kind.title());
    }
}

fn display_config_summary(config: &LessonsConfig, selected: &[LessonKind]) {
    println!("📋 Configuration Summary:");
    println!(
        "  Lessons: {}",
        selected
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Fibonacci: trace n={}, benchmark n={}, naive limit={}",
        config.fibonacci.trace_n, config.fibonacci.benchmark_n, config.fibonacci.naive_limit
    );
    println!("  Stack message: {:?}", config.stack.message);
    println!(
        "  Recursion: limit={}, deep depth={} on a {} KiB stack",
        config.recursion.limit, config.recursion.deep_depth, config.recursion.thread_stack_kib
    );
    println!(
        "  Graph: start={}, {} node(s)",
        config.graph.start,
        config.graph.build().len()
    );
    println!("  Monitoring: {}", config.monitoring_enabled());
    match (&config.report.path, config.report.enabled) {
        (Some(path), true) => println!("  Report: {} ({:?})", path, config.report.format),
        _ => println!("  Report: disabled"),
    }
    println!("  🔍 DRY RUN MODE ENABLED");
    println!();
}
