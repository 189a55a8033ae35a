pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::LessonsConfig;
    use crate::adapters::report::ReportFormat;
    use crate::core::LessonKind;
    use crate::utils::error::Result;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "stack-lessons")]
    #[command(about = "Narrated lessons on recursion, call stacks, stacks and queues")]
    pub struct CliConfig {
        /// Lessons to run, in order (all lessons when omitted)
        #[arg(value_enum)]
        pub lessons: Vec<LessonKind>,

        /// List available lessons and exit
        #[arg(long)]
        pub list: bool,

        /// Path to TOML lesson configuration
        #[arg(short, long)]
        pub config: Option<String>,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,

        /// Emit logs as JSON
        #[arg(long)]
        pub log_json: bool,

        /// Log system stats after every lesson
        #[arg(long)]
        pub monitor: bool,

        /// Write a run report to this path
        #[arg(long)]
        pub report: Option<String>,

        /// Report format
        #[arg(long, value_enum)]
        pub format: Option<ReportFormat>,

        /// Override fibonacci.trace_n
        #[arg(long)]
        pub fib_n: Option<u32>,

        /// Override fibonacci.benchmark_n
        #[arg(long)]
        pub benchmark_n: Option<u32>,

        /// Show what would run without running it
        #[arg(long)]
        pub dry_run: bool,
    }

    impl CliConfig {
        /// 載入 TOML (若有) 並套用命令列覆蓋設定
        pub fn resolve(&self) -> Result<LessonsConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path);
                    LessonsConfig::from_file(path)?
                }
                None => LessonsConfig::default(),
            };

            if let Some(n) = self.fib_n {
                config.fibonacci.trace_n = n;
                tracing::info!("🔧 fibonacci.trace_n overridden to: {}", n);
            }
            if let Some(n) = self.benchmark_n {
                config.fibonacci.benchmark_n = n;
                tracing::info!("🔧 fibonacci.benchmark_n overridden to: {}", n);
            }
            if self.monitor {
                config.monitoring.enabled = true;
            }
            if let Some(path) = &self.report {
                config.report.enabled = true;
                config.report.path = Some(path.clone());
            }
            if let Some(format) = self.format {
                config.report.format = format;
            }

            Ok(config)
        }

        pub fn selected_lessons(&self) -> Vec<LessonKind> {
            if self.lessons.is_empty() {
                LessonKind::ALL.to_vec()
            } else {
                self.lessons.clone()
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults_select_all_lessons() {
            let cli = CliConfig::parse_from(["stack-lessons"]);
            assert_eq!(cli.selected_lessons(), LessonKind::ALL.to_vec());
            let config = cli.resolve().unwrap();
            assert_eq!(config.fibonacci.trace_n, 5);
            assert!(!config.report.enabled);
        }

        #[test]
        fn test_overrides_apply() {
            let cli = CliConfig::parse_from([
                "stack-lessons",
                "stack-vs-queue",
                "fibonacci",
                "--fib-n",
                "7",
                "--report",
                "out/report.csv",
                "--format",
                "csv",
            ]);
            assert_eq!(
                cli.selected_lessons(),
                vec![LessonKind::StackVsQueue, LessonKind::Fibonacci]
            );

            let config = cli.resolve().unwrap();
            assert_eq!(config.fibonacci.trace_n, 7);
            assert!(config.report.enabled);
            assert_eq!(config.report.path.as_deref(), Some("out/report.csv"));
            assert_eq!(config.report.format, ReportFormat::Csv);
        }

        #[test]
        fn test_unknown_lesson_is_rejected() {
            assert!(CliConfig::try_parse_from(["stack-lessons", "heap-sort"]).is_err());
        }
    }
}
