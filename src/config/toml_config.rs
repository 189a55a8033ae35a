use crate::adapters::report::ReportFormat;
use crate::core::fibonacci::MAX_FIB_INDEX;
use crate::core::graph::Graph;
use crate::core::recursion::{self, SUM_FRAME_BYTES};
use crate::utils::error::{LessonError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 課程設定；所有區段皆可省略，省略時使用獨立腳本的預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonsConfig {
    pub fibonacci: FibonacciConfig,
    pub stack: StackConfig,
    pub recursion: RecursionConfig,
    pub graph: GraphConfig,
    pub monitoring: MonitoringConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    /// n for the traced naive/iterative/memoized runs
    pub trace_n: u32,
    pub benchmark_n: u32,
    /// naive recursion is skipped in the benchmark above this n
    pub naive_limit: u32,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            trace_n: 5,
            benchmark_n: 20,
            naive_limit: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub message: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            message: "Hello World!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecursionConfig {
    pub limit: usize,
    pub safe_depth: usize,
    pub controlled_depth: usize,
    pub deep_depth: u64,
    pub thread_stack_kib: usize,
}

impl Default for RecursionConfig {
    fn default() -> Self {
        Self {
            limit: 1000,
            safe_depth: 1000,
            controlled_depth: 200,
            deep_depth: 100_000,
            thread_stack_kib: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub start: String,
    pub edges: BTreeMap<String, Vec<String>>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        let mut edges = BTreeMap::new();
        edges.insert("A".to_string(), vec!["B".to_string(), "C".to_string()]);
        edges.insert("B".to_string(), vec!["D".to_string(), "E".to_string()]);
        edges.insert("C".to_string(), vec!["F".to_string()]);
        Self {
            start: "A".to_string(),
            edges,
        }
    }
}

impl GraphConfig {
    pub fn build(&self) -> Graph {
        Graph::from_edges(
            self.edges
                .iter()
                .map(|(node, neighbours)| (node.clone(), neighbours.clone())),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub enabled: bool,
    pub path: Option<String>,
    pub format: ReportFormat,
}

impl LessonsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${LESSON_MESSAGE})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LessonError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("fibonacci.trace_n", self.fibonacci.trace_n, 0, 12)?;
        validation::validate_range(
            "fibonacci.benchmark_n",
            self.fibonacci.benchmark_n,
            0,
            MAX_FIB_INDEX,
        )?;
        validation::validate_range("fibonacci.naive_limit", self.fibonacci.naive_limit, 0, 35)?;

        validation::validate_non_empty_string("stack.message", &self.stack.message)?;

        self.recursion.validate()?;

        let graph = self.graph.build();
        if graph.is_empty() {
            return Err(LessonError::ConfigValidationError {
                field: "graph.edges".to_string(),
                message: "Graph needs at least one edge".to_string(),
            });
        }
        if !graph.contains(&self.graph.start) {
            return Err(LessonError::UnknownNode {
                node: self.graph.start.clone(),
            });
        }

        if self.report.enabled {
            let path = validation::validate_required_field("report.path", &self.report.path)?;
            validation::validate_path("report.path", path)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl RecursionConfig {
    pub const MAX_GUARDED_DEPTH: usize = 100_000;
    pub const MAX_CONTROLLED_DEPTH: usize = 10_000;
    pub const MAX_DEEP_DEPTH: u64 = 1_000_000;
    pub const MAX_THREAD_STACK_KIB: usize = 1024 * 1024;

    pub fn thread_stack_bytes(&self) -> usize {
        self.thread_stack_kib.saturating_mul(1024)
    }

    /// Stack `sum_recursive(deep_depth)` needs on the worker thread.
    pub fn deep_stack_bytes_needed(&self) -> usize {
        let depth = usize::try_from(self.deep_depth).unwrap_or(usize::MAX);
        recursion::stack_bytes_for(depth, SUM_FRAME_BYTES)
    }
}

impl Validate for RecursionConfig {
    /// 每個遞迴深度都必須放得進為它配置的堆疊；真正的堆疊溢位會直接中止程序
    fn validate(&self) -> Result<()> {
        validation::validate_range("recursion.limit", self.limit, 1, Self::MAX_GUARDED_DEPTH)?;
        validation::validate_range(
            "recursion.safe_depth",
            self.safe_depth,
            1,
            Self::MAX_GUARDED_DEPTH,
        )?;
        validation::validate_range(
            "recursion.controlled_depth",
            self.controlled_depth,
            1,
            Self::MAX_CONTROLLED_DEPTH,
        )?;
        validation::validate_range("recursion.deep_depth", self.deep_depth, 1, Self::MAX_DEEP_DEPTH)?;
        validation::validate_range(
            "recursion.thread_stack_kib",
            self.thread_stack_kib,
            64,
            Self::MAX_THREAD_STACK_KIB,
        )?;

        let needed = self.deep_stack_bytes_needed();
        if needed > self.thread_stack_bytes() {
            return Err(LessonError::ConfigValidationError {
                field: "recursion.thread_stack_kib".to_string(),
                message: format!(
                    "deep_depth {} needs about {} KiB of stack but thread_stack_kib is {}",
                    self.deep_depth,
                    needed.div_ceil(1024),
                    self.thread_stack_kib
                ),
            });
        }
        Ok(())
    }
}

impl Validate for LessonsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = LessonsConfig::from_toml_str("").unwrap();
        assert_eq!(config.fibonacci.trace_n, 5);
        assert_eq!(config.fibonacci.benchmark_n, 20);
        assert_eq!(config.stack.message, "Hello World!");
        assert_eq!(config.graph.start, "A");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[fibonacci]
trace_n = 3

[graph]
start = "root"

[graph.edges]
root = ["left", "right"]
left = ["leaf"]
"#;

        let config = LessonsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.fibonacci.trace_n, 3);
        assert_eq!(config.fibonacci.benchmark_n, 20);
        assert_eq!(config.graph.build().len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STACK_LESSONS_TEST_MESSAGE", "Bury me");

        let toml_content = r#"
[stack]
message = "${STACK_LESSONS_TEST_MESSAGE}"
"#;

        let config = LessonsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.stack.message, "Bury me");

        std::env::remove_var("STACK_LESSONS_TEST_MESSAGE");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let config =
            LessonsConfig::from_toml_str("[stack]\nmessage = \"${STACK_LESSONS_UNSET_VAR}\"\n")
                .unwrap();
        assert_eq!(config.stack.message, "${STACK_LESSONS_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let config = LessonsConfig::from_toml_str("[fibonacci]\nbenchmark_n = 94\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(LessonError::InvalidConfigValueError { field, .. }) if field == "fibonacci.benchmark_n"
        ));

        let config = LessonsConfig::from_toml_str("[graph]\nstart = \"Z\"\n").unwrap();
        assert!(matches!(config.validate(), Err(LessonError::UnknownNode { .. })));

        let config = LessonsConfig::from_toml_str("[report]\nenabled = true\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(LessonError::MissingConfigError { .. })
        ));
    }

    fn recursion_error_field(toml_content: &str) -> String {
        let config = LessonsConfig::from_toml_str(toml_content).unwrap();
        match config.validate() {
            Err(LessonError::InvalidConfigValueError { field, .. })
            | Err(LessonError::ConfigValidationError { field, .. }) => field,
            other => panic!("expected a recursion validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_recursion_depths_are_bounded() {
        assert_eq!(
            recursion_error_field("[recursion]\nlimit = 5000000\n"),
            "recursion.limit"
        );
        assert_eq!(
            recursion_error_field("[recursion]\nsafe_depth = 100001\n"),
            "recursion.safe_depth"
        );
        assert_eq!(
            recursion_error_field("[recursion]\ncontrolled_depth = 10001\n"),
            "recursion.controlled_depth"
        );
        assert_eq!(
            recursion_error_field("[recursion]\ndeep_depth = 1000001\n"),
            "recursion.deep_depth"
        );
        assert_eq!(
            recursion_error_field("[recursion]\nthread_stack_kib = 32\n"),
            "recursion.thread_stack_kib"
        );
        assert_eq!(
            recursion_error_field("[recursion]\nthread_stack_kib = 2000000\n"),
            "recursion.thread_stack_kib"
        );

        let config = LessonsConfig::from_toml_str(
            "[recursion]\nlimit = 100000\nsafe_depth = 100000\ncontrolled_depth = 10000\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deep_depth_must_fit_thread_stack() {
        let config =
            LessonsConfig::from_toml_str("[recursion]\ndeep_depth = 1000000\nthread_stack_kib = 64\n")
                .unwrap();
        assert!(matches!(
            config.validate(),
            Err(LessonError::ConfigValidationError { field, message })
                if field == "recursion.thread_stack_kib" && message.contains("deep_depth 1000000")
        ));

        // 預設值本身必須通過
        let defaults = RecursionConfig::default();
        assert!(defaults.deep_stack_bytes_needed() <= defaults.thread_stack_bytes());

        let config = LessonsConfig::from_toml_str(
            "[recursion]\ndeep_depth = 1000000\nthread_stack_kib = 262144\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let err = LessonsConfig::from_toml_str("[fibonacci\ntrace_n = 3").unwrap_err();
        assert!(matches!(err, LessonError::TomlParseError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[recursion]\nlimit = 50\n")
            .unwrap();

        let config = LessonsConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.recursion.limit, 50);
        assert_eq!(config.recursion.safe_depth, 1000);
    }
}
