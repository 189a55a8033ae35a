use thiserror::Error;

#[derive(Error, Debug)]
pub enum LessonError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown lesson: {name}")]
    UnknownLesson { name: String },

    #[error("Unknown graph node: {node}")]
    UnknownNode { node: String },

    #[error("Arithmetic overflow in {operation} for n = {n}")]
    Overflow { operation: String, n: u64 },

    #[error("maximum recursion depth exceeded (limit {limit})")]
    RecursionLimit { limit: usize },

    #[error("Worker thread panicked: {message}")]
    ThreadPanicked { message: String },

    #[error("Task join error: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Computation,
    Io,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 計算錯誤
            ErrorSeverity::High => 1,     // 設定或檔案錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl LessonError {
    pub fn overflow(operation: &str, n: impl Into<u64>) -> Self {
        LessonError::Overflow {
            operation: operation.to_string(),
            n: n.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LessonError::TomlParseError(_)
            | LessonError::ConfigValidationError { .. }
            | LessonError::InvalidConfigValueError { .. }
            | LessonError::MissingConfigError { .. }
            | LessonError::UnknownLesson { .. }
            | LessonError::UnknownNode { .. } => ErrorCategory::Configuration,
            LessonError::Overflow { .. } | LessonError::RecursionLimit { .. } => {
                ErrorCategory::Computation
            }
            LessonError::IoError(_)
            | LessonError::SerializationError(_)
            | LessonError::CsvError(_) => ErrorCategory::Io,
            LessonError::ThreadPanicked { .. } | LessonError::TaskJoinError(_) => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Computation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Runtime => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            LessonError::UnknownLesson { name } => {
                format!("'{}' is not a lesson this tool knows about", name)
            }
            LessonError::UnknownNode { node } => {
                format!("Graph start node '{}' does not exist in the graph", node)
            }
            LessonError::Overflow { operation, n } => {
                format!("{} overflowed a 64-bit integer at n = {}", operation, n)
            }
            LessonError::RecursionLimit { limit } => {
                format!("Recursion stopped at the configured limit of {}", limit)
            }
            LessonError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LessonError::UnknownLesson { .. } => {
                "Run with --list to see the available lessons".to_string()
            }
            LessonError::UnknownNode { .. } => {
                "Set [graph].start to one of the nodes listed in [graph.edges]".to_string()
            }
            LessonError::Overflow { .. } => {
                "Use an index of 93 or lower; fib(94) no longer fits in u64".to_string()
            }
            LessonError::RecursionLimit { .. } => {
                "Raise [recursion].limit or rewrite the recursion as a loop".to_string()
            }
            LessonError::TomlParseError(_) => {
                "Check the TOML syntax of the configuration file".to_string()
            }
            LessonError::ConfigValidationError { .. }
            | LessonError::InvalidConfigValueError { .. }
            | LessonError::MissingConfigError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            LessonError::IoError(_) | LessonError::CsvError(_) => {
                "Check that the path exists and is writable".to_string()
            }
            LessonError::SerializationError(_) => "Report this as a bug".to_string(),
            LessonError::ThreadPanicked { .. } => {
                "The worker thread panicked; rerun with -v and report the message".to_string()
            }
            LessonError::TaskJoinError(_) => "Run the lesson again".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LessonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        let err = LessonError::UnknownLesson {
            name: "heap".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = LessonError::overflow("fib_iterative", 94u32);
        assert_eq!(err.category(), ErrorCategory::Computation);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("n = 94"));
        assert_eq!(err.severity().exit_code(), 2);
    }

    #[test]
    fn test_recovery_suggestion_mentions_list() {
        let err = LessonError::UnknownLesson {
            name: "heap".to_string(),
        };
        assert!(err.recovery_suggestion().contains("--list"));
        assert!(err.user_friendly_message().contains("heap"));
    }
}
