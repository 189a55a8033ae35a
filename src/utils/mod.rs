pub mod error;
pub mod logger;
pub mod monitor;
pub mod validation;

/// 逐行敘述：`say!(narrator, "fib({}) = {}", n, v)?`
#[macro_export]
macro_rules! say {
    ($narrator:expr) => {
        $narrator.line("")
    };
    ($narrator:expr, $($arg:tt)*) => {
        $narrator.line(&format!($($arg)*))
    };
}
