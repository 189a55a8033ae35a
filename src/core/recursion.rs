//! Recursion depth, stack usage and ways around deep recursion.
//!
//! A real stack overflow aborts the process and cannot be caught, so every
//! deep recursion here is bounded by an explicit [`RecursionLimit`] and runs on
//! a thread whose stack is sized from that bound with [`stack_bytes_for`].

use crate::utils::error::{LessonError, Result};
use std::fmt;
use std::hint::black_box;
use std::thread;

/// Upper estimate of one frame of the guarded helpers in an unoptimised build.
pub const FRAME_ESTIMATE_BYTES: usize = 1024;

/// Upper estimate of one `sum_recursive` frame in an unoptimised build.
pub const SUM_FRAME_BYTES: usize = 256;

/// Stack reserved on top of the recursion itself for thread setup and logging.
pub const STACK_HEADROOM_BYTES: usize = 256 * 1024;

/// Stack a thread needs to recurse `depth` levels of `frame_bytes` each.
pub fn stack_bytes_for(depth: usize, frame_bytes: usize) -> usize {
    depth
        .saturating_mul(frame_bytes)
        .saturating_add(STACK_HEADROOM_BYTES)
}

/// Explicit recursion depth guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionLimit {
    limit: usize,
}

impl RecursionLimit {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn check(&self, depth: usize) -> Result<()> {
        if depth >= self.limit {
            Err(LessonError::RecursionLimit { limit: self.limit })
        } else {
            Ok(())
        }
    }
}

/// Recursion with no base case; only the guard stops it. Reports progress
/// every 100 levels through `on_depth`.
pub fn unbounded_descent(guard: RecursionLimit, on_depth: &mut dyn FnMut(usize)) -> Result<usize> {
    fn descend(depth: usize, guard: RecursionLimit, on_depth: &mut dyn FnMut(usize)) -> Result<usize> {
        guard.check(depth)?;
        if depth % 100 == 0 {
            on_depth(depth);
        }
        descend(depth + 1, guard, on_depth)
    }

    descend(0, guard, on_depth)
}

/// Recurses until `limit`. Returns (depth reached, total calls).
pub fn safe_deep_recursion(limit: usize) -> (usize, usize) {
    fn recursive_count(depth: usize, limit: usize, calls: &mut usize) -> usize {
        *calls += 1;
        if depth >= limit {
            return depth;
        }
        recursive_count(depth + 1, limit, calls)
    }

    let mut calls = 0;
    let reached = recursive_count(0, limit, &mut calls);
    (reached, calls)
}

/// Result of walking down the stack with a 1 KiB buffer per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackSpan {
    pub depth: usize,
    pub first_frame: usize,
    pub last_frame: usize,
}

impl StackSpan {
    pub fn bytes_spanned(&self) -> usize {
        self.first_frame.abs_diff(self.last_frame)
    }

    pub fn bytes_per_frame(&self) -> usize {
        if self.depth <= 1 {
            0
        } else {
            self.bytes_spanned() / (self.depth - 1)
        }
    }
}

pub const BUFFER_FRAME_BYTES: usize = 1024;

/// Upper estimate of one `controlled_recursion` frame: the buffer plus the
/// frame's own bookkeeping.
pub const BUFFERED_FRAME_ESTIMATE_BYTES: usize = BUFFER_FRAME_BYTES + FRAME_ESTIMATE_BYTES;

/// Recurses to `limit` with a 1 KiB buffer in every frame.
pub fn controlled_recursion(limit: usize) -> StackSpan {
    #[inline(never)]
    fn step(depth: usize, limit: usize, span: &mut StackSpan) -> usize {
        let buffer = [b'A'; BUFFER_FRAME_BYTES];
        let addr = black_box(&buffer) as *const [u8; BUFFER_FRAME_BYTES] as usize;
        if depth == 1 {
            span.first_frame = addr;
        }
        span.last_frame = addr;
        span.depth = depth;

        if depth >= limit {
            return depth;
        }
        let reached = step(depth + 1, limit, span);
        // 讓 buffer 在遞迴呼叫後仍然存活
        black_box(&buffer);
        reached
    }

    let mut span = StackSpan {
        depth: 0,
        first_frame: 0,
        last_frame: 0,
    };
    if limit > 0 {
        step(1, limit, &mut span);
    }
    span
}

/// Tail-recursive factorial. Rust does not guarantee tail-call elimination,
/// so this still uses one frame per step.
pub fn factorial_tail(n: u32, acc: u128) -> Result<u128> {
    if n <= 1 {
        return Ok(acc);
    }
    let acc = acc
        .checked_mul(u128::from(n))
        .ok_or_else(|| LessonError::overflow("factorial_tail", n))?;
    factorial_tail(n - 1, acc)
}

pub fn sum_recursive(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    n + sum_recursive(n - 1)
}

pub fn sum_iterative(n: u64) -> u64 {
    let mut total = 0;
    for i in 1..=n {
        total += i;
    }
    total
}

pub fn sum_idiomatic(n: u64) -> u64 {
    (1..=n).sum()
}

/// A computation that is either finished or needs one more step.
pub enum Bounce<T> {
    Done(T),
    More(Box<dyn FnOnce() -> Bounce<T>>),
}

/// Runs bounced computations in a loop, so the stack never grows.
pub fn trampoline<T>(mut bounce: Bounce<T>) -> T {
    loop {
        match bounce {
            Bounce::Done(value) => return value,
            Bounce::More(next) => bounce = next(),
        }
    }
}

pub fn factorial_trampoline(n: u32, acc: u128) -> Bounce<Result<u128>> {
    if n <= 1 {
        return Bounce::Done(Ok(acc));
    }
    match acc.checked_mul(u128::from(n)) {
        Some(acc) => Bounce::More(Box::new(move || factorial_trampoline(n - 1, acc))),
        None => Bounce::Done(Err(LessonError::overflow("factorial_trampoline", n))),
    }
}

/// Runs `f` on a dedicated thread with a stack of `stack_bytes`.
pub fn run_with_stack_size<T, F>(stack_bytes: usize, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tracing::debug!("Spawning worker thread with {} KiB stack", stack_bytes / 1024);
    let handle = thread::Builder::new()
        .name("deep-recursion".to_string())
        .stack_size(stack_bytes)
        .spawn(f)?;

    handle.join().map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        LessonError::ThreadPanicked { message }
    })
}

/// One RLIMIT_STACK value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackLimit {
    Bytes(u64),
    Unlimited,
}

impl fmt::Display for StackLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackLimit::Bytes(bytes) => write!(f, "{:.1} MiB", *bytes as f64 / (1024.0 * 1024.0)),
            StackLimit::Unlimited => f.write_str("unlimited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackLimits {
    pub soft: StackLimit,
    pub hard: StackLimit,
}

/// The process's stack size limits, or `None` where the OS does not expose them.
#[cfg(unix)]
pub fn stack_limits() -> Option<StackLimits> {
    fn convert(raw: libc::rlim_t) -> StackLimit {
        if raw == libc::RLIM_INFINITY {
            StackLimit::Unlimited
        } else {
            StackLimit::Bytes(u64::from(raw))
        }
    }

    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the rlimit we pass it.
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_STACK, &mut limit) };
    if rc != 0 {
        tracing::debug!("getrlimit(RLIMIT_STACK) failed: {}", std::io::Error::last_os_error());
        return None;
    }
    Some(StackLimits {
        soft: convert(limit.rlim_cur),
        hard: convert(limit.rlim_max),
    })
}

#[cfg(not(unix))]
pub fn stack_limits() -> Option<StackLimits> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_trips_exactly_at_limit() {
        let guard = RecursionLimit::new(3);
        assert!(guard.check(2).is_ok());
        assert!(matches!(
            guard.check(3),
            Err(LessonError::RecursionLimit { limit: 3 })
        ));
    }

    #[test]
    fn test_unbounded_descent_reports_progress() {
        let mut seen = Vec::new();
        let err = unbounded_descent(RecursionLimit::new(250), &mut |d| seen.push(d)).unwrap_err();
        assert!(matches!(err, LessonError::RecursionLimit { limit: 250 }));
        assert_eq!(seen, vec![0, 100, 200]);
    }

    #[test]
    fn test_controlled_recursion_depth() {
        let span = controlled_recursion(50);
        assert_eq!(span.depth, 50);
        assert_ne!(span.first_frame, 0);
        assert_eq!(controlled_recursion(0).depth, 0);
    }

    #[test]
    fn test_deep_recursion_on_sized_thread() {
        // 8000 x 1 KiB 的框架遠超過測試執行緒的 2 MiB 堆疊
        let depth = 8_000;
        let span = run_with_stack_size(stack_bytes_for(depth, BUFFERED_FRAME_ESTIMATE_BYTES), move || {
            controlled_recursion(depth)
        })
        .unwrap();
        assert_eq!(span.depth, depth);
        assert!(span.bytes_per_frame() >= BUFFER_FRAME_BYTES);
        assert!(span.bytes_per_frame() <= BUFFERED_FRAME_ESTIMATE_BYTES);

        let guard = RecursionLimit::new(50_000);
        let err = run_with_stack_size(stack_bytes_for(50_000, FRAME_ESTIMATE_BYTES), move || {
            unbounded_descent(guard, &mut |_| {})
        })
        .unwrap();
        assert!(matches!(err, Err(LessonError::RecursionLimit { limit: 50_000 })));
    }

    #[test]
    fn test_stack_bytes_for_saturates() {
        assert_eq!(stack_bytes_for(0, 1024), STACK_HEADROOM_BYTES);
        assert_eq!(stack_bytes_for(10, 1024), 10 * 1024 + STACK_HEADROOM_BYTES);
        assert_eq!(stack_bytes_for(usize::MAX, 2), usize::MAX);
    }

    #[cfg(unix)]
    #[test]
    fn test_stack_limits_are_reported() {
        let limits = stack_limits().unwrap();
        if let (StackLimit::Bytes(soft), StackLimit::Bytes(hard)) = (limits.soft, limits.hard) {
            assert!(soft <= hard);
        }
        assert_eq!(StackLimit::Bytes(8 * 1024 * 1024).to_string(), "8.0 MiB");
        assert_eq!(StackLimit::Unlimited.to_string(), "unlimited");
    }

    #[test]
    fn test_factorial_overflow() {
        assert_eq!(factorial_tail(34, 1).unwrap(), (1..=34u128).product());
        assert!(factorial_tail(35, 1).is_err());
        assert!(trampoline(factorial_trampoline(35, 1)).is_err());
    }

    #[test]
    fn test_thread_panic_is_reported() {
        let err = run_with_stack_size(256 * 1024, || -> u32 { panic!("boom") }).unwrap_err();
        assert!(matches!(err, LessonError::ThreadPanicked { message } if message == "boom"));
    }
}
