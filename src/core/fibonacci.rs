//! Fibonacci strategies.
//!
//! Every strategy computes the same sequence over `u64`:
//!
//!   fib(0) = 0, fib(1) = 1, fib(n) = fib(n-1) + fib(n-2)
//!
//! fib(93) is the last value that fits; anything past it returns
//! [`LessonError::Overflow`] instead of wrapping.

use crate::domain::model::BenchmarkRow;
use crate::utils::error::{LessonError, Result};
use std::collections::HashMap;
use std::time::Instant;

pub const MAX_FIB_INDEX: u32 = 93;

/// 編譯期計算
pub const FIB_10: u64 = fib_const(10);

fn checked_sum(a: u64, b: u64, operation: &str, n: u32) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| LessonError::overflow(operation, n))
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Naive recursion, O(2^n) calls.
pub fn fib_naive(n: u32) -> Result<u64> {
    if n <= 1 {
        return Ok(u64::from(n));
    }
    let a = fib_naive(n - 1)?;
    let b = fib_naive(n - 2)?;
    checked_sum(a, b, "fib_naive", n)
}

/// Naive recursion that records every call and return.
pub fn fib_naive_traced(n: u32, trace: &mut Vec<String>) -> Result<u64> {
    fn go(n: u32, depth: usize, trace: &mut Vec<String>) -> Result<u64> {
        let pad = indent(depth);
        trace.push(format!("{}→ fib({}) called", pad, n));

        if n <= 1 {
            trace.push(format!("{}← fib({}) = {} [BASE CASE]", pad, n, n));
            return Ok(u64::from(n));
        }

        let result = checked_sum(
            go(n - 1, depth + 1, trace)?,
            go(n - 2, depth + 1, trace)?,
            "fib_naive",
            n,
        )?;
        trace.push(format!("{}← fib({}) = {}", pad, n, result));
        Ok(result)
    }

    go(n, 0, trace)
}

/// Naive recursion with a call counter, the decorator-style instrumentation.
pub fn fib_counted(n: u32, calls: &mut u64) -> Result<u64> {
    *calls += 1;
    if n <= 1 {
        return Ok(u64::from(n));
    }
    let a = fib_counted(n - 1, calls)?;
    let b = fib_counted(n - 2, calls)?;
    checked_sum(a, b, "fib_counted", n)
}

pub fn fib_iterative(n: u32) -> Result<u64> {
    if n <= 1 {
        return Ok(u64::from(n));
    }

    let (mut prev2, mut prev1) = (0u64, 1u64);
    for _ in 2..=n {
        let current = checked_sum(prev1, prev2, "fib_iterative", n)?;
        prev2 = prev1;
        prev1 = current;
    }
    Ok(prev1)
}

pub fn fib_iterative_traced(n: u32, trace: &mut Vec<String>) -> Result<u64> {
    if n <= 1 {
        trace.push(format!("fib({}) = {}", n, n));
        return Ok(u64::from(n));
    }

    let (mut prev2, mut prev1) = (0u64, 1u64);
    trace.push("fib(0) = 0".to_string());
    trace.push("fib(1) = 1".to_string());

    for i in 2..=n {
        let current = checked_sum(prev1, prev2, "fib_iterative", n)?;
        trace.push(format!("fib({}) = {} + {} = {}", i, prev1, prev2, current));
        prev2 = prev1;
        prev1 = current;
    }
    Ok(prev1)
}

/// Compile-time Fibonacci. Saturates at `u64::MAX` past index 93 since
/// const fns cannot return our error type.
pub const fn fib_const(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    let mut prev2 = 0u64;
    let mut prev1 = 1u64;
    let mut i = 2u32;
    while i <= n {
        let current = prev1.saturating_add(prev2);
        prev2 = prev1;
        prev1 = current;
        i += 1;
    }
    prev1
}

/// fib(n) as a fold over `0..n`, the functional "reduce" formulation.
/// The state is (fib(k-1), fib(k)), seeded with fib(-1) = 1.
pub fn fib_fold(n: u32) -> Result<u64> {
    (0..n)
        .try_fold((1u64, 0u64), |(a, b), _| a.checked_add(b).map(|next| (b, next)))
        .map(|(_, b)| b)
        .ok_or_else(|| LessonError::overflow("fib_fold", n))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Memoized recursion. Base cases are cached too, so fib(n) from an empty
/// cache costs n + 1 misses and n - 1 hits.
#[derive(Debug, Default)]
pub struct FibMemo {
    cache: HashMap<u32, u64>,
    hits: u64,
    misses: u64,
}

impl FibMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, n: u32) -> Result<u64> {
        if let Some(&value) = self.cache.get(&n) {
            self.hits += 1;
            return Ok(value);
        }
        self.misses += 1;

        let value = if n <= 1 {
            u64::from(n)
        } else {
            let a = self.get(n - 1)?;
            let b = self.get(n - 2)?;
            checked_sum(a, b, "fib_memoized", n)?
        };
        self.cache.insert(n, value);
        Ok(value)
    }

    pub fn get_traced(&mut self, n: u32, trace: &mut Vec<String>) -> Result<u64> {
        self.traced(n, 0, trace)
    }

    fn traced(&mut self, n: u32, depth: usize, trace: &mut Vec<String>) -> Result<u64> {
        let pad = indent(depth);

        if let Some(&value) = self.cache.get(&n) {
            self.hits += 1;
            trace.push(format!("{}→ fib({}) = {} [CACHED]", pad, n, value));
            return Ok(value);
        }
        self.misses += 1;
        trace.push(format!("{}→ fib({}) called", pad, n));

        if n <= 1 {
            trace.push(format!("{}← fib({}) = {} [BASE CASE]", pad, n, n));
            self.cache.insert(n, u64::from(n));
            return Ok(u64::from(n));
        }

        let a = self.traced(n - 1, depth + 1, trace)?;
        let b = self.traced(n - 2, depth + 1, trace)?;
        let value = checked_sum(a, b, "fib_memoized", n)?;
        trace.push(format!("{}← fib({}) = {} [STORING]", pad, n, value));
        self.cache.insert(n, value);
        Ok(value)
    }

    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Lazy Fibonacci generator. Ends after fib(93) rather than overflowing.
#[derive(Debug, Clone)]
pub struct FibonacciIter {
    current: Option<u64>,
    next: Option<u64>,
}

impl FibonacciIter {
    pub fn new() -> Self {
        Self {
            current: Some(0),
            next: Some(1),
        }
    }
}

impl Default for FibonacciIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FibonacciIter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        let following = match (self.current, self.next) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        self.current = self.next;
        self.next = following;
        Some(result)
    }
}

fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<(T, u128)> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed().as_micros()))
}

/// Times every strategy on fib(n). The naive strategy only runs when
/// `n <= naive_limit`.
pub fn benchmark(n: u32, naive_limit: u32) -> Result<Vec<BenchmarkRow>> {
    tracing::debug!("Benchmarking fib({}) (naive limit {})", n, naive_limit);
    let mut rows = Vec::new();

    let (result, elapsed) = timed(|| fib_iterative(n))?;
    rows.push(BenchmarkRow {
        strategy: "iterative".to_string(),
        n,
        result: Some(result),
        elapsed_micros: elapsed,
        calls: None,
        space: "O(1) - constant".to_string(),
    });

    if n <= naive_limit {
        let mut calls = 0u64;
        let (result, elapsed) = timed(|| fib_counted(n, &mut calls))?;
        rows.push(BenchmarkRow {
            strategy: "naive".to_string(),
            n,
            result: Some(result),
            elapsed_micros: elapsed,
            calls: Some(calls),
            space: "O(n) - stack depth".to_string(),
        });
    } else {
        tracing::debug!("Skipping naive fib({}): above limit {}", n, naive_limit);
    }

    let mut memo = FibMemo::new();
    let (result, elapsed) = timed(|| memo.get(n))?;
    let info = memo.cache_info();
    rows.push(BenchmarkRow {
        strategy: "memoized".to_string(),
        n,
        result: Some(result),
        elapsed_micros: elapsed,
        calls: Some(info.hits + info.misses),
        space: "O(n) - cache + stack".to_string(),
    });

    let (result, elapsed) = timed(|| {
        FibonacciIter::new()
            .nth(n as usize)
            .ok_or_else(|| LessonError::overflow("fib_iterator", n))
    })?;
    rows.push(BenchmarkRow {
        strategy: "iterator".to_string(),
        n,
        result: Some(result),
        elapsed_micros: elapsed,
        calls: None,
        space: "O(1) - iterator state only".to_string(),
    });

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_cases() {
        assert_eq!(fib_naive(0).unwrap(), 0);
        assert_eq!(fib_naive(1).unwrap(), 1);
        assert_eq!(fib_iterative(0).unwrap(), 0);
        assert_eq!(fib_iterative(1).unwrap(), 1);
        assert_eq!(fib_fold(0).unwrap(), 0);
        assert_eq!(fib_fold(1).unwrap(), 1);
    }

    #[test]
    fn test_const_matches_runtime() {
        assert_eq!(FIB_10, 55);
        assert_eq!(fib_const(MAX_FIB_INDEX), fib_iterative(MAX_FIB_INDEX).unwrap());
    }

    #[test]
    fn test_naive_trace_shape() {
        let mut trace = Vec::new();
        let result = fib_naive_traced(2, &mut trace).unwrap();
        assert_eq!(result, 1);
        assert_eq!(
            trace,
            vec![
                "→ fib(2) called",
                "  → fib(1) called",
                "  ← fib(1) = 1 [BASE CASE]",
                "  → fib(0) called",
                "  ← fib(0) = 0 [BASE CASE]",
                "← fib(2) = 1",
            ]
        );
    }

    #[test]
    fn test_iterative_trace() {
        let mut trace = Vec::new();
        assert_eq!(fib_iterative_traced(5, &mut trace).unwrap(), 5);
        assert_eq!(trace.first().map(String::as_str), Some("fib(0) = 0"));
        assert_eq!(trace.last().map(String::as_str), Some("fib(5) = 3 + 2 = 5"));
        assert_eq!(trace.len(), 6);
    }

    #[test]
    fn test_memo_marks_cached_values() {
        let mut memo = FibMemo::new();
        let mut trace = Vec::new();
        assert_eq!(memo.get_traced(5, &mut trace).unwrap(), 5);
        assert!(trace.iter().any(|line| line.contains("[CACHED]")));
        assert!(trace.iter().any(|line| line.contains("[STORING]")));
    }

    #[test]
    fn test_iterator_stops_before_overflow() {
        assert_eq!(FibonacciIter::new().count(), MAX_FIB_INDEX as usize + 1);
    }
}
