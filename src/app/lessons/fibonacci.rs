use crate::config::toml_config::FibonacciConfig;
use crate::core::fibonacci::{self, FibMemo, FibonacciIter, FIB_10};
use crate::core::{BenchmarkRow, Lesson, LessonKind, LessonOutcome, Narrator};
use crate::say;
use crate::utils::error::{LessonError, Result};

pub struct FibonacciLesson {
    config: FibonacciConfig,
}

impl FibonacciLesson {
    pub fn new(config: FibonacciConfig) -> Self {
        Self { config }
    }

    fn narrate(&self, out: &mut dyn Narrator) -> Result<Vec<BenchmarkRow>> {
        let n = self.config.trace_n;
        out.banner(self.title())?;

        say!(out)?;
        say!(out, "=== Naive Recursive (with visualization) ===")?;
        say!(out, "Computing fib({}):", n)?;
        let mut trace = Vec::new();
        let result = fibonacci::fib_naive_traced(n, &mut trace)?;
        emit(out, &trace)?;
        say!(out)?;
        say!(out, "Final result: {}", result)?;

        say!(out)?;
        say!(out, "=== Iterative Approach ===")?;
        trace.clear();
        let result = fibonacci::fib_iterative_traced(n, &mut trace)?;
        emit(out, &trace)?;
        say!(out, "Final result: {}", result)?;

        say!(out)?;
        say!(out, "=== Memoized Recursive ===")?;
        trace.clear();
        let mut memo = FibMemo::new();
        let result = memo.get_traced(n, &mut trace)?;
        emit(out, &trace)?;
        say!(out)?;
        say!(out, "Final result: {}", result)?;
        let info = memo.cache_info();
        say!(
            out,
            "Cache info: hits={}, misses={}, size={}",
            info.hits,
            info.misses,
            info.size
        )?;

        let rows = self.benchmark(out)?;
        self.iterators(out)?;
        ownership(out)?;

        out.insights(
            "KEY RUST INSIGHTS:",
            &[
                "const fn = compile-time computation",
                "Iterators = zero-cost lazy evaluation",
                "HashMap memoization turns O(2^n) into O(n)",
                "Checked arithmetic reports overflow instead of wrapping",
                "Ownership prevents memory bugs",
                "No garbage collector needed",
            ],
        )?;

        Ok(rows)
    }

    fn benchmark(&self, out: &mut dyn Narrator) -> Result<Vec<BenchmarkRow>> {
        let n = self.config.benchmark_n;
        out.section(&format!("BENCHMARK: Computing fib({})", n))?;

        let rows = fibonacci::benchmark(n, self.config.naive_limit)?;
        for (i, row) in rows.iter().enumerate() {
            say!(out)?;
            say!(out, "{}. {}:", i + 1, capitalize(&row.strategy))?;
            if let Some(result) = row.result {
                say!(out, "  Result: {}", result)?;
            }
            say!(out, "  Time: {}µs", row.elapsed_micros)?;
            if let Some(calls) = row.calls {
                say!(out, "  Calls: {}", calls)?;
            }
            say!(out, "  Space: {}", row.space)?;
        }

        if n > self.config.naive_limit {
            say!(out)?;
            say!(
                out,
                "Naive recursion skipped: fib({}) needs too many calls (limit is {})",
                n,
                self.config.naive_limit
            )?;
        }

        say!(out)?;
        say!(out, "{}. Compile-time const:", rows.len() + 1)?;
        say!(out, "  fib(10) computed at compile time = {}", FIB_10)?;
        say!(out, "  Zero runtime cost!")?;

        Ok(rows)
    }

    fn iterators(&self, out: &mut dyn Narrator) -> Result<()> {
        out.section("RUST ITERATOR - LAZY EVALUATION")?;

        say!(out)?;
        say!(out, "First 10 Fibonacci numbers:")?;
        let first_10: Vec<u64> = FibonacciIter::new().take(10).collect();
        say!(out, "  {:?}", first_10)?;

        say!(out)?;
        say!(out, "Sum of first 10:")?;
        let sum: u64 = FibonacciIter::new().take(10).sum();
        say!(out, "  {}", sum)?;

        say!(out)?;
        say!(out, "Computing fib(10) with try_fold (like reduce in functional languages):")?;
        say!(out, "  Result: {}", fibonacci::fib_fold(10)?)?;

        let last = FibonacciIter::new().last().ok_or_else(|| {
            LessonError::overflow("fib_iterator", fibonacci::MAX_FIB_INDEX + 1)
        })?;
        say!(out)?;
        say!(
            out,
            "The iterator ends at fib({}) = {}; fib({}) would overflow u64",
            fibonacci::MAX_FIB_INDEX,
            last,
            fibonacci::MAX_FIB_INDEX + 1
        )?;
        match fibonacci::fib_iterative(fibonacci::MAX_FIB_INDEX + 1) {
            Ok(value) => say!(out, "  Unexpected: fib(94) = {}", value)?,
            Err(e) => say!(out, "  fib_iterative(94) → Error: {}", e)?,
        }

        say!(out)?;
        say!(out, "Iterators are:")?;
        say!(out, "  • Zero-cost abstractions")?;
        say!(out, "  • Lazily evaluated")?;
        say!(out, "  • Composable with .map(), .filter(), .take(), etc.")
    }
}

fn ownership(out: &mut dyn Narrator) -> Result<()> {
    out.section("OWNERSHIP IN RECURSION")?;
    say!(out)?;
    say!(out, "Each recursive call:")?;
    say!(out, "  1. Gets its own stack frame")?;
    say!(out, "  2. Owns its local variables")?;
    say!(out, "  3. Cleans up automatically on return")?;
    say!(out, "  4. All checked at compile time!")?;
    say!(out)?;
    say!(out, "The memo table is passed as &mut, so only one call can")?;
    say!(out, "write to it at a time.")
}

fn emit(out: &mut dyn Narrator, lines: &[String]) -> Result<()> {
    for line in lines {
        out.line(line)?;
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait::async_trait]
impl Lesson for FibonacciLesson {
    fn kind(&self) -> LessonKind {
        LessonKind::Fibonacci
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome> {
        tracing::debug!(
            "Fibonacci lesson: trace_n={}, benchmark_n={}",
            self.config.trace_n,
            self.config.benchmark_n
        );
        let benchmarks = self.narrate(narrator)?;
        Ok(LessonOutcome { benchmarks })
    }
}
