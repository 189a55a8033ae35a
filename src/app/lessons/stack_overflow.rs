use crate::config::toml_config::RecursionConfig;
use crate::core::recursion::{
    self, RecursionLimit, StackLimits, BUFFERED_FRAME_ESTIMATE_BYTES, BUFFER_FRAME_BYTES,
    FRAME_ESTIMATE_BYTES,
};
use crate::core::{Lesson, LessonKind, LessonOutcome, Narrator};
use crate::say;
use crate::utils::error::{LessonError, Result};

pub struct StackOverflowLesson {
    config: RecursionConfig,
}

impl StackOverflowLesson {
    pub fn new(config: RecursionConfig) -> Self {
        Self { config }
    }

    fn recursion_limit(&self, out: &mut dyn Narrator) -> Result<()> {
        say!(out)?;
        say!(out, "=== RECURSION LIMIT ===")?;
        say!(out)?;

        let guard = RecursionLimit::new(self.config.limit);
        say!(out, "Configured recursion limit: {}", guard.limit())?;
        say!(out, "The guard stops runaway recursion before the stack does")?;
        say!(out)?;
        say!(out, "Attempting infinite recursion...")?;

        let stack_bytes = recursion::stack_bytes_for(guard.limit(), FRAME_ESTIMATE_BYTES);
        let (outcome, deepest) = recursion::run_with_stack_size(stack_bytes, move || {
            let mut deepest = 0;
            let outcome = recursion::unbounded_descent(guard, &mut |depth| deepest = depth);
            (outcome, deepest)
        })?;
        match outcome {
            Err(e @ LessonError::RecursionLimit { .. }) => {
                tracing::debug!("Recursion guard tripped after depth {}", deepest);
                say!(out, "  Last progress report at depth {}", deepest)?;
                say!(out, "✓ Error caught: {}", e)?;
                say!(out, "The guard prevented a stack overflow!")
            }
            Err(e) => Err(e),
            Ok(depth) => say!(out, "  Recursion unexpectedly returned at depth {}", depth),
        }
    }

    fn safe_deep_recursion(&self, out: &mut dyn Narrator) -> Result<()> {
        let limit = self.config.safe_depth;
        say!(out)?;
        say!(out, "=== SAFE DEEP RECURSION (limit={}) ===", limit)?;
        say!(out)?;
        let stack_bytes = recursion::stack_bytes_for(limit, FRAME_ESTIMATE_BYTES);
        let (reached, calls) =
            recursion::run_with_stack_size(stack_bytes, move || recursion::safe_deep_recursion(limit))?;
        say!(out, "  Reached depth: {}", reached)?;
        say!(out, "  Total calls: {}", calls)
    }

    fn controlled_recursion(&self, out: &mut dyn Narrator) -> Result<()> {
        let depth = self.config.controlled_depth;
        say!(out)?;
        say!(out, "=== CONTROLLED RECURSION ({} KiB per frame) ===", BUFFER_FRAME_BYTES / 1024)?;
        say!(out)?;
        let stack_bytes = recursion::stack_bytes_for(depth, BUFFERED_FRAME_ESTIMATE_BYTES);
        let span =
            recursion::run_with_stack_size(stack_bytes, move || recursion::controlled_recursion(depth))?;
        say!(out, "  Depth reached: {}", span.depth)?;
        say!(out, "  First frame buffer at: {:#x}", span.first_frame)?;
        say!(out, "  Last frame buffer at:  {:#x}", span.last_frame)?;
        say!(
            out,
            "  Stack spanned: {} KiB (~{} bytes per frame)",
            span.bytes_spanned() / 1024,
            span.bytes_per_frame()
        )?;
        say!(out)?;
        say!(out, "Without a limit this would run into the guard page and the")?;
        say!(out, "process would abort with 'thread has overflowed its stack'.")
    }

    fn deep_thread(&self, out: &mut dyn Narrator) -> Result<()> {
        let depth = self.config.deep_depth;
        let stack_bytes = self.config.thread_stack_bytes();
        say!(out)?;
        say!(out, "=== CHOOSING THE STACK SIZE ===")?;
        say!(out)?;
        say!(out, "The main thread's stack is fixed by the OS (see the soft limit above).")?;
        say!(out, "Spawned threads get whatever size you ask for:")?;
        say!(
            out,
            "  Running sum_recursive({}) on a thread with a {} KiB stack...",
            depth,
            self.config.thread_stack_kib
        )?;

        let total = recursion::run_with_stack_size(stack_bytes, move || {
            recursion::sum_recursive(depth)
        })?;
        say!(out, "  Result: {} (expected {})", total, recursion::sum_idiomatic(depth))
    }
}

fn system_stack_info(out: &mut dyn Narrator, limits: Option<StackLimits>) -> Result<()> {
    say!(out)?;
    say!(out, "=== SYSTEM STACK INFORMATION ===")?;
    say!(out)?;
    match limits {
        Some(limits) => {
            say!(out, "Stack size limits:")?;
            say!(out, "  Soft limit: {}", limits.soft)?;
            say!(out, "  Hard limit: {}", limits.hard)?;
        }
        None => say!(out, "Stack size limits: unavailable on this system")?,
    }
    say!(out)?;
    say!(out, "Rust adds no recursion limit of its own: the stack size is the limit,")?;
    say!(out, "and running past it aborts the whole process.")
}

fn tail_recursion(out: &mut dyn Narrator) -> Result<()> {
    say!(out)?;
    say!(out, "=== TAIL RECURSION (Not Guaranteed in Rust) ===")?;
    say!(out)?;
    say!(out, "Rust does NOT promise tail-call elimination.")?;
    say!(out, "In debug builds this uses O(n) stack space:")?;
    say!(out)?;
    let result = recursion::factorial_tail(5, 1)?;
    say!(out, "  factorial(5) = {}", result)?;
    say!(out)?;
    say!(out, "The optimizer may turn it into a loop in release builds,")?;
    say!(out, "but nothing guarantees it. Use iteration instead!")
}

fn iterative_conversion(out: &mut dyn Narrator) -> Result<()> {
    say!(out)?;
    say!(out, "=== CONVERTING TO ITERATION ===")?;
    say!(out)?;
    let n = 10;
    say!(out, "Sum of 1..{}:", n)?;
    say!(out, "  Recursive: {}", recursion::sum_recursive(n))?;
    say!(out, "  Iterative: {}", recursion::sum_iterative(n))?;
    say!(out, "  Idiomatic: {}", recursion::sum_idiomatic(n))?;
    say!(out)?;
    say!(out, "All give the same result, but:")?;
    say!(out, "  Recursive: O(n) stack space")?;
    say!(out, "  Iterative: O(1) stack space")?;
    say!(out, "  Idiomatic: O(1) stack space + cleaner!")
}

fn trampoline(out: &mut dyn Narrator) -> Result<()> {
    say!(out)?;
    say!(out, "=== TRAMPOLINE PATTERN (Advanced) ===")?;
    say!(out)?;
    say!(out, "Trampoline = way to avoid deep recursion")?;
    say!(out)?;
    let result = recursion::trampoline(recursion::factorial_trampoline(5, 1))?;
    say!(out, "  factorial(5) = {}", result)?;
    say!(out)?;
    say!(out, "Each step returns a boxed closure instead of calling itself;")?;
    say!(out, "the loop in trampoline() runs them in constant stack space.")
}

#[async_trait::async_trait]
impl Lesson for StackOverflowLesson {
    fn kind(&self) -> LessonKind {
        LessonKind::StackOverflow
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome> {
        tracing::debug!(
            "Stack overflow lesson: limit={}, deep_depth={}",
            self.config.limit,
            self.config.deep_depth
        );
        narrator.banner(self.title())?;
        system_stack_info(narrator, recursion::stack_limits())?;
        self.recursion_limit(narrator)?;
        self.safe_deep_recursion(narrator)?;
        self.controlled_recursion(narrator)?;
        tail_recursion(narrator)?;
        iterative_conversion(narrator)?;
        self.deep_thread(narrator)?;
        trampoline(narrator)?;
        narrator.insights(
            "KEY RUST INSIGHTS:",
            &[
                "No built-in recursion limit: a real overflow aborts",
                "Make limits explicit with a depth guard",
                "Size the thread's stack from the depth you allow",
                "NO guaranteed tail call elimination",
                "Prefer iteration over deep recursion",
                "thread::Builder::stack_size when you need more stack",
                "Trampolines trade stack frames for heap closures",
            ],
        )?;
        Ok(LessonOutcome::default())
    }
}
