use crate::core::call_stack::{self, CallStack};
use crate::core::recursion::RecursionLimit;
use crate::core::{Lesson, LessonKind, LessonOutcome, Narrator};
use crate::say;
use crate::utils::error::Result;

pub struct StackFramesLesson;

fn show_frame_info(stack: &CallStack, out: &mut dyn Narrator, label: &str) -> Result<()> {
    say!(out)?;
    say!(out, "[{}] Frame Information:", label)?;
    if let Some(frame) = stack.current() {
        say!(out, "  Function: {}", frame.function)?;
        let names: Vec<&str> = frame.locals.iter().map(|(name, _)| name.as_str()).collect();
        say!(out, "  Local variables: {:?}", names)?;
    }
    say!(out, "  Stack depth: {}", stack.depth())?;
    say!(
        out,
        "  Approximate stack address: {:#x}",
        call_stack::approximate_stack_address()
    )
}

fn function_d(stack: &CallStack, out: &mut dyn Narrator) -> Result<()> {
    let local_d = "deep";
    let _frame = stack.enter("function_d", &[("local_d", format!("{:?}", local_d))]);
    say!(out)?;
    say!(out, "    [D] Executing function_d()")?;
    say!(out, "    [D] Local variable: local_d = '{}'", local_d)?;
    show_frame_info(stack, out, "D")?;

    say!(out)?;
    say!(out, "    [D] Full call stack (innermost first):")?;
    for (i, frame) in stack.snapshot().iter().rev().enumerate() {
        say!(out, "        {}. {}", i, frame)?;
    }
    say!(out, "    [D] → Deepest in the call stack, about to return...")
}

fn function_c(stack: &CallStack, out: &mut dyn Narrator) -> Result<()> {
    let local_c = vec![1, 2, 3];
    let _frame = stack.enter("function_c", &[("local_c", format!("{:?}", local_c))]);
    say!(out)?;
    say!(out, "  [C] Executing function_c()")?;
    say!(out, "  [C] Local variable: local_c = {:?}", local_c)?;
    say!(out, "  [C] → Calling function_d()")?;
    function_d(stack, out)?;
    say!(out, "  [C] ← Returned from function_d() (depth {})", stack.depth())
}

fn function_b(stack: &CallStack, out: &mut dyn Narrator, param1: &str, param2: i32) -> Result<()> {
    let local_b = ("key", "value");
    let _frame = stack.enter(
        "function_b",
        &[
            ("param1", format!("{:?}", param1)),
            ("param2", param2.to_string()),
            ("local_b", format!("{:?}", local_b)),
        ],
    );
    say!(out)?;
    say!(out, "[B] Executing function_b()")?;
    say!(out, "[B] Parameters: param1={}, param2={}", param1, param2)?;
    say!(out, "[B] Local variable: local_b = {:?}", local_b)?;
    show_frame_info(stack, out, "B")?;
    say!(out, "[B] → Calling function_c()")?;
    function_c(stack, out)?;
    say!(out, "[B] ← Returned from function_c() (depth {})", stack.depth())
}

fn function_a(stack: &CallStack, out: &mut dyn Narrator) -> Result<()> {
    let local_a = 42;
    let message = "Stack frame A";
    let _frame = stack.enter(
        "function_a",
        &[
            ("local_a", local_a.to_string()),
            ("message", format!("{:?}", message)),
        ],
    );
    say!(out)?;
    say!(out, "[A] Executing function_a()")?;
    say!(out, "[A] Local variables: local_a = {}, message = '{}'", local_a, message)?;
    show_frame_info(stack, out, "A")?;
    say!(out, "[A] → Calling function_b()")?;
    function_b(stack, out, "hello", 99)?;
    say!(out, "[A] ← Returned from function_b() (depth {})", stack.depth())
}

fn nested_calls(out: &mut dyn Narrator) -> Result<()> {
    say!(out)?;
    say!(out, "=== Nested Function Calls ===")?;
    say!(out, "Watch the call stack grow and shrink:")?;
    let stack = CallStack::new();
    function_a(&stack, out)?;
    say!(out)?;
    say!(out, "Back in the caller: call stack depth = {}", stack.depth())
}

fn frame_components(out: &mut dyn Narrator) -> Result<()> {
    out.section("STACK FRAME COMPONENTS")?;
    say!(out)?;
    say!(out, "Each function call creates a stack frame containing:")?;
    say!(out, "  1. Return address (where to resume after the call returns)")?;
    say!(out, "  2. Saved frame pointer (the caller's base pointer)")?;
    say!(out, "  3. Local variables")?;
    say!(out, "  4. Spilled arguments and saved registers")?;

    let (outer, inner, direction) = call_stack::growth_direction();
    say!(out)?;
    say!(out, "Stack Growth Direction:")?;
    say!(out, "  Caller local at: {:#x}", outer)?;
    say!(out, "  Callee local at: {:#x}", inner)?;
    say!(out, "  → Stack grows {}", direction)
}

fn recursion_depth(out: &mut dyn Narrator) -> Result<()> {
    out.section("RECURSION DEPTH")?;

    let guard = RecursionLimit::new(10);
    say!(out)?;
    say!(out, "Rust has no recursion limit of its own: deep recursion")?;
    say!(out, "overflows the thread's stack and aborts the process.")?;
    say!(out, "A depth guard makes the limit explicit (here {} levels).", guard.limit())?;

    fn count_down(
        n: u32,
        depth: usize,
        guard: RecursionLimit,
        out: &mut dyn Narrator,
    ) -> Result<u32> {
        guard.check(depth)?;
        if n == 0 {
            return Ok(0);
        }
        say!(out, "  Depth {}: count_down({})", depth + 1, n)?;
        count_down(n - 1, depth + 1, guard, out)
    }

    say!(out)?;
    say!(out, "Safe recursion (limited to {} levels):", guard.limit())?;
    count_down(5, 0, guard, out)?;
    Ok(())
}

fn error_chain(out: &mut dyn Narrator) -> Result<()> {
    out.section("ERROR PROPAGATION - THE CALL CHAIN")?;
    say!(out)?;
    say!(out, "Calling level_1() → level_2() → level_3() (fails):")?;

    let err = call_stack::error_chain_demo();
    say!(out)?;
    say!(out, "Caught error: {}", err.root_cause())?;
    say!(out)?;
    say!(out, "Each ? added context on the way up:")?;
    for (i, cause) in err.chain().enumerate() {
        say!(out, "  {}: {}", i, cause)?;
    }
    Ok(())
}

fn closures(out: &mut dyn Narrator) -> Result<()> {
    out.section("CLOSURES - STATE THAT OUTLIVES A FRAME")?;
    say!(out)?;
    say!(out, "Creating counter starting at 10:")?;
    let mut counter = call_stack::make_counter(10);
    for _ in 0..3 {
        say!(out, "  counter() = {}", counter())?;
    }
    say!(out)?;
    say!(out, "The 'count' variable was moved into the closure,")?;
    say!(out, "so it lives on after make_counter() returned.")
}

#[async_trait::async_trait]
impl Lesson for StackFramesLesson {
    fn kind(&self) -> LessonKind {
        LessonKind::StackFrames
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome> {
        narrator.banner(self.title())?;
        nested_calls(narrator)?;
        frame_components(narrator)?;
        recursion_depth(narrator)?;
        error_chain(narrator)?;
        closures(narrator)?;
        narrator.insights(
            "KEY RUST INSIGHTS:",
            &[
                "Frames can be recorded explicitly with RAII guards",
                "Drop pops the frame on every return path",
                "Errors carry the call chain through ? and context",
                "Closures capture by move and outlive their creator",
                "No implicit recursion limit: bound deep recursion yourself",
            ],
        )?;
        Ok(LessonOutcome::default())
    }
}
