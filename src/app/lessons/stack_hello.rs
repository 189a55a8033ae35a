use crate::config::toml_config::StackConfig;
use crate::core::containers::{reverse_with_stack, Stack};
use crate::core::{Lesson, LessonKind, LessonOutcome, Narrator};
use crate::say;
use crate::utils::error::Result;

/// Turing's bury/unbury: push every character, pop them back out reversed.
pub struct StackHelloLesson {
    config: StackConfig,
}

impl StackHelloLesson {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    fn bury_and_unbury(&self, out: &mut dyn Narrator) -> Result<()> {
        say!(out)?;
        say!(out, "=== Basic Stack Operations ===")?;
        say!(out)?;

        let mut stack = Stack::new();
        say!(out, "BURYING (pushing to stack):")?;
        for ch in self.config.message.chars() {
            stack.push(ch);
            say!(out, "  Push '{}' → Stack: {}", ch, stack)?;
        }

        say!(out)?;
        say!(out, "UNBURYING (popping from stack):")?;
        let mut buffer = Vec::with_capacity(stack.len());
        while let Some(ch) = stack.pop() {
            if stack.is_empty() {
                say!(out, "  Pop  '{}' ← Stack: (empty)", ch)?;
            } else {
                say!(out, "  Pop  '{}' ← Stack: {}", ch, stack)?;
            }
            buffer.push(ch);
        }

        let reversed: String = buffer.iter().collect();
        let original: String = buffer.iter().rev().collect();
        say!(out)?;
        say!(out, "Reversed: {}", reversed)?;
        say!(out, "Original: {}", original)
    }

    fn explicit(&self, out: &mut dyn Narrator) -> Result<()> {
        out.section("EXPLICIT STACK DEMONSTRATION")?;

        let message = &self.config.message;
        let mut stack = Stack::new();
        say!(out)?;
        say!(out, "Pushing '{}' character by character:", message)?;
        for (i, ch) in message.chars().enumerate() {
            stack.push(ch);
            say!(
                out,
                "  {:2}. Push '{}' → Stack size: {}, Top: '{}'",
                i + 1,
                ch,
                stack.len(),
                top(&stack)
            )?;
        }

        say!(out)?;
        say!(out, "Popping all characters:")?;
        let mut buffer = String::new();
        let mut count = 1;
        while let Some(ch) = stack.pop() {
            buffer.push(ch);
            say!(
                out,
                "  {:2}. Pop  '{}' → Stack size: {}, Top: '{}'",
                count,
                ch,
                stack.len(),
                top(&stack)
            )?;
            count += 1;
        }

        say!(out)?;
        say!(out, "Final result (reversed): {}", buffer)?;
        say!(out, "Corrected: {}", reverse_with_stack(&buffer))
    }
}

fn top(stack: &Stack<char>) -> String {
    stack
        .peek()
        .map(char::to_string)
        .unwrap_or_else(|| "None".to_string())
}

fn generic_stacks(out: &mut dyn Narrator) -> Result<()> {
    out.section("GENERIC STACK - MULTIPLE TYPES")?;

    say!(out)?;
    say!(out, "1. Stack<i32>:")?;
    let int_stack: Stack<i32> = (1..=5).collect();
    say!(out, "  {}", int_stack)?;

    say!(out)?;
    say!(out, "2. Stack<&str>:")?;
    let str_stack: Stack<&str> = ["first", "second", "third"].into_iter().collect();
    say!(out, "  {}", str_stack)?;

    say!(out)?;
    say!(out, "3. Stack<(i32, &str)>:")?;
    let mut tuple_stack = Stack::new();
    tuple_stack.push((1, "one"));
    tuple_stack.push((2, "two"));
    say!(out, "  Stack of tuples: size = {}, top = {:?}", tuple_stack.len(), tuple_stack.peek())?;

    say!(out)?;
    say!(out, "Generics are monomorphized: no runtime type checks")
}

fn safety(out: &mut dyn Narrator) -> Result<()> {
    out.section("SAFETY GUARANTEES")?;

    say!(out)?;
    say!(out, "✓ No null pointers - pop returns Option<T>")?;
    let mut empty: Stack<i32> = Stack::new();
    match empty.pop() {
        Some(value) => say!(out, "  Got: {}", value)?,
        None => say!(out, "  Stack empty (None) - safe!")?,
    }

    say!(out)?;
    say!(out, "✓ No buffer overflows - Vec<T> grows as needed")?;
    say!(out)?;
    say!(out, "✓ No use-after-free - popped values are moved out to the caller")?;
    let mut owned: Stack<String> = Stack::new();
    owned.push(String::from("Hello"));
    owned.push(String::from("World"));
    if let Some(word) = owned.pop() {
        say!(out, "  Took ownership of \"{}\"; {} item(s) left", word, owned.len())?;
    }
    say!(out)?;
    say!(out, "✓ Automatic cleanup when the stack goes out of scope")
}

#[async_trait::async_trait]
impl Lesson for StackHelloLesson {
    fn kind(&self) -> LessonKind {
        LessonKind::StackHello
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome> {
        tracing::debug!("Stack hello lesson with message {:?}", self.config.message);
        narrator.banner(self.title())?;
        self.bury_and_unbury(narrator)?;
        self.explicit(narrator)?;
        generic_stacks(narrator)?;
        safety(narrator)?;
        narrator.insights(
            "KEY RUST INSIGHTS:",
            &[
                "A Vec is already a stack: push and pop at the end",
                "Option<T> instead of null for an empty stack",
                "Popping moves ownership out to the caller",
                "Generics with no runtime overhead",
                "Memory safety WITHOUT garbage collection",
            ],
        )?;
        Ok(LessonOutcome::default())
    }
}
