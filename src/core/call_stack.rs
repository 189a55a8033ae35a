//! Call-stack introspection.
//!
//! Rust has no runtime frame objects, so frames are recorded explicitly:
//! `CallStack::enter` pushes a [`Frame`] and the returned guard pops it on
//! drop, which keeps the record in step with the real stack even on early
//! returns.

use anyhow::{anyhow, Context};
use std::cell::RefCell;
use std::fmt;
use std::hint::black_box;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub locals: Vec<(String, String)>,
    pub depth: usize,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, (name, value)) in self.locals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Default)]
pub struct CallStack {
    frames: RefCell<Vec<Frame>>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, function: &str, locals: &[(&str, String)]) -> FrameGuard<'_> {
        let mut frames = self.frames.borrow_mut();
        let depth = frames.len() + 1;
        frames.push(Frame {
            function: function.to_string(),
            locals: locals
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            depth,
        });
        tracing::trace!("enter {} at depth {}", function, depth);
        FrameGuard { stack: self }
    }

    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Outermost first.
    pub fn snapshot(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    pub fn current(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }
}

#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard<'a> {
    stack: &'a CallStack,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        if let Some(frame) = self.stack.frames.borrow_mut().pop() {
            tracing::trace!("leave {} from depth {}", frame.function, frame.depth);
        }
    }
}

/// Address of a local in a fresh, non-inlined frame.
#[inline(never)]
pub fn approximate_stack_address() -> usize {
    let marker = 0u8;
    black_box(&marker) as *const u8 as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthDirection {
    Down,
    Up,
}

impl fmt::Display for GrowthDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthDirection::Down => f.write_str("DOWNWARD (toward lower addresses)"),
            GrowthDirection::Up => f.write_str("UPWARD (toward higher addresses)"),
        }
    }
}

#[inline(never)]
fn nested_address() -> usize {
    let inner = [0u8; 16];
    black_box(&inner) as *const [u8; 16] as usize
}

/// Compares a local in this frame against one in a callee's frame.
#[inline(never)]
pub fn growth_direction() -> (usize, usize, GrowthDirection) {
    let outer = [0u8; 16];
    let outer_addr = black_box(&outer) as *const [u8; 16] as usize;
    let inner_addr = nested_address();
    let direction = if inner_addr < outer_addr {
        GrowthDirection::Down
    } else {
        GrowthDirection::Up
    };
    (outer_addr, inner_addr, direction)
}

/// A closure whose captured counter outlives the frame that created it.
pub fn make_counter(start: i64) -> impl FnMut() -> i64 {
    let mut count = start;
    move || {
        count += 1;
        count
    }
}

fn level_3() -> anyhow::Result<()> {
    Err(anyhow!("Intentional error to show stack trace"))
}

fn level_2() -> anyhow::Result<()> {
    level_3().context("level_2() called level_3()")
}

fn level_1() -> anyhow::Result<()> {
    level_2().context("level_1() called level_2()")
}

/// level_1 -> level_2 -> level_3; the innermost fails and each caller adds
/// context, so the error carries the call chain outermost first.
pub fn error_chain_demo() -> anyhow::Error {
    match level_1() {
        Ok(()) => anyhow!("level_3() unexpectedly succeeded"),
        Err(e) => e,
    }
}
