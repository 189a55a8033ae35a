//! LIFO and FIFO containers.
//!
//!   Stack: push(x) appends at the top, pop() removes the top    O(1) amortised
//!   Queue: enqueue(x) appends at the back, dequeue() removes the front    O(1)

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.items.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Front to back.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.items.iter())
    }
}

fn write_list<'a, T: fmt::Display + 'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a T>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

/// Bury every character, then unbury them: the output comes back reversed.
pub fn reverse_with_stack(text: &str) -> String {
    let mut stack: Stack<char> = text.chars().collect();
    let mut reversed = String::with_capacity(text.len());
    while let Some(ch) = stack.pop() {
        reversed.push(ch);
    }
    reversed
}

/// Undo/redo history over two stacks. Applying a new action clears redo.
#[derive(Debug, Clone)]
pub struct UndoRedo<A> {
    undo_stack: Stack<A>,
    redo_stack: Stack<A>,
}

impl<A> UndoRedo<A> {
    pub fn new() -> Self {
        Self {
            undo_stack: Stack::new(),
            redo_stack: Stack::new(),
        }
    }

    pub fn apply(&mut self, action: A) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> Option<&A> {
        let action = self.undo_stack.pop()?;
        self.redo_stack.push(action);
        self.redo_stack.peek()
    }

    pub fn redo(&mut self) -> Option<&A> {
        let action = self.redo_stack.pop()?;
        self.undo_stack.push(action);
        self.undo_stack.peek()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Applied actions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &A> {
        self.undo_stack.iter()
    }
}

impl<A> Default for UndoRedo<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub id: usize,
    pub name: String,
    pub pages: u32,
}

/// Print spooler: jobs print in the order they were submitted.
#[derive(Debug, Default)]
pub struct PrintSpooler {
    pending: Queue<PrintJob>,
    next_id: usize,
}

impl PrintSpooler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a job and returns its id. Ids start at 1.
    pub fn submit(&mut self, name: impl Into<String>, pages: u32) -> usize {
        self.next_id += 1;
        self.pending.enqueue(PrintJob {
            id: self.next_id,
            name: name.into(),
            pages,
        });
        self.next_id
    }

    pub fn print_next(&mut self) -> Option<PrintJob> {
        self.pending.dequeue()
    }

    /// Prints every queued job, oldest first.
    pub fn drain(&mut self) -> Vec<PrintJob> {
        std::iter::from_fn(|| self.print_next()).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_pages(&self) -> u32 {
        self.pending.iter().map(|job| job.pages).sum()
    }
}

/// Task-safe LIFO; clones share the same stack.
#[derive(Debug)]
pub struct SharedStack<T> {
    inner: Arc<Mutex<Stack<T>>>,
}

impl<T> Clone for SharedStack<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send> SharedStack<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Stack::new())),
        }
    }

    /// Returns the size after the put.
    pub async fn put(&self, item: T) -> usize {
        let mut stack = self.inner.lock().await;
        stack.push(item);
        stack.len()
    }

    pub async fn get(&self) -> Option<T> {
        self.inner.lock().await.pop()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<T: Send> Default for SharedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Task-safe FIFO; clones share the same queue.
#[derive(Debug)]
pub struct SharedQueue<T> {
    inner: Arc<Mutex<Queue<T>>>,
}

impl<T> Clone for SharedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send> SharedQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Queue::new())),
        }
    }

    pub async fn put(&self, item: T) -> usize {
        let mut queue = self.inner.lock().await;
        queue.enqueue(item);
        queue.len()
    }

    pub async fn get(&self) -> Option<T> {
        self.inner.lock().await.dequeue()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<T: Send> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_display() {
        let stack: Stack<i32> = (1..=3).collect();
        assert_eq!(stack.to_string(), "[1, 2, 3]");
        assert_eq!(Stack::<i32>::new().to_string(), "[]");
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut stack = Stack::new();
        stack.push('a');
        stack.push('b');
        assert_eq!(stack.peek(), Some(&'b'));
        assert_eq!(stack.len(), 2);

        let mut queue = Queue::new();
        queue.enqueue('a');
        queue.enqueue('b');
        assert_eq!(queue.peek(), Some(&'a'));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_reverse_with_stack() {
        assert_eq!(reverse_with_stack("Hello World!"), "!dlroW olleH");
        assert_eq!(reverse_with_stack(""), "");
    }

    #[test]
    fn test_spooler_prints_in_submission_order() {
        let mut spooler = PrintSpooler::new();
        assert_eq!(spooler.submit("Doc1", 2), 1);
        assert_eq!(spooler.submit("Doc2", 5), 2);
        spooler.submit("Doc3", 1);
        assert_eq!(spooler.pending(), 3);
        assert_eq!(spooler.pending_pages(), 8);

        assert_eq!(spooler.print_next().map(|job| job.name), Some("Doc1".to_string()));
        spooler.submit("Doc4", 3);
        let names: Vec<String> = spooler.drain().into_iter().map(|job| job.name).collect();
        assert_eq!(names, ["Doc2", "Doc3", "Doc4"]);
        assert_eq!(spooler.pending(), 0);
        assert!(spooler.print_next().is_none());
    }

    #[tokio::test]
    async fn test_shared_stack_is_lifo() {
        let stack = SharedStack::new();
        for item in ['X', 'Y', 'Z'] {
            stack.put(item).await;
        }
        assert_eq!(stack.get().await, Some('Z'));
        assert_eq!(stack.len().await, 2);
    }
}
