use crate::config::toml_config::GraphConfig;
use crate::core::brackets::{self, BracketStep};
use crate::core::containers::{PrintSpooler, Queue, SharedQueue, SharedStack, Stack, UndoRedo};
use crate::core::graph::{self, Traversal};
use crate::core::rpn;
use crate::core::{Lesson, LessonKind, LessonOutcome, Narrator};
use crate::say;
use crate::utils::error::Result;
use std::collections::{LinkedList, VecDeque};

const RPN_EXAMPLES: [&str; 4] = ["3 4 +", "15 7 1 1 + - *", "5 3 * 2 +", "1 +"];
const TRACED_BRACKETS: &str = "(a + {b * [c - d]})";
const BRACKET_EXAMPLES: [&str; 3] = ["{[()()]}", "(a + [b)]", "{ (x"];
const PRINT_JOBS: [(&str, u32); 3] = [("Doc1", 2), ("Doc2", 5), ("Doc3", 1)];

pub struct StackVsQueueLesson {
    graph: GraphConfig,
}

impl StackVsQueueLesson {
    pub fn new(graph: GraphConfig) -> Self {
        Self { graph }
    }

    fn traversals(&self, out: &mut dyn Narrator) -> Result<()> {
        out.section("GRAPH TRAVERSAL - BFS vs DFS")?;

        let graph = self.graph.build();
        let start = self.graph.start.as_str();
        say!(out)?;
        say!(out, "Graph:")?;
        for line in graph.describe() {
            say!(out, "  {}", line)?;
        }

        say!(out)?;
        say!(out, "BFS (Queue) from {}:", start)?;
        let bfs = graph::bfs(&graph, start)?;
        narrate_traversal(out, &bfs)?;

        say!(out)?;
        say!(out, "DFS (Stack) from {}:", start)?;
        let dfs = graph::dfs(&graph, start)?;
        narrate_traversal(out, &dfs)?;

        let distances = graph::bfs_distances(&graph, start)?;
        say!(out)?;
        say!(out, "BFS visits nodes in order of distance from {}:", start)?;
        for node in &bfs.order {
            if let Some(hops) = distances.get(node) {
                say!(out, "  {}: {} hop(s)", node, hops)?;
            }
        }
        Ok(())
    }
}

fn narrate_traversal(out: &mut dyn Narrator, traversal: &Traversal) -> Result<()> {
    for step in &traversal.steps {
        say!(out, "  Visit {}: frontier = {:?}", step.visited, step.frontier)?;
    }
    say!(out, "  Order: {}", traversal.order.join(" → "))
}

fn fundamental_difference(out: &mut dyn Narrator) -> Result<()> {
    say!(out)?;
    say!(out, "=== LIFO vs FIFO ===")?;
    say!(out)?;

    let items = ["A", "B", "C", "D", "E"];
    let mut stack = Stack::new();
    let mut queue = Queue::new();

    say!(out, "STACK (LIFO - Last In, First Out):")?;
    for item in items {
        stack.push(item);
        say!(out, "  Push {} → {}", item, stack)?;
    }
    let mut popped = Vec::with_capacity(stack.len());
    while let Some(item) = stack.pop() {
        popped.push(item);
    }
    say!(out, "  Pop order: {}", popped.join(" "))?;

    say!(out)?;
    say!(out, "QUEUE (FIFO - First In, First Out):")?;
    for item in items {
        queue.enqueue(item);
        say!(out, "  Enqueue {} → {}", item, queue)?;
    }
    let mut dequeued = Vec::with_capacity(queue.len());
    while let Some(item) = queue.dequeue() {
        dequeued.push(item);
    }
    say!(out, "  Dequeue order: {}", dequeued.join(" "))
}

fn std_collections(out: &mut dyn Narrator) -> Result<()> {
    out.section("STANDARD LIBRARY COLLECTIONS")?;

    say!(out)?;
    say!(out, "1. Vec<T> as a stack (push/pop at the end, O(1)):")?;
    let mut vec_stack = vec![1, 2, 3];
    vec_stack.push(4);
    let top = vec_stack.pop();
    say!(out, "  Popped {:?}, remaining {:?}", top, vec_stack)?;

    say!(out)?;
    say!(out, "2. VecDeque<T> as a queue (ring buffer, O(1) at both ends):")?;
    let mut deque: VecDeque<i32> = (1..=3).collect();
    deque.push_back(4);
    let front = deque.pop_front();
    say!(out, "  Dequeued {:?}, remaining {:?}", front, deque)?;

    say!(out)?;
    say!(out, "3. LinkedList<T> (rarely the right choice):")?;
    let mut list: LinkedList<i32> = LinkedList::new();
    list.push_back(2);
    list.push_front(1);
    list.push_back(3);
    say!(out, "  {:?} - one heap allocation per node, poor cache locality", list)?;

    say!(out)?;
    say!(out, "Vec removing from the front is O(n); use VecDeque for queues.")
}

/// Producers and consumers share the containers through tokio tasks.
async fn thread_safe(out: &mut dyn Narrator) -> Result<()> {
    out.section("THREAD-SAFE CONTAINERS (tokio tasks)")?;

    let stack: SharedStack<u32> = SharedStack::new();
    let queue: SharedQueue<u32> = SharedQueue::new();

    let producer = {
        let stack = stack.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            for item in 1..=5 {
                stack.put(item).await;
                queue.put(item).await;
            }
        })
    };
    producer.await?;

    let consumer = {
        let stack = stack.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            let mut from_stack = Vec::new();
            while let Some(item) = stack.get().await {
                from_stack.push(item);
            }
            let mut from_queue = Vec::new();
            while let Some(item) = queue.get().await {
                from_queue.push(item);
            }
            (from_stack, from_queue)
        })
    };
    let (from_stack, from_queue) = consumer.await?;

    say!(out)?;
    say!(out, "Producer task put 1..=5 into both containers")?;
    say!(out, "  Consumer drained stack: {:?}", from_stack)?;
    say!(out, "  Consumer drained queue: {:?}", from_queue)?;

    let workers: Vec<_> = (0..4u32)
        .map(|worker| {
            let queue = queue.clone();
            tokio::spawn(async move {
                for i in 0..10 {
                    queue.put(worker * 100 + i).await;
                }
            })
        })
        .collect();
    for worker in workers {
        worker.await?;
    }

    say!(out)?;
    say!(out, "4 concurrent producers x 10 items → queue size {}", queue.len().await)?;
    say!(out, "Arc<Mutex<..>> lets every task own a handle to the same queue.")
}

fn deque_both_ends(out: &mut dyn Narrator) -> Result<()> {
    out.section("DEQUE - DOUBLE-ENDED QUEUE")?;

    let mut deque = VecDeque::new();
    say!(out)?;
    deque.push_back(2);
    say!(out, "  push_back(2)  → {:?}", deque)?;
    deque.push_front(1);
    say!(out, "  push_front(1) → {:?}", deque)?;
    deque.push_back(3);
    say!(out, "  push_back(3)  → {:?}", deque)?;

    say!(out)?;
    say!(out, "Pattern matching on Option:")?;
    while let Some(front) = deque.pop_front() {
        match deque.pop_back() {
            Some(back) => say!(out, "  front = {}, back = {}", front, back)?,
            None => say!(out, "  front = {}, back = None (last one)", front)?,
        }
    }
    match deque.pop_front() {
        Some(value) => say!(out, "  Unexpected value {}", value),
        None => say!(out, "  Empty deque returns None - no panic"),
    }
}

fn undo_redo(out: &mut dyn Narrator) -> Result<()> {
    out.section("STACK APPLICATION - UNDO/REDO")?;

    let mut history = UndoRedo::new();
    say!(out)?;
    for action in ["Type 'Hello'", "Type ' World'", "Delete ' World'"] {
        history.apply(action);
        say!(out, "  Do: {}", action)?;
    }

    say!(out)?;
    for _ in 0..2 {
        if let Some(action) = history.undo() {
            say!(out, "  Undo: {}", action)?;
        }
    }
    if let Some(action) = history.redo() {
        say!(out, "  Redo: {}", action)?;
    }

    let applied: Vec<&str> = history.history().copied().collect();
    say!(out)?;
    say!(out, "  History: {:?}", applied)?;
    say!(out, "  Can undo: {}, can redo: {}", history.can_undo(), history.can_redo())
}

fn rpn_calculator(out: &mut dyn Narrator) -> Result<()> {
    out.section("STACK APPLICATION - RPN CALCULATOR")?;
    say!(out)?;
    say!(out, "Reverse Polish Notation pushes numbers and applies operators")?;
    say!(out, "to the top two values of the stack:")?;
    say!(out)?;
    for expression in RPN_EXAMPLES {
        match rpn::evaluate(expression) {
            Ok(value) => say!(out, "  {:<16} = {}", expression, value)?,
            Err(e) => say!(out, "  {:<16} → Error: {}", expression, e)?,
        }
    }
    Ok(())
}

fn bracket_matching(out: &mut dyn Narrator) -> Result<()> {
    out.section("STACK APPLICATION - BRACKET MATCHING")?;
    say!(out)?;
    say!(out, "Expression: {}", TRACED_BRACKETS)?;
    say!(out)?;
    say!(out, "Processing:")?;

    let mut steps = Vec::new();
    let outcome = brackets::check_traced(TRACED_BRACKETS, &mut |step| steps.push(step));
    for step in steps {
        match step {
            BracketStep::Push { opener, position } => {
                say!(out, "  [{}] Found opening '{}' - pushing to stack", position, opener)?
            }
            BracketStep::Match {
                opener,
                closer,
                position,
            } => say!(
                out,
                "  [{}] Found closing '{}' - matches with '{}'",
                position,
                closer,
                opener
            )?,
        }
    }
    match outcome {
        Ok(()) => say!(out, "✓ Expression is balanced!")?,
        Err(e) => say!(out, "✗ Expression is NOT balanced: {}", e)?,
    }

    say!(out)?;
    for expression in BRACKET_EXAMPLES {
        match brackets::check(expression) {
            Ok(()) => say!(out, "  {:<12} balanced", expression)?,
            Err(e) => {
                say!(out, "  {:<12} → {}", expression, e)?;
                say!(out, "  {}^", " ".repeat(e.position()))?;
            }
        }
    }
    let balanced = BRACKET_EXAMPLES
        .iter()
        .filter(|expression| brackets::is_balanced(expression))
        .count();
    say!(out, "  {} of {} examples balanced", balanced, BRACKET_EXAMPLES.len())
}

fn print_spooler(out: &mut dyn Narrator) -> Result<()> {
    out.section("QUEUE APPLICATION - PRINT JOB SPOOLER")?;
    say!(out)?;
    say!(out, "Simulating print jobs arriving...")?;

    let mut spooler = PrintSpooler::new();
    for (name, pages) in PRINT_JOBS {
        let id = spooler.submit(name, pages);
        say!(out, "  Job #{} '{}' submitted ({} page(s))", id, name, pages)?;
    }
    say!(
        out,
        "  {} job(s) waiting, {} page(s) in total",
        spooler.pending(),
        spooler.pending_pages()
    )?;

    say!(out)?;
    say!(out, "Processing jobs in order received (FIFO):")?;
    for job in spooler.drain() {
        say!(out, "  Printing #{} '{}' [DONE]", job.id, job.name)?;
    }
    say!(out, "  Spooler empty: {}", spooler.pending() == 0)
}

#[async_trait::async_trait]
impl Lesson for StackVsQueueLesson {
    fn kind(&self) -> LessonKind {
        LessonKind::StackVsQueue
    }

    async fn run(&self, narrator: &mut dyn Narrator) -> Result<LessonOutcome> {
        tracing::debug!("Stack vs queue lesson starting from node {}", self.graph.start);
        narrator.banner(self.title())?;
        fundamental_difference(narrator)?;
        std_collections(narrator)?;
        thread_safe(narrator).await?;
        deque_both_ends(narrator)?;
        undo_redo(narrator)?;
        self.traversals(narrator)?;
        rpn_calculator(narrator)?;
        bracket_matching(narrator)?;
        print_spooler(narrator)?;
        narrator.insights(
            "KEY RUST INSIGHTS:",
            &[
                "Vec<T> is the idiomatic stack",
                "VecDeque<T> is the idiomatic queue",
                "Option<T> makes empty containers explicit",
                "Arc<Mutex<T>> shares containers across tasks",
                "BFS uses a queue, DFS uses a stack",
                "Stacks match nested brackets, queues keep jobs fair",
            ],
        )?;
        Ok(LessonOutcome::default())
    }
}
