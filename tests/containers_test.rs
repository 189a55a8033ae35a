use stack_lessons::core::brackets::{self, BracketError};
use stack_lessons::core::containers::{
    reverse_with_stack, PrintSpooler, Queue, SharedQueue, SharedStack, Stack, UndoRedo,
};
use stack_lessons::core::rpn::{self, RpnError};

#[test]
fn test_stack_is_lifo_and_queue_is_fifo() {
    let mut stack: Stack<char> = "ABCDE".chars().collect();
    let mut queue: Queue<char> = "ABCDE".chars().collect();

    let popped: String = std::iter::from_fn(|| stack.pop()).collect();
    let dequeued: String = std::iter::from_fn(|| queue.dequeue()).collect();

    assert_eq!(popped, "EDCBA");
    assert_eq!(dequeued, "ABCDE");
    assert!(stack.pop().is_none());
    assert!(queue.dequeue().is_none());
}

#[test]
fn test_bury_and_unbury() {
    assert_eq!(reverse_with_stack("Hello World!"), "!dlroW olleH");
    assert_eq!(reverse_with_stack(&reverse_with_stack("Bury")), "Bury");
    assert_eq!(reverse_with_stack(""), "");
}

#[test]
fn test_new_action_clears_redo() {
    let mut history = UndoRedo::new();
    history.apply("type a");
    history.apply("type b");
    assert_eq!(history.undo(), Some(&"type b"));
    assert!(history.can_redo());

    history.apply("type c");
    assert!(!history.can_redo());
    assert_eq!(history.redo(), None);
    assert_eq!(history.history().copied().collect::<Vec<_>>(), ["type a", "type c"]);
}

#[test]
fn test_rpn_examples() {
    assert_eq!(rpn::evaluate("3 4 +"), Ok(7));
    assert_eq!(rpn::evaluate("15 7 1 1 + - *"), Ok(75));
    assert_eq!(rpn::evaluate("5 3 * 2 +"), Ok(17));
    assert_eq!(rpn::evaluate("1 +"), Err(RpnError::StackUnderflow { operator: '+' }));
    assert_eq!(rpn::evaluate("4 0 /"), Err(RpnError::DivisionByZero));
    assert_eq!(rpn::evaluate("1 2"), Err(RpnError::LeftoverOperands(2)));
}

#[tokio::test]
async fn test_shared_containers_across_tasks() {
    let stack = SharedStack::new();
    let queue = SharedQueue::new();

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let stack = stack.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                for i in 0..25 {
                    stack.put(worker * 100 + i).await;
                    queue.put(worker * 100 + i).await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(stack.len().await, 100);
    assert_eq!(queue.len().await, 100);

    let mut drained = Vec::new();
    while let Some(item) = queue.get().await {
        drained.push(item);
    }
    drained.sort_unstable();
    drained.dedup();
    assert_eq!(drained.len(), 100);
    assert!(queue.is_empty().await);
}

#[test]
fn test_bracket_matching() {
    assert!(brackets::is_balanced("(a + {b * [c - d]})"));

    let mismatched = brackets::check("{[(])}").unwrap_err();
    assert!(matches!(
        mismatched,
        BracketError::Mismatched { found: ']', expected: ')', position: 3 }
    ));
    assert!(!brackets::is_balanced("{[(])}"));

    let unclosed = brackets::check("((a)").unwrap_err();
    assert_eq!(unclosed, BracketError::Unclosed { opener: '(', position: 0 });
    assert_eq!(unclosed.position(), 0);

    assert_eq!(brackets::check("]").unwrap_err().position(), 0);
}

#[test]
fn test_print_spooler_is_fifo() {
    let mut spooler = PrintSpooler::new();
    for (name, pages) in [("Doc1", 2), ("Doc2", 5), ("Doc3", 1)] {
        spooler.submit(name, pages);
    }
    let printed: Vec<(usize, String)> = spooler
        .drain()
        .into_iter()
        .map(|job| (job.id, job.name))
        .collect();
    assert_eq!(
        printed,
        [(1, "Doc1".to_string()), (2, "Doc2".to_string()), (3, "Doc3".to_string())]
    );
}
