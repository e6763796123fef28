//! Invariant checking over recorded feed traces.
//!
//! Invariants are properties that must hold after every store operation,
//! whatever the server returns. Unlike example-based tests that check
//! specific scenarios, they are run against traces of random operation
//! sequences with random injected faults.
//!
//! # Usage
//!
//! ```ignore
//! let mut tracer = Tracer::new(&store);
//! tracer.apply(FeedOp::LoadMore).await;
//! InvariantRegistry::standard().check_all(tracer.trace())?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    AppendOnlyGrowth, ErrorReflectsOutcome, FailureLeavesFeedUntouched, HasMoreMatchesTotal,
    IdleBetweenOperations, PageCursorAdvance, ResetLoadsFirstPage, SkipOnlyWhenExhausted,
};
pub use snapshot::FeedSnapshot;

use crate::FeedTrace;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property checked against a recorded trace.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against every step of `trace`.
    fn check(&self, trace: &FeedTrace) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Registry with every feed invariant.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(HasMoreMatchesTotal);
        registry.add(AppendOnlyGrowth);
        registry.add(FailureLeavesFeedUntouched);
        registry.add(PageCursorAdvance);
        registry.add(IdleBetweenOperations);
        registry.add(ResetLoadsFirstPage);
        registry.add(ErrorReflectsOutcome);
        registry.add(SkipOnlyWhenExhausted);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against `trace`.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, trace: &FeedTrace) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(trace).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation found.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, trace: &FeedTrace, context: &str) {
        if let Err(violations) = self.check_all(trace) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
