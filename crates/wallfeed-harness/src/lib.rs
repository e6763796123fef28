//! Deterministic simulation harness for wall client testing.
//!
//! [`SimServer`] is an in-memory wall that implements
//! [`wallfeed_client::Transport`], so the real negotiator, fetcher, store and
//! composer run against it unchanged. Failures are injected per endpoint or
//! at random through [`ChaoticTransport`].
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties over a [`FeedTrace`],
//! the sequence of store snapshots recorded by a [`Tracer`]. Use
//! [`InvariantRegistry::standard()`] for the feed's core guarantees.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chaotic;
pub mod invariants;
pub mod sim_server;
pub mod trace;

pub use chaotic::ChaoticTransport;
pub use invariants::{
    AppendOnlyGrowth, ErrorReflectsOutcome, FailureLeavesFeedUntouched, FeedSnapshot,
    HasMoreMatchesTotal, IdleBetweenOperations, Invariant, InvariantRegistry, InvariantResult,
    PageCursorAdvance, ResetLoadsFirstPage, SkipOnlyWhenExhausted, Violation,
};
pub use sim_server::{Method, Request, SimServer};
pub use trace::{FeedOp, FeedTrace, Step, Tracer};
