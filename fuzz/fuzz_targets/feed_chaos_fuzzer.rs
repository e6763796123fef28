//! Fuzz target for the feed store under transport failures
//!
//! Drives a store against the simulated wall through a chaotic transport.
//! Wall size, page size, failure rate and the operation sequence all come
//! from the fuzzer.
//!
//! # Invariants
//!
//! - The store NEVER panics on transport or decode failures
//! - Failed operations leave the feed and page cursor untouched
//! - Every trace satisfies the standard invariant registry

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wallfeed_app::{FeedConfig, FetchMode, MergePolicy, MessageFeedStore};
use wallfeed_harness::{ChaoticTransport, FeedOp, InvariantRegistry, SimServer, Tracer};

#[derive(Debug, Clone, Arbitrary)]
struct ChaosScenario {
    /// Seed for ChaoticTransport RNG (deterministic failures)
    chaos_seed: u64,
    /// Failure rate 0-9 maps to 0%-90%
    failure_rate_tenth: u8,
    /// Messages on the wall
    total: u8,
    /// Page size reported by the server; 0 reports none
    page_size: u8,
    /// Serve bare arrays instead of `{ data, total }`
    bare_format: bool,
    /// Use DedupById instead of Append
    dedup: bool,
    /// Sequence of operations to perform
    operations: Vec<ChaosOperation>,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum ChaosOperation {
    LoadMore,
    ResetAndLoad,
    Refresh { page: u8 },
    Append { page: u8 },
}

impl ChaosOperation {
    fn to_op(self) -> FeedOp {
        match self {
            Self::LoadMore => FeedOp::LoadMore,
            Self::ResetAndLoad => FeedOp::ResetAndLoad,
            Self::Refresh { page } => FeedOp::FetchPage { page: usize::from(page), mode: FetchMode::Refresh },
            Self::Append { page } => FeedOp::FetchPage { page: usize::from(page), mode: FetchMode::Append },
        }
    }
}

fuzz_target!(|scenario: ChaosScenario| {
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().enable_time().build() else {
        return;
    };

    let server = SimServer::with_messages(u64::from(scenario.total));
    server.set_page_size((scenario.page_size > 0).then_some(u64::from(scenario.page_size)));
    server.set_bare_format(scenario.bare_format);

    let failure_rate = f64::from(scenario.failure_rate_tenth % 10) / 10.0;
    let transport = ChaoticTransport::with_seed(server, failure_rate, scenario.chaos_seed);

    let policy = if scenario.dedup { MergePolicy::DedupById } else { MergePolicy::Append };
    let store = MessageFeedStore::new(transport, FeedConfig::default().with_merge_policy(policy));

    runtime.block_on(async {
        let mut tracer = Tracer::new(&store);
        for operation in scenario.operations.iter().take(64) {
            tracer.apply(operation.to_op()).await;
        }
        InvariantRegistry::standard().assert_all(tracer.trace(), "under fuzzed chaos");
    });
});
