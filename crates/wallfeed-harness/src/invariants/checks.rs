//! Standard feed invariants.
//!
//! Every check assumes the trace was recorded by a [`crate::Tracer`], which
//! applies one operation at a time, so no fetch is in flight between steps.

use wallfeed_app::{FetchMode, FetchOutcome, MergePolicy};

use super::{Invariant, InvariantResult, Violation};
use crate::{FeedOp, FeedTrace, Step};

fn violation(invariant: &'static str, index: usize, step: &Step, detail: String) -> Violation {
    Violation {
        invariant,
        message: format!("step {index} ({:?} -> {:?}): {detail}", step.op, step.outcome),
    }
}

fn each_step(
    name: &'static str,
    trace: &FeedTrace,
    check: impl Fn(&Step) -> Option<String>,
) -> InvariantResult {
    for (index, step) in trace.steps.iter().enumerate() {
        if let Some(detail) = check(step) {
            return Err(violation(name, index, step, detail));
        }
    }
    Ok(())
}

fn is_append(op: FeedOp) -> bool {
    matches!(op, FeedOp::LoadMore | FeedOp::FetchPage { mode: FetchMode::Append, .. })
}

/// After a successful merge, `has_more` is true iff the feed holds fewer
/// records than the server reported.
///
/// A deduplicating feed may also end short of the total, once its fetched
/// offsets reach it, so only `has_more => loaded < total` is checked there.
pub struct HasMoreMatchesTotal;

impl Invariant for HasMoreMatchesTotal {
    fn name(&self) -> &'static str {
        "HasMoreMatchesTotal"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            let FetchOutcome::Merged { .. } = step.outcome else { return None };
            let after = &step.after;
            let below_total = after.loaded() < after.total_messages;
            let holds = match trace.policy {
                MergePolicy::Append => after.has_more == below_total,
                MergePolicy::DedupById => !after.has_more || below_total,
            };

            (!holds).then(|| {
                format!(
                    "has_more = {} with {} loaded of {}",
                    after.has_more,
                    after.loaded(),
                    after.total_messages
                )
            })
        })
    }
}

/// An append merge keeps the existing feed as a prefix and adds exactly the
/// reported number of records.
pub struct AppendOnlyGrowth;

impl Invariant for AppendOnlyGrowth {
    fn name(&self) -> &'static str {
        "AppendOnlyGrowth"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            let FetchOutcome::Merged { added } = step.outcome else { return None };
            if !is_append(step.op) {
                return None;
            }

            let (before, after) = (&step.before.ids, &step.after.ids);
            if !after.starts_with(before) {
                return Some(format!("feed {before:?} is not a prefix of {after:?}"));
            }
            (after.len() - before.len() != added)
                .then(|| format!("reported {added} added, feed grew by {}", after.len() - before.len()))
        })
    }
}

/// A failed or skipped operation leaves the feed and cursor as they were.
///
/// `reset_and_load` is exempt: it clears the feed before fetching.
pub struct FailureLeavesFeedUntouched;

impl Invariant for FailureLeavesFeedUntouched {
    fn name(&self) -> &'static str {
        "FailureLeavesFeedUntouched"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            if matches!(step.outcome, FetchOutcome::Merged { .. }) || step.op == FeedOp::ResetAndLoad {
                return None;
            }

            let (before, after) = (&step.before, &step.after);
            if before.ids != after.ids {
                return Some(format!("feed changed from {:?} to {:?}", before.ids, after.ids));
            }
            if before.current_page != after.current_page {
                return Some(format!(
                    "current_page moved {} -> {}",
                    before.current_page, after.current_page
                ));
            }
            (before.has_more != after.has_more || before.total_messages != after.total_messages)
                .then(|| "pagination totals changed".to_string())
        })
    }
}

/// A successful merge leaves the cursor on the page that was fetched.
pub struct PageCursorAdvance;

impl Invariant for PageCursorAdvance {
    fn name(&self) -> &'static str {
        "PageCursorAdvance"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            let FetchOutcome::Merged { .. } = step.outcome else { return None };
            let expected = match step.op {
                FeedOp::LoadMore => step.before.current_page + 1,
                FeedOp::FetchPage { page, .. } => page,
                FeedOp::ResetAndLoad => 1,
            };

            (step.after.current_page != expected)
                .then(|| format!("current_page {} expected {expected}", step.after.current_page))
        })
    }
}

/// Between sequential operations no fetch is in flight.
pub struct IdleBetweenOperations;

impl Invariant for IdleBetweenOperations {
    fn name(&self) -> &'static str {
        "IdleBetweenOperations"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            let after = &step.after;
            (after.loading || after.refreshing).then(|| {
                format!("loading = {}, refreshing = {} after completion", after.loading, after.refreshing)
            })
        })
    }
}

/// A successful reset holds at most one page, on page 1.
pub struct ResetLoadsFirstPage;

impl Invariant for ResetLoadsFirstPage {
    fn name(&self) -> &'static str {
        "ResetLoadsFirstPage"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            if step.op != FeedOp::ResetAndLoad || !matches!(step.outcome, FetchOutcome::Merged { .. })
            {
                return None;
            }

            let after = &step.after;
            if after.loaded() > after.page_size {
                return Some(format!("{} loaded with page size {}", after.loaded(), after.page_size));
            }
            (after.current_page != 1).then(|| format!("current_page {}", after.current_page))
        })
    }
}

/// `error` is cleared by success, set by failure and untouched by a skip.
pub struct ErrorReflectsOutcome;

impl Invariant for ErrorReflectsOutcome {
    fn name(&self) -> &'static str {
        "ErrorReflectsOutcome"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            let error = &step.after.error;
            match step.outcome {
                FetchOutcome::Merged { .. } => {
                    error.as_ref().map(|e| format!("error {e:?} after success"))
                },
                FetchOutcome::Failed => error.is_none().then(|| "no error after failure".to_string()),
                FetchOutcome::Skipped => (error != &step.before.error)
                    .then(|| format!("skip changed error {:?} -> {error:?}", step.before.error)),
            }
        })
    }
}

/// With nothing in flight, `load_more` declines exactly when the feed is
/// exhausted.
pub struct SkipOnlyWhenExhausted;

impl Invariant for SkipOnlyWhenExhausted {
    fn name(&self) -> &'static str {
        "SkipOnlyWhenExhausted"
    }

    fn check(&self, trace: &FeedTrace) -> InvariantResult {
        each_step(self.name(), trace, |step| {
            if step.op != FeedOp::LoadMore {
                return None;
            }

            let skipped = step.outcome == FetchOutcome::Skipped;
            (skipped == step.before.has_more).then(|| {
                format!("skipped = {skipped} with has_more = {}", step.before.has_more)
            })
        })
    }
}
