//! One confirmation gate shared by every finalize action. When the selection
//! is incomplete the action is parked in a `PendingConfirmation` until the
//! user answers; declining drops it without running anything.

use tracing::{debug, info};

use super::completion::Completion;

/// Result of asking the gate whether an action may run.
#[derive(Debug, PartialEq, Eq)]
pub enum Gate<A> {
    Proceed(A),
    Confirm(PendingConfirmation<A>),
}

/// An action waiting on a yes/no answer.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingConfirmation<A> {
    action: A,
    remaining: usize,
    total: usize,
}

impl<A> PendingConfirmation<A> {
    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn prompt(&self) -> String {
        format!(
            "You have not selected songs for {} of {} moments. Do you want to continue anyway?",
            self.remaining, self.total
        )
    }

    /// Hand the action back on an affirmative answer, drop it otherwise.
    pub fn resolve(self, confirmed: bool) -> Option<A> {
        if confirmed {
            info!(remaining = self.remaining, "incomplete selection confirmed");
            Some(self.action)
        } else {
            info!(remaining = self.remaining, "finalize cancelled at confirmation");
            None
        }
    }
}

/// Let `action` through when the selection is complete or gating is off;
/// otherwise park it behind a confirmation.
pub fn guard<A>(action: A, completion: Completion, gated: bool) -> Gate<A> {
    if completion.is_complete || !gated {
        debug!(complete = completion.is_complete, gated, "gate open");
        return Gate::Proceed(action);
    }
    Gate::Confirm(PendingConfirmation {
        action,
        remaining: completion.remaining(),
        total: completion.total,
    })
}

/// Outcome of a synchronously gated call.
#[derive(Debug, PartialEq, Eq)]
pub enum Gated<T> {
    Performed(T),
    Cancelled,
}

/// Synchronous form of `guard`: `confirm` is asked only when needed, and
/// `action` runs at most once.
pub fn guard_with<T, C, F>(completion: Completion, gated: bool, confirm: C, action: F) -> Gated<T>
where
    C: FnOnce(&PendingConfirmation<F>) -> bool,
    F: FnOnce() -> T,
{
    match guard(action, completion, gated) {
        Gate::Proceed(action) => Gated::Performed(action()),
        Gate::Confirm(pending) => {
            let confirmed = confirm(&pending);
            match pending.resolve(confirmed) {
                Some(action) => Gated::Performed(action()),
                None => Gated::Cancelled,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn completion(selected: usize) -> Completion {
        Completion {
            selected,
            total: 9,
            percent: 0,
            is_complete: selected == 9,
        }
    }

    #[test]
    fn complete_selection_proceeds_immediately() {
        assert_eq!(guard("download", completion(9), true), Gate::Proceed("download"));
    }

    #[test]
    fn ungated_calls_proceed_even_when_incomplete() {
        assert_eq!(guard("share", completion(2), false), Gate::Proceed("share"));
    }

    #[test]
    fn incomplete_selection_asks_and_reports_remaining() {
        let Gate::Confirm(pending) = guard("submit", completion(6), true) else {
            panic!("expected a confirmation");
        };
        assert_eq!(pending.remaining(), 3);
        assert_eq!(pending.action(), &"submit");
        assert!(pending.prompt().contains("3 of 9 moments"));
        assert_eq!(pending.resolve(true), Some("submit"));
    }

    #[test]
    fn one_missing_moment_still_asks() {
        let Gate::Confirm(pending) = guard((), completion(8), true) else {
            panic!("expected a confirmation");
        };
        assert_eq!(pending.remaining(), 1);
        assert!(pending.prompt().contains("1 of 9 moments"));
    }

    #[test]
    fn declining_runs_nothing() {
        let prompts = Cell::new(0);
        let runs = Cell::new(0);

        let outcome = guard_with(
            completion(4),
            true,
            |_| {
                prompts.set(prompts.get() + 1);
                false
            },
            || runs.set(runs.get() + 1),
        );

        assert_eq!(outcome, Gated::Cancelled);
        assert_eq!(prompts.get(), 1);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn confirming_runs_once() {
        let prompts = Cell::new(0);
        let outcome = guard_with(
            completion(1),
            true,
            |_| {
                prompts.set(prompts.get() + 1);
                true
            },
            || 42,
        );
        assert_eq!(outcome, Gated::Performed(42));
        assert_eq!(prompts.get(), 1);
    }

    #[test]
    fn complete_selection_never_prompts() {
        let outcome = guard_with(completion(9), true, |_| panic!("should not ask"), || "done");
        assert_eq!(outcome, Gated::Performed("done"));
    }
}
