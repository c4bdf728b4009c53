//! Navigation Decisions
//!
//! Decides whether a finished upload should carry the operator straight to
//! the analysis view. Each produced outcome is tagged with a token; the
//! controller records tokens it has decided on, so re-evaluating the same
//! outcome instance can never emit a second intent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::outcome::{OutcomeToken, TrackedOutcome, UploadOutcome};

/// An instruction to move the operator somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum NavigationIntent {
    /// Open the analysis view for the given invoice
    Analysis { invoice_id: i64 },
}

/// Decides on auto-navigation from upload outcomes.
#[derive(Debug, Default)]
pub struct NavigationController {
    consumed: HashSet<OutcomeToken>,
}

impl NavigationController {
    /// Create a controller with no consumed outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether this outcome triggers auto-navigation.
    ///
    /// Produces exactly one intent when the outcome is `Stored` and the
    /// operator wants immediate analysis. Any first decision, intent or
    /// not, consumes the outcome: deciding again on the same instance
    /// yields `None`.
    pub fn decide(
        &mut self,
        outcome: &TrackedOutcome,
        auto_analyze: bool,
    ) -> Option<NavigationIntent> {
        if !self.consumed.insert(outcome.token) {
            return None;
        }
        match &outcome.outcome {
            UploadOutcome::Stored { invoice_id, .. } if auto_analyze => {
                Some(NavigationIntent::Analysis {
                    invoice_id: *invoice_id,
                })
            }
            _ => None,
        }
    }

    /// Whether an outcome instance has already been decided on.
    pub fn is_consumed(&self, token: OutcomeToken) -> bool {
        self.consumed.contains(&token)
    }
}
