//! Typed moderation verdict shared by all listeners in a dispatch.
//!
//! Independent moderation listeners used to coordinate through ad-hoc
//! string keys on a shared map, with later writes silently overwriting
//! earlier ones. The verdict replaces that convention: each listener
//! contributes a [`Decision`] through [`ModerationVerdict::record`], and a
//! fixed merge precedence decides the outcome regardless of registration
//! order. Destroy wins over an explicit hold, which wins over an explicit
//! approval, which wins over abstention.

use serde::{Deserialize, Serialize};

/// A single listener's contribution to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Explicitly allow immediate publication.
    Approve,
    /// Flag the response for the human moderation queue.
    Hold,
    /// Discard the response outright, superseding any queue flag.
    Destroy,
}

/// Final routing for a submission once every listener has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Persist in the approved, published state.
    Publish,
    /// Persist in the pending state for human review.
    HoldForModeration,
    /// Do not persist at all.
    Discard,
}

/// Accumulated moderation consensus for one submission dispatch.
///
/// One instance is created per submission event and mutated in place by
/// the listener chain; it is never shared across dispatches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Explicit approval state: `Some(true)` approve, `Some(false)` hold,
    /// `None` when no listener has spoken.
    approved: Option<bool>,

    /// Whether any listener asked for outright destruction.
    destroy: bool,

    /// Ids of every listener that contributed a decision, in order.
    contributed_by: Vec<String>,
}

impl ModerationVerdict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one listener's decision into the verdict.
    ///
    /// Precedence: `Destroy` is sticky; `Hold` overwrites an earlier
    /// `Approve`; `Approve` never overwrites an earlier `Hold`. Every
    /// contribution is attributed, including ones the merge ignores.
    pub fn record(&mut self, listener_id: &str, decision: Decision) {
        match decision {
            Decision::Destroy => {
                self.destroy = true;
            }
            Decision::Hold => {
                self.approved = Some(false);
            }
            Decision::Approve => {
                if self.approved.is_none() {
                    self.approved = Some(true);
                }
            }
        }

        self.contributed_by.push(listener_id.to_string());
    }

    /// Explicit approval state, if any listener has spoken.
    pub fn approved(&self) -> Option<bool> {
        self.approved
    }

    /// Whether destruction has been requested.
    pub fn destroy(&self) -> bool {
        self.destroy
    }

    /// True when no listener has contributed any decision.
    pub fn is_abstained(&self) -> bool {
        self.approved.is_none() && !self.destroy
    }

    /// Listeners that contributed, in contribution order.
    pub fn contributed_by(&self) -> &[String] {
        &self.contributed_by
    }

    /// Resolve the final routing for the submission.
    ///
    /// Destroy is checked with higher precedence than the approval state;
    /// a submission nobody objected to publishes immediately.
    pub fn disposition(&self) -> Disposition {
        if self.destroy {
            Disposition::Discard
        } else if self.approved == Some(false) {
            Disposition::HoldForModeration
        } else {
            Disposition::Publish
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstain_publishes() {
        let verdict = ModerationVerdict::new();
        assert!(verdict.is_abstained());
        assert_eq!(verdict.disposition(), Disposition::Publish);
    }

    #[test]
    fn test_hold_overrides_approve_in_either_order() {
        let mut verdict = ModerationVerdict::new();
        verdict.record("akismet", Decision::Approve);
        verdict.record("ip-address", Decision::Hold);
        assert_eq!(verdict.disposition(), Disposition::HoldForModeration);

        let mut verdict = ModerationVerdict::new();
        verdict.record("ip-address", Decision::Hold);
        verdict.record("akismet", Decision::Approve);
        assert_eq!(verdict.disposition(), Disposition::HoldForModeration);
        assert_eq!(verdict.approved(), Some(false));
    }

    #[test]
    fn test_destroy_wins_over_everything() {
        let mut verdict = ModerationVerdict::new();
        verdict.record("akismet", Decision::Approve);
        verdict.record("spam-phrase", Decision::Destroy);
        verdict.record("akismet", Decision::Approve);

        assert!(verdict.destroy());
        assert_eq!(verdict.disposition(), Disposition::Discard);
    }

    #[test]
    fn test_destroy_with_explicit_approval_still_discards() {
        let mut verdict = ModerationVerdict::new();
        verdict.record("a", Decision::Destroy);
        verdict.record("b", Decision::Approve);

        assert_eq!(verdict.approved(), Some(true));
        assert_eq!(verdict.disposition(), Disposition::Discard);
    }

    #[test]
    fn test_contributions_are_attributed_in_order() {
        let mut verdict = ModerationVerdict::new();
        verdict.record("spam-phrase", Decision::Hold);
        verdict.record("link-spam", Decision::Hold);
        verdict.record("akismet", Decision::Approve);

        assert_eq!(
            verdict.contributed_by(),
            &["spam-phrase", "link-spam", "akismet"]
        );
    }
}
