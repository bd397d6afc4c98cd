//! Drift detection of alert policies.
//!
//! A reconciler compares the policy it desires against the policy it last
//! applied, and upserts the remote policy only if the two are not equivalent.
//! Equivalence ignores the local identity of each condition, and compares
//! condition definitions by their [`Fingerprint`].

mod compare;
mod fingerprint;
mod reconcile;

pub use compare::{conditions_equal, explain, policies_equal, Equivalent, Mismatch};
pub use fingerprint::{fingerprint, Fingerprint, Inclusion, FIELDS};
pub use reconcile::{decide, AlertsClient, Outcome, Reason, Reconciler, Verdict};
