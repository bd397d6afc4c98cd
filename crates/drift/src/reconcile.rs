use super::{explain, Mismatch};
use anyhow::Context;
use models::{PolicySpec, PolicyStatus};

/// Reason for which a policy must be upserted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The policy has not been successfully applied before.
    NeverApplied,
    /// The desired spec drifted from the last-applied spec.
    Drifted(Mismatch),
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::NeverApplied => f.write_str("never applied"),
            Reason::Drifted(mismatch) => std::fmt::Display::fmt(mismatch, f),
        }
    }
}

/// Verdict of a reconcile pass comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The remote policy already matches the desired spec.
    NoOp,
    /// The desired spec must be upserted into the remote policy.
    Upsert { reason: Reason },
}

/// Decide whether `desired` must be upserted, given the `status` of its last application.
pub fn decide(desired: &PolicySpec, status: &PolicyStatus) -> Verdict {
    let Some(applied) = &status.applied_spec else {
        return Verdict::Upsert {
            reason: Reason::NeverApplied,
        };
    };
    match explain(desired, applied) {
        None => Verdict::NoOp,
        Some(mismatch) => Verdict::Upsert {
            reason: Reason::Drifted(mismatch),
        },
    }
}

/// AlertsClient applies policies to the remote alerting API.
/// Implementations own any timeout and retry policy of their calls.
pub trait AlertsClient: Send + Sync {
    /// Create or update the remote policy from `spec`, returning its remote identifier.
    /// `policy_id` is the identifier of a previous application, if there was one.
    fn upsert_policy<'s>(
        &'s self,
        spec: &'s PolicySpec,
        policy_id: Option<i64>,
    ) -> impl std::future::Future<Output = anyhow::Result<i64>> + Send + 's;
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The policy was already converged and nothing was applied.
    Converged,
    /// The policy was upserted.
    Applied { policy_id: i64 },
}

pub struct Reconciler<C> {
    client: C,
}

impl<C: AlertsClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run a single reconcile pass of `desired`, updating `status` if
    /// the policy is applied. `status` is unchanged if application fails.
    #[tracing::instrument(
        err(Debug, level = tracing::Level::WARN),
        skip_all,
        fields(policy = %desired.name, policy_id = ?status.policy_id),
    )]
    pub async fn reconcile(
        &self,
        desired: &PolicySpec,
        status: &mut PolicyStatus,
    ) -> anyhow::Result<Outcome> {
        let reason = match decide(desired, status) {
            Verdict::NoOp => {
                tracing::debug!("policy is converged");
                return Ok(Outcome::Converged);
            }
            Verdict::Upsert { reason } => reason,
        };
        tracing::info!(%reason, "upserting drifted policy");

        let policy_id = self
            .client
            .upsert_policy(desired, status.policy_id)
            .await
            .with_context(|| format!("upserting alert policy {}", desired.name))?;

        status.applied_spec = Some(desired.clone());
        status.policy_id = Some(policy_id);

        Ok(Outcome::Applied { policy_id })
    }
}
