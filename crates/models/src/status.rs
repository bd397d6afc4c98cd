use super::PolicySpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Status of a policy, as recorded by its reconciler.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct PolicyStatus {
    /// # Spec which was last applied to the remote API.
    /// Absent if the policy has never been successfully applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_spec: Option<PolicySpec>,
    /// # Identifier of the policy within the remote API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<i64>,
}
