use super::{IncidentPreference, NrqlConditionSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A PolicySpec declares an alert policy and the conditions which belong to it.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
#[schemars(example = PolicySpec::example())]
pub struct PolicySpec {
    /// # How violations of the policy's conditions are grouped into incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_preference: Option<IncidentPreference>,
    /// # Display name of the policy.
    pub name: String,
    /// # Inline API key used to manage the policy.
    /// Prefer `api_key_secret` outside of development.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// # Secret which holds the API key.
    #[serde(skip_serializing_if = "ApiKeySecret::is_empty")]
    pub api_key_secret: ApiKeySecret,
    /// # Region of the remote alerting API, such as "us" or "eu".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    /// # Conditions of the policy, in authored order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<PolicyCondition>,
}

/// Location of an API key within a secret store.
/// The key itself is never resolved by this crate.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq, Eq, Hash)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ApiKeySecret {
    /// # Name of the secret.
    pub name: String,
    /// # Namespace of the secret.
    pub namespace: String,
    /// # Key within the secret's data which holds the API key.
    pub key_name: String,
}

impl ApiKeySecret {
    pub fn is_empty(&self) -> bool {
        let ApiKeySecret {
            name,
            namespace,
            key_name,
        } = self;

        name.is_empty() && namespace.is_empty() && key_name.is_empty()
    }
}

/// A condition of a policy, wrapping the definition which is sent to the
/// remote API together with the identity of the local object it came from.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct PolicyCondition {
    /// # Name of the local condition object.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// # Namespace of the local condition object.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// # Definition of the condition.
    pub spec: NrqlConditionSpec,
}

impl PolicySpec {
    pub fn example() -> Self {
        Self {
            incident_preference: Some(IncidentPreference::PerPolicy),
            name: "test-policy".to_string(),
            api_key: "112233".to_string(),
            api_key_secret: ApiKeySecret {
                name: "secret".to_string(),
                namespace: "default".to_string(),
                key_name: "api-key".to_string(),
            },
            region: "us".to_string(),
            conditions: vec![PolicyCondition::example()],
        }
    }

    /// JSON schema of a PolicySpec document.
    pub fn root_json_schema() -> schemars::Schema {
        let settings = schemars::generate::SchemaSettings::draft2019_09();
        let generator = schemars::SchemaGenerator::new(settings);
        generator.into_root_schema_for::<Self>()
    }
}

impl PolicyCondition {
    pub fn example() -> Self {
        Self {
            name: "policy-name".to_string(),
            namespace: "default".to_string(),
            spec: NrqlConditionSpec::example(),
        }
    }
}
