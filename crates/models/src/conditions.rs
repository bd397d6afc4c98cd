use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An NRQL alert condition, as it's sent to the remote alerting API.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct NrqlConditionSpec {
    /// # Threshold terms of the condition.
    /// Terms are evaluated in the order they're authored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<ConditionTerm>,
    /// # NRQL query which is evaluated by the condition.
    pub nrql: NrqlQuery,
    /// # Type of the condition.
    /// For example "NRQL" or "STATIC".
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub condition_type: String,
    /// # Display name of the condition.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// # URL of a runbook for responders.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub runbook_url: String,
    /// # Function applied to query results before threshold evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_function: Option<ValueFunction>,
    /// # Identifier of the condition within the remote system.
    #[serde(skip_serializing_if = "super::is_zero")]
    pub id: i64,
    /// # Duration after which open violations are force-closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_time_limit: Option<ViolationTimeLimit>,
    /// # Number of facet groups the query is expected to return.
    #[serde(skip_serializing_if = "super::is_zero")]
    pub expected_groups: i32,
    /// # Ignore overlapping facet groups.
    #[serde(skip_serializing_if = "super::is_false")]
    pub ignore_overlap: bool,
    /// # Is the condition enabled?
    #[serde(skip_serializing_if = "super::is_false")]
    pub enabled: bool,
    /// # Remote policy which this condition is adopted into.
    /// Used when the condition attaches to a policy that wasn't created
    /// by this operator.
    #[serde(skip_serializing_if = "super::is_zero")]
    pub existing_policy_id: i64,
}

/// A single threshold term of a condition.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ConditionTerm {
    /// # Comparison of query results against the threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<TermOperator>,
    /// # Priority of violations opened by this term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// # Threshold value, as a decimal string.
    // Left as a string: parsing belongs to admission validation, and a
    // re-rendered float would not compare stably.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub threshold: String,
    /// # Seconds the threshold must be breached before a violation opens.
    #[serde(skip_serializing_if = "super::is_zero")]
    pub threshold_duration: i32,
    /// # How many breaches within the duration open a violation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_occurrences: Option<ThresholdOccurrence>,
    /// # Time function of the term, such as "all" or "any".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_function: String,
}

/// The query clause of an NRQL condition.
#[derive(Serialize, Deserialize, Debug, Default, JsonSchema, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct NrqlQuery {
    /// # NRQL query text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    /// # Minutes by which evaluation lags the current time.
    #[serde(skip_serializing_if = "super::is_zero")]
    pub evaluation_offset: i32,
}

macro_rules! remote_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Wire name of this value, as used by the remote API.
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

remote_enum! {
    /// How open violations are grouped into incidents.
    pub enum IncidentPreference {
        PerPolicy => "PER_POLICY",
        PerCondition => "PER_CONDITION",
        PerConditionAndTarget => "PER_CONDITION_AND_TARGET",
    }
}

remote_enum! {
    pub enum TermOperator {
        Above => "ABOVE",
        Below => "BELOW",
        Equal => "EQUAL",
    }
}

remote_enum! {
    pub enum Priority {
        Critical => "CRITICAL",
        Warning => "WARNING",
    }
}

remote_enum! {
    pub enum ThresholdOccurrence {
        /// Every data point within the duration breaches the threshold.
        All => "ALL",
        /// Any single data point within the duration breaches the threshold.
        AtLeastOnce => "AT_LEAST_ONCE",
    }
}

remote_enum! {
    pub enum ValueFunction {
        SingleValue => "SINGLE_VALUE",
        Sum => "SUM",
    }
}

remote_enum! {
    pub enum ViolationTimeLimit {
        OneHour => "ONE_HOUR",
        TwoHours => "TWO_HOURS",
        FourHours => "FOUR_HOURS",
        EightHours => "EIGHT_HOURS",
        TwelveHours => "TWELVE_HOURS",
        TwentyFourHours => "TWENTY_FOUR_HOURS",
    }
}

impl NrqlConditionSpec {
    pub fn example() -> Self {
        Self {
            terms: vec![ConditionTerm::example()],
            nrql: NrqlQuery {
                query: "SELECT 1 FROM MyEvents".to_string(),
                evaluation_offset: 5,
            },
            condition_type: "NRQL".to_string(),
            name: "NRQL Condition".to_string(),
            runbook_url: "http://test.com/runbook".to_string(),
            value_function: Some(ValueFunction::Sum),
            id: 777,
            violation_time_limit: Some(ViolationTimeLimit::OneHour),
            expected_groups: 2,
            ignore_overlap: true,
            enabled: true,
            existing_policy_id: 42,
        }
    }
}

impl ConditionTerm {
    pub fn example() -> Self {
        Self {
            operator: Some(TermOperator::Above),
            priority: Some(Priority::Critical),
            threshold: "5.1".to_string(),
            threshold_duration: 60,
            threshold_occurrences: Some(ThresholdOccurrence::AtLeastOnce),
            time_function: "all".to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        use ViolationTimeLimit::*;

        for v in [OneHour, TwoHours, FourHours, EightHours, TwelveHours, TwentyFourHours] {
            let encoded = serde_json::to_value(v).unwrap();
            assert_eq!(encoded, serde_json::json!(v.name()));
            let decoded: ViolationTimeLimit = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, v);
        }
        assert_eq!(ThresholdOccurrence::AtLeastOnce.name(), "AT_LEAST_ONCE");
        assert!(serde_json::from_str::<Priority>(r#""URGENT""#).is_err());
        assert_eq!(IncidentPreference::PerPolicy.to_string(), "PER_POLICY");
    }

    #[test]
    fn test_absent_fields_are_zero_valued() {
        let spec: NrqlConditionSpec =
            serde_yaml::from_str("name: test condition\nterms: [{}]\n").unwrap();

        assert_eq!(
            spec,
            NrqlConditionSpec {
                name: "test condition".to_string(),
                terms: vec![ConditionTerm::default()],
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_example_serialization() {
        insta::assert_snapshot!(serde_json::to_string_pretty(&NrqlConditionSpec::example()).unwrap(), @r###"
        {
          "terms": [
            {
              "operator": "ABOVE",
              "priority": "CRITICAL",
              "threshold": "5.1",
              "threshold_duration": 60,
              "threshold_occurrences": "AT_LEAST_ONCE",
              "time_function": "all"
            }
          ],
          "nrql": {
            "query": "SELECT 1 FROM MyEvents",
            "evaluation_offset": 5
          },
          "type": "NRQL",
          "name": "NRQL Condition",
          "runbook_url": "http://test.com/runbook",
          "value_function": "SUM",
          "id": 777,
          "violation_time_limit": "ONE_HOUR",
          "expected_groups": 2,
          "ignore_overlap": true,
          "enabled": true,
          "existing_policy_id": 42
        }
        "###);
    }
}
