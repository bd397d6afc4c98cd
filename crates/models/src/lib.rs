mod conditions;
mod policies;
mod status;

pub use conditions::{
    ConditionTerm, IncidentPreference, NrqlConditionSpec, NrqlQuery, Priority, TermOperator,
    ThresholdOccurrence, ValueFunction, ViolationTimeLimit,
};
pub use policies::{ApiKeySecret, PolicyCondition, PolicySpec};
pub use status::PolicyStatus;

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}
