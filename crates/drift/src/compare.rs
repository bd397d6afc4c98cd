use super::{fingerprint, Fingerprint};
use models::{NrqlConditionSpec, PolicyCondition, PolicySpec};

/// Mismatch is the first difference found between two PolicySpecs.
// Variants never carry the API key itself, so that a Mismatch is safe to log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum Mismatch {
    IncidentPreference,
    Name,
    ApiKey,
    ApiKeySecret,
    Region,
    ConditionCount {
        left: usize,
        right: usize,
    },
    Condition {
        index: usize,
        left: Fingerprint,
        right: Fingerprint,
    },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::IncidentPreference => f.write_str("incident preference differs"),
            Mismatch::Name => f.write_str("name differs"),
            Mismatch::ApiKey => f.write_str("api key differs"),
            Mismatch::ApiKeySecret => f.write_str("api key secret differs"),
            Mismatch::Region => f.write_str("region differs"),
            Mismatch::ConditionCount { left, right } => {
                write!(f, "condition count differs ({left} vs {right})")
            }
            Mismatch::Condition { index, left, right } => {
                write!(f, "condition {index} differs ({left} vs {right})")
            }
        }
    }
}

/// Equivalent is equality as the remote API sees it, which ignores
/// local bookkeeping such as the object names of conditions.
pub trait Equivalent {
    fn equivalent(&self, other: &Self) -> bool;
}

impl Equivalent for PolicySpec {
    fn equivalent(&self, other: &Self) -> bool {
        policies_equal(self, other)
    }
}

impl Equivalent for NrqlConditionSpec {
    fn equivalent(&self, other: &Self) -> bool {
        fingerprint(self) == fingerprint(other)
    }
}

impl Equivalent for [PolicyCondition] {
    fn equivalent(&self, other: &Self) -> bool {
        conditions_equal(self, other)
    }
}

/// Returns true if `left` and `right` are equivalent to the remote API,
/// in which case no update of the remote policy is required.
pub fn policies_equal(left: &PolicySpec, right: &PolicySpec) -> bool {
    explain(left, right).is_none()
}

/// Returns true if conditions `left` and `right` are pair-wise equivalent.
///
/// Conditions are matched by position and not by name or identifier,
/// so a re-ordering of otherwise equal conditions is not equivalent.
/// The local name and namespace of each condition are not compared.
pub fn conditions_equal(left: &[PolicyCondition], right: &[PolicyCondition]) -> bool {
    conditions_mismatch(left, right).is_none()
}

/// Explain the first difference between `left` and `right`,
/// or return None if they're equivalent.
pub fn explain(left: &PolicySpec, right: &PolicySpec) -> Option<Mismatch> {
    let PolicySpec {
        incident_preference,
        name,
        api_key,
        api_key_secret,
        region,
        conditions,
    } = left;

    if *incident_preference != right.incident_preference {
        Some(Mismatch::IncidentPreference)
    } else if *name != right.name {
        Some(Mismatch::Name)
    } else if *api_key != right.api_key {
        Some(Mismatch::ApiKey)
    } else if *api_key_secret != right.api_key_secret {
        Some(Mismatch::ApiKeySecret)
    } else if *region != right.region {
        Some(Mismatch::Region)
    } else {
        conditions_mismatch(conditions, &right.conditions)
    }
}

fn conditions_mismatch(left: &[PolicyCondition], right: &[PolicyCondition]) -> Option<Mismatch> {
    if left.len() != right.len() {
        return Some(Mismatch::ConditionCount {
            left: left.len(),
            right: right.len(),
        });
    }

    for (index, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let (l, r) = (fingerprint(&l.spec), fingerprint(&r.spec));

        if l != r {
            return Some(Mismatch::Condition {
                index,
                left: l,
                right: r,
            });
        }
    }
    None
}
