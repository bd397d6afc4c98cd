use models::{ConditionTerm, NrqlConditionSpec, NrqlQuery};
use xxhash_rust::xxh3::Xxh3;

/// Fingerprint is a content-derived identity of a condition definition.
/// Conditions having equal fingerprints are equivalent to the remote API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// Serialized as its hex form: a JSON number would lose precision above 2^53.
impl serde::Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Excluded,
}

use Inclusion::{Excluded, Included};

/// Every field of a condition definition, named by its serialized path,
/// and whether it participates in the fingerprint.
///
/// `terms.operator` and `value_function` are excluded, which matches the
/// equivalence the operator has always applied: conditions differing only
/// in these fields are not re-applied. REVIEW: it's not settled whether the
/// remote API recomputes these fields, or whether excluding them hides
/// real drift. Changing either entry changes which updates are issued.
pub const FIELDS: &[(&str, Inclusion)] = &[
    ("terms.operator", Excluded),
    ("terms.priority", Included),
    ("terms.threshold", Included),
    ("terms.threshold_duration", Included),
    ("terms.threshold_occurrences", Included),
    ("terms.time_function", Included),
    ("nrql.query", Included),
    ("nrql.evaluation_offset", Included),
    ("type", Included),
    ("name", Included),
    ("runbook_url", Included),
    ("value_function", Excluded),
    ("id", Included),
    ("violation_time_limit", Included),
    ("expected_groups", Included),
    ("ignore_overlap", Included),
    ("enabled", Included),
    ("existing_policy_id", Included),
];

/// Compute the Fingerprint of a condition definition.
/// Terms are hashed in order, as their order is authored intent.
pub fn fingerprint(spec: &NrqlConditionSpec) -> Fingerprint {
    // Destructure exhaustively, so that a new field must be placed into FIELDS.
    let NrqlConditionSpec {
        terms,
        nrql:
            NrqlQuery {
                query,
                evaluation_offset,
            },
        condition_type,
        name,
        runbook_url,
        value_function: _, // Excluded.
        id,
        violation_time_limit,
        expected_groups,
        ignore_overlap,
        enabled,
        existing_policy_id,
    } = spec;

    let mut w = Writer(Xxh3::new());

    w.len(terms.len());
    for term in terms {
        let ConditionTerm {
            operator: _, // Excluded.
            priority,
            threshold,
            threshold_duration,
            threshold_occurrences,
            time_function,
        } = term;

        w.opt(priority.map(|v| v.name()));
        w.str(threshold);
        w.int(*threshold_duration as i64);
        w.opt(threshold_occurrences.map(|v| v.name()));
        w.str(time_function);
    }

    w.str(query);
    w.int(*evaluation_offset as i64);
    w.str(condition_type);
    w.str(name);
    w.str(runbook_url);
    w.int(*id);
    w.opt(violation_time_limit.map(|v| v.name()));
    w.int(*expected_groups as i64);
    w.bool(*ignore_overlap);
    w.bool(*enabled);
    w.int(*existing_policy_id);

    Fingerprint(w.0.digest())
}

// Writer frames each value so that adjacent values can't alias one another,
// as "ab" + "c" would with "a" + "bc".
struct Writer(Xxh3);

impl Writer {
    fn len(&mut self, n: usize) {
        self.0.update(&(n as u64).to_le_bytes());
    }
    fn str(&mut self, s: &str) {
        self.len(s.len());
        self.0.update(s.as_bytes());
    }
    fn int(&mut self, v: i64) {
        self.0.update(&v.to_le_bytes());
    }
    fn bool(&mut self, v: bool) {
        self.0.update(&[v as u8]);
    }
    fn opt(&mut self, v: Option<&str>) {
        match v {
            None => self.0.update(&[0]),
            Some(s) => {
                self.0.update(&[1]);
                self.str(s);
            }
        }
    }
}
