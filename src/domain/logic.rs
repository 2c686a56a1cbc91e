// src/domain/logic.rs

use crate::domain::listing::{DetailField, ListingDetail};
use std::fmt;

/// Turns a display label into a map key: "Cash Flow: " -> "cash_flow".
pub fn normalize_key(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(':', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Promotes a normalized label to a named field when `matches` says so.
#[derive(Clone, Copy)]
pub struct LabelRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub field: DetailField,
}

impl fmt::Debug for LabelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelRule")
            .field("name", &self.name)
            .field("field", &self.field)
            .finish()
    }
}

/// First rule whose predicate accepts `key`. Order is precedence.
pub fn route_label(rules: &[LabelRule], key: &str) -> Option<DetailField> {
    rules.iter().find(|r| (r.matches)(key)).map(|r| r.field)
}

/// Where a label/value pair ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Named(DetailField),
    CatchAll,
    /// Key already captured; value dropped.
    Duplicate,
}

/// Files one label/value pair into `detail`.
///
/// A key that is already present (as a set named field or in the catch-all)
/// is never written twice. Otherwise the first matching rule picks the named
/// field and everything else lands in `additional_info`.
pub fn record_labeled_value(
    detail: &mut ListingDetail,
    rules: &[LabelRule],
    raw_label: &str,
    value: impl Into<String>,
) -> Placement {
    let key = normalize_key(raw_label);

    if detail.has_key(&key) {
        return Placement::Duplicate;
    }

    match route_label(rules, &key) {
        Some(field) => {
            detail.set(field, value);
            Placement::Named(field)
        }
        None => {
            detail.additional_info.insert(key, value.into());
            Placement::CatchAll
        }
    }
}

/// One step of a derivation chain: if `applies`, run `apply`.
#[derive(Clone, Copy)]
pub struct DerivationRule {
    pub name: &'static str,
    pub applies: fn(&ListingDetail) -> bool,
    pub apply: fn(&mut ListingDetail),
}

impl fmt::Debug for DerivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivationRule({})", self.name)
    }
}

fn has_cash_flow_without_ebitda(d: &ListingDetail) -> bool {
    d.additional_info.contains_key("cash_flow") && !d.is_set(DetailField::Ebitda)
}

fn copy_cash_flow_to_ebitda(d: &mut ListingDetail) {
    if let Some(v) = d.additional_info.get("cash_flow").cloned() {
        d.set(DetailField::Ebitda, v);
    }
}

fn has_ebitda_without_sde(d: &ListingDetail) -> bool {
    d.is_set(DetailField::Ebitda) && !d.is_set(DetailField::Sde)
}

fn copy_ebitda_to_sde(d: &mut ListingDetail) {
    if let Some(v) = d.get(DetailField::Ebitda).map(str::to_string) {
        d.set(DetailField::Sde, v);
    }
}

/// cash_flow -> ebitda -> sde. Runs in order; the second step sees the
/// result of the first.
pub const EARNINGS_DERIVATIONS: &[DerivationRule] = &[
    DerivationRule {
        name: "cash_flow_as_ebitda",
        applies: has_cash_flow_without_ebitda,
        apply: copy_cash_flow_to_ebitda,
    },
    DerivationRule {
        name: "ebitda_as_sde",
        applies: has_ebitda_without_sde,
        apply: copy_ebitda_to_sde,
    },
];

/// Applies each rule once, in order. Returns the names of the rules that fired.
pub fn apply_derivations(detail: &mut ListingDetail, rules: &[DerivationRule]) -> Vec<&'static str> {
    let mut fired = Vec::new();
    for rule in rules {
        if (rule.applies)(detail) {
            (rule.apply)(detail);
            fired.push(rule.name);
        }
    }
    fired
}
