//! DTO modules that bridge services with templates and APIs.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

pub mod api;
pub mod audits;
pub mod clients;
pub mod dashboard;
pub mod proposals;
pub mod selection;
pub mod tax_credits;

/// Value/label pair for `<select>` options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: &'static str,
}

impl Choice {
    pub fn new(value: impl Display, label: &'static str) -> Self {
        Self {
            value: value.to_string(),
            label,
        }
    }
}

/// One bar of a per-status breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub value: String,
    pub label: &'static str,
    pub count: usize,
}

/// Flattens a per-status map into template rows, keeping the map order.
pub(crate) fn status_counts<K>(
    by_status: &BTreeMap<K, usize>,
    label: impl Fn(K) -> &'static str,
) -> Vec<StatusCount>
where
    K: Copy + Display,
{
    by_status
        .iter()
        .map(|(status, count)| StatusCount {
            value: status.to_string(),
            label: label(*status),
            count: *count,
        })
        .collect()
}
