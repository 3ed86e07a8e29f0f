//! Submission merge: what actually gets persisted when the operator adds
//! amounts to the order.

use chrono::NaiveDate;
use tracing::info;

use medledger_core::{ItemId, OrderId, calendar};
use medledger_orders::Order;

/// Where the merged entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTarget {
    /// Overwrite the existing pending order's entry list.
    UpdatePending(OrderId),
    /// No pending order exists: create one dated the upcoming Monday.
    CreatePending { date: NaiveDate },
}

/// The merged entry list plus the directive for persisting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub entries: Vec<(ItemId, i64)>,
    pub target: SubmissionTarget,
}

/// Merge operator-entered form quantities with the existing pending order.
///
/// Non-positive form inputs are discarded; remaining quantities are summed
/// per item with the pending order's persisted entries. Only explicitly
/// entered amounts are ever carried forward — auto-suggested quantities are
/// never persisted. Returns `None` when the merged set is empty so that an
/// empty submission never creates a phantom pending order.
pub fn submission_merge(
    form_input: &[(ItemId, i64)],
    pending: Option<&Order>,
    today: NaiveDate,
) -> Option<SubmissionPlan> {
    let mut merged: Vec<(ItemId, i64)> = Vec::new();

    let add = |item: ItemId, amount: i64, merged: &mut Vec<(ItemId, i64)>| {
        match merged.iter_mut().find(|(id, _)| *id == item) {
            Some((_, total)) => *total += amount,
            None => merged.push((item, amount)),
        }
    };

    for &(item, amount) in form_input {
        if amount > 0 {
            add(item, amount, &mut merged);
        }
    }
    if let Some(order) = pending {
        for entry in order.entries() {
            add(entry.item(), entry.amount(), &mut merged);
        }
    }

    if merged.is_empty() {
        return None;
    }

    let target = match pending {
        Some(order) => SubmissionTarget::UpdatePending(order.id()),
        None => SubmissionTarget::CreatePending {
            date: calendar::upcoming_monday(today),
        },
    };
    info!(entries = merged.len(), ?target, "submission merge prepared");

    Some(SubmissionPlan {
        entries: merged,
        target,
    })
}
