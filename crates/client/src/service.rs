//! Lent-order reconciliation service.
//!
//! Wraps the pure engine in `lendstock_core::reconcile` with the backend
//! round trips: load the order and its lines, apply the caller's plan on
//! top of the defaults, validate, and submit exactly once.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use lendstock_core::reconcile::{
    DestinationGroups, DestinationMap, ReconciliationCommand, SalesQuantityMap, UnitTotals,
    default_destinations, group_by_destination, validate_and_build_command,
};
use lendstock_core::{LentLineItem, LentOrder, OrderId};

use crate::backend::{OrderCommandSink, OrderDirectory, SubmissionReceipt};
use crate::error::ServiceError;

/// Caller decisions for one reconciliation.
///
/// Destinations listed here override the default of returning everything to
/// stock. Deserializable from plan files:
///
/// ```yaml
/// destinations:
///   P-1001: sales
///   BOX-7: broken
/// salesQuantities:
///   BOX-9: 4
/// salesOrderId: INV-2024-118
/// note: End of trade show
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconciliationPlan {
    pub destinations: DestinationMap,
    pub sales_quantities: SalesQuantityMap,
    pub sales_order_id: Option<String>,
    pub note: Option<String>,
}

impl ReconciliationPlan {
    /// Layer `other` on top of `self`. Entries and fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        self.destinations.extend(other.destinations);
        self.sales_quantities.extend(other.sales_quantities);
        if other.sales_order_id.is_some() {
            self.sales_order_id = other.sales_order_id;
        }
        if other.note.is_some() {
            self.note = other.note;
        }
    }
}

/// A lending order loaded for reconciliation, with default destinations.
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub order: LentOrder,
    pub items: Vec<LentLineItem>,
    /// Every eligible item mapped to return.
    pub destinations: DestinationMap,
}

/// A validated reconciliation that has not been sent.
#[derive(Debug, Clone)]
pub struct PreparedReconciliation {
    pub order: LentOrder,
    pub groups: DestinationGroups,
    pub command: ReconciliationCommand,
}

impl PreparedReconciliation {
    /// Units going to each destination.
    #[must_use]
    pub fn unit_totals(&self) -> UnitTotals {
        self.groups.unit_totals()
    }
}

/// Result of a submitted reconciliation.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub reconciliation: PreparedReconciliation,
    pub receipt: SubmissionReceipt,
}

/// Loads, validates and submits lent-order reconciliations.
///
/// At most one submission per order is outstanding at a time.
pub struct ReconciliationService<D, S> {
    directory: D,
    sink: S,
    in_flight: Mutex<HashSet<OrderId>>,
}

impl<D, S> std::fmt::Debug for ReconciliationService<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationService").finish_non_exhaustive()
    }
}

impl<D: OrderDirectory, S: OrderCommandSink> ReconciliationService<D, S> {
    /// Create a service over a directory and a command sink.
    pub fn new(directory: D, sink: S) -> Self {
        Self {
            directory,
            sink,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Load an order and its lines, defaulting every eligible item to return.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if either backend read fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn prepare(&self, order_id: &OrderId) -> Result<PreparedOrder, ServiceError> {
        let order = self.directory.lent_order(order_id).await?;
        let items = self.directory.lent_line_items(order_id).await?;
        let destinations = default_destinations(&items);

        tracing::debug!(
            items = items.len(),
            eligible = destinations.len(),
            "Prepared lent order"
        );

        Ok(PreparedOrder {
            order,
            items,
            destinations,
        })
    }

    /// Build the command for `plan` without sending it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the plan is rejected, or
    /// `ServiceError::Api` if the order cannot be loaded.
    #[instrument(skip(self, plan), fields(order_id = %order_id))]
    pub async fn plan(
        &self,
        order_id: &OrderId,
        plan: &ReconciliationPlan,
    ) -> Result<PreparedReconciliation, ServiceError> {
        let prepared = self.prepare(order_id).await?;
        Ok(build(prepared, plan)?)
    }

    /// Build the command for `plan` and submit it once.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AlreadyInFlight` without contacting the backend
    /// if a submission for the same order is outstanding,
    /// `ServiceError::Validation` if the plan is rejected, or
    /// `ServiceError::Api` with the backend's failure unchanged.
    #[instrument(skip(self, plan), fields(order_id = %order_id))]
    pub async fn process(
        &self,
        order_id: &OrderId,
        plan: &ReconciliationPlan,
    ) -> Result<ProcessOutcome, ServiceError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, order_id)?;

        let prepared = self.prepare(order_id).await?;
        let reconciliation = build(prepared, plan)?;

        let totals = reconciliation.unit_totals();
        tracing::info!(
            returned = totals.returned,
            sold = totals.sold,
            broken = totals.broken,
            "Submitting reconciliation"
        );

        let receipt = self
            .sink
            .submit_reconciliation(order_id, &reconciliation.command)
            .await?;

        tracing::info!(status = receipt.status, "Reconciliation accepted");

        Ok(ProcessOutcome {
            reconciliation,
            receipt,
        })
    }

    /// Whether a submission for `order_id` is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, order_id: &OrderId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(order_id)
    }
}

fn build(
    prepared: PreparedOrder,
    plan: &ReconciliationPlan,
) -> Result<PreparedReconciliation, lendstock_core::reconcile::ReconcileError> {
    let PreparedOrder {
        order,
        items,
        mut destinations,
    } = prepared;

    for (identity, destination) in &plan.destinations {
        if !destinations.contains_key(identity) {
            tracing::warn!(%identity, "Plan names an item that is not lent on this order");
        }
        destinations.insert(identity.clone(), *destination);
    }

    let command = validate_and_build_command(
        &order,
        &items,
        &destinations,
        &plan.sales_quantities,
        plan.sales_order_id.as_deref(),
    )?;
    let command = match plan.note.as_deref() {
        Some(note) => command.with_note(note),
        None => command,
    };
    let groups = group_by_destination(&items, &destinations, &plan.sales_quantities).into_result()?;

    Ok(PreparedReconciliation {
        order,
        groups,
        command,
    })
}

/// Marks an order as having an outstanding submission until dropped.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<OrderId>>,
    order_id: OrderId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<OrderId>>, order_id: &OrderId) -> Result<Self, ServiceError> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order_id.clone());

        if !inserted {
            tracing::warn!(%order_id, "Rejected concurrent submission");
            return Err(ServiceError::AlreadyInFlight(order_id.clone()));
        }

        Ok(Self {
            set,
            order_id: order_id.clone(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.order_id);
    }
}
