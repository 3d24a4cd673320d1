//! Reconcile a lending order.
//!
//! Every eligible item defaults to being returned to stock. Destinations,
//! sales quantities, the sales order ID and the note can come from a plan
//! file, from flags, or both; flags win.
//!
//! # Plan file
//!
//! ```yaml
//! destinations:
//!   P-1001: sales
//!   BOX-9: sales
//!   P-1002: broken
//! salesQuantities:
//!   BOX-9: 4
//! salesOrderId: INV-9
//! note: End of trade show
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use lendstock_client::{
    PreparedReconciliation, ReconciliationPlan, ReconciliationService, ServiceError,
};
use lendstock_core::{Destination, OrderId};
use thiserror::Error;

use super::{ConnectError, connect};

/// Arguments for `lendstock process`.
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Lending order ID
    pub order_id: String,

    /// YAML or JSON plan file with destinations and sales quantities
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Destination for an item, as IDENTITY=return|sales|broken
    #[arg(long = "dest", value_name = "ID=DEST", value_parser = parse_destination)]
    pub destinations: Vec<(String, Destination)>,

    /// Units sold from a box, as BOX=QTY
    #[arg(long = "sell", value_name = "BOX=QTY", value_parser = parse_sale)]
    pub sales: Vec<(String, u32)>,

    /// Invoice number for items moved to sales
    #[arg(long)]
    pub sales_order_id: Option<String>,

    /// Note attached to the reconciliation
    #[arg(long)]
    pub note: Option<String>,

    /// Print the command instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

/// Errors that can occur while processing an order.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Plan file could not be read.
    #[error("Failed to read plan file {path}: {source}")]
    PlanFile {
        path: String,
        source: std::io::Error,
    },

    /// Plan file is not valid YAML or JSON.
    #[error("Invalid plan file {path}: {source}")]
    PlanFormat {
        path: String,
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to render command: {0}")]
    Render(#[from] serde_json::Error),
}

/// Run `lendstock process`.
///
/// # Errors
///
/// Returns an error if the plan file is unreadable, the reconciliation is
/// invalid, or the backend call fails.
pub async fn run(args: ProcessArgs) -> Result<(), ProcessError> {
    let mut plan = match &args.plan {
        Some(path) => load_plan(path).await?,
        None => ReconciliationPlan::default(),
    };
    plan.merge(plan_from_flags(&args));

    let client = connect()?;
    let service = ReconciliationService::new(client.clone(), client);
    let order_id = OrderId::new(args.order_id);

    if args.dry_run {
        let prepared = service.plan(&order_id, &plan).await?;
        let command = serde_json::to_string_pretty(&prepared.command)?;

        #[allow(clippy::print_stdout)]
        {
            println!("{}", summary(&prepared));
            println!("{command}");
        }
        return Ok(());
    }

    let outcome = service.process(&order_id, &plan).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", summary(&outcome.reconciliation));
        println!(
            "Order {order_id} processed (HTTP {})",
            outcome.receipt.status
        );
        if let Some(body) = &outcome.receipt.body {
            println!("{body}");
        }
    }

    Ok(())
}

async fn load_plan(path: &Path) -> Result<ReconciliationPlan, ProcessError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProcessError::PlanFile {
            path: path.display().to_string(),
            source,
        })?;

    let plan = parse_plan(&content).map_err(|source| ProcessError::PlanFormat {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        destinations = plan.destinations.len(),
        "Loaded plan file"
    );
    Ok(plan)
}

fn parse_plan(content: &str) -> Result<ReconciliationPlan, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(ReconciliationPlan::default());
    }
    serde_yaml::from_str(content)
}

fn plan_from_flags(args: &ProcessArgs) -> ReconciliationPlan {
    ReconciliationPlan {
        destinations: args.destinations.iter().cloned().collect(),
        sales_quantities: args.sales.iter().cloned().collect(),
        sales_order_id: args.sales_order_id.clone(),
        note: args.note.clone(),
    }
}

/// Human-readable preview of where units go.
fn summary(prepared: &PreparedReconciliation) -> String {
    let totals = prepared.unit_totals();
    let mut lines = Vec::new();

    if totals.returned > 0 {
        lines.push(format!("{} units will be returned to stock", totals.returned));
    }
    if totals.sold > 0 {
        let invoice = prepared
            .command
            .sales_order_id
            .as_deref()
            .unwrap_or_default();
        lines.push(format!(
            "{} units will be moved to sales (invoice {invoice})",
            totals.sold
        ));
    }
    if totals.broken > 0 {
        lines.push(format!("{} units will be marked as broken", totals.broken));
    }

    lines.join("\n")
}

fn parse_destination(raw: &str) -> Result<(String, Destination), String> {
    let (identity, destination) = split_pair(raw)?;
    let destination = destination.parse::<Destination>()?;
    Ok((identity.to_owned(), destination))
}

fn parse_sale(raw: &str) -> Result<(String, u32), String> {
    let (box_barcode, quantity) = split_pair(raw)?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    Ok((box_barcode.to_owned(), quantity))
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.rsplit_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
