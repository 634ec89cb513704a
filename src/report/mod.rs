//! Human-readable and machine-readable views of a capital plan.

use crate::plan::{AllocationTable, CapitalPlan};
use crate::utils::decimal::round_to_precision;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Column header for CSV exports of the allocation table.
const CSV_HEADER: &str = "index,price_level,cost_per_level,fund_type,position_size";

/// Strategy summary in minor currency units (USC).
pub fn render_summary(plan: &CapitalPlan, asset_digit: u32) -> String {
    let s = &plan.summary;
    let prec = asset_digit as usize;
    let round = |v| round_to_precision(v, asset_digit);
    let mut out = String::new();

    let _ = writeln!(out, "====== SUMMARY ======");
    let _ = writeln!(out, "Cost of First Investment : {:.prec$} USC", round(s.first_action_cost));
    let _ = writeln!(
        out,
        "From Balance {} USC, Remaining funds {:.prec$} USC, used {:.prec$} USC in Worst Case Scenario",
        s.balance_cents,
        round(s.remaining_funds),
        round(s.used_funds)
    );
    let _ = writeln!(out, "Balance utilization : {:.2}%", s.utilization_pct());
    let _ = writeln!(
        out,
        "Fund A investment size {} for each Zone ({} zones), Total Fund A Cost : {:.prec$} USC",
        s.lot_size_fund_a,
        plan.fund_a.len(),
        round(s.total_fund_a_cost)
    );
    let _ = writeln!(
        out,
        "Fund B investment size {} for each Zone ({} zones), Total Fund B Cost : {:.prec$} USC",
        s.lot_size_fund_b,
        plan.fund_b.len(),
        round(s.total_fund_b_cost)
    );

    out
}

/// Fixed-width allocation table, highest zone first.
pub fn render_table(table: &AllocationTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:>14}  {:>16}  {:<6}  {:>13}",
        "#", "PriceLevel", "CostPerLevel", "Fund", "PositionSize"
    );

    for row in table.rows() {
        let _ = writeln!(
            out,
            "{:>5}  {:>14}  {:>16}  {:<6}  {:>13}",
            row.index,
            row.price_level.normalize(),
            row.cost_per_level.normalize(),
            row.fund_type,
            row.position_size.normalize()
        );
    }

    out
}

/// Allocation table as CSV text.
pub fn table_to_csv_string(table: &AllocationTable) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for row in table.rows() {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            row.index,
            row.price_level.normalize(),
            row.cost_per_level.normalize(),
            row.fund_type,
            row.position_size.normalize()
        );
    }

    out
}

/// Write the allocation table to a CSV file.
pub fn write_table_csv<P: AsRef<Path>>(table: &AllocationTable, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, table_to_csv_string(table))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))
}

/// Full plan (grids, table, summary) as pretty JSON.
pub fn plan_to_json(plan: &CapitalPlan) -> Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize capital plan")
}
