//! Text report rendering
//!
//! The report has eight fixed sections:
//! 1. Header and run metadata
//! 2. Overall summary
//! 3. Region-wise performance
//! 4. Top 5 products
//! 5. Top 5 customers
//! 6. Daily sales trend
//! 7. Product performance analysis
//! 8. API enrichment summary
//!
//! Money is shown with two decimals, thousands separators and [`CURRENCY`].

use crate::core::enricher::summarize;
use crate::core::filter::FilterSummary;
use crate::io::create_parent_dir;
use crate::types::{
    CatalogStatus, EnrichedTransaction, ReportSections, SalesError, Transaction,
};
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Currency symbol prefixed to every amount
pub const CURRENCY: char = '₹';

const RULE_WIDTH: usize = 44;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything needed to render one report
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub transactions: &'a [Transaction],
    pub enriched: &'a [EnrichedTransaction],
    pub sections: &'a ReportSections,
    /// Records rejected by validation
    pub invalid_count: usize,
    /// Records whose declared total was replaced
    pub corrected_totals: usize,
    /// Present only when a filter was active
    pub filter: Option<FilterSummary>,
    pub catalog: &'a CatalogStatus,
    pub generated_at: NaiveDateTime,
}

/// Round to cents, half away from zero
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount as `₹1,234.50`
pub fn format_money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", round_money(amount).abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !round_money(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{CURRENCY}{grouped}.{cents}")
}

/// Render a percentage with two decimals
pub fn format_pct(pct: Decimal) -> String {
    format!("{:.2}%", round_money(pct))
}

fn section(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Write the report to any writer
pub fn write_report(ctx: &ReportContext<'_>, out: &mut dyn Write) -> io::Result<()> {
    let sections = ctx.sections;
    let summary = &sections.summary;

    // 1. Header
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "          SALES ANALYTICS REPORT")?;
    writeln!(out, "    Generated: {}", ctx.generated_at.format(TIMESTAMP_FORMAT))?;
    writeln!(out, "    Records Processed: {}", ctx.transactions.len())?;
    writeln!(out, "    Invalid Records Skipped: {}", ctx.invalid_count)?;
    if ctx.corrected_totals > 0 {
        writeln!(out, "    Totals Corrected: {}", ctx.corrected_totals)?;
    }
    if let Some(filter) = &ctx.filter {
        writeln!(
            out,
            "    Filtered Out: {} by region, {} by amount",
            filter.filtered_by_region, filter.filtered_by_amount
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    // 2. Overall summary
    section(out, "OVERALL SUMMARY")?;
    writeln!(out, "Total Revenue:        {}", format_money(summary.total_revenue))?;
    writeln!(out, "Total Transactions:   {}", summary.transaction_count)?;
    writeln!(
        out,
        "Average Order Value:  {}",
        format_money(summary.average_order_value)
    )?;
    writeln!(
        out,
        "Date Range:           {} to {}",
        summary.first_date, summary.last_date
    )?;
    writeln!(out)?;

    // 3. Regions
    section(out, "REGION-WISE PERFORMANCE")?;
    writeln!(out, "{:<10}{:>15}{:>13}{:>15}", "Region", "Sales", "% of Total", "Transactions")?;
    for region in &sections.regions {
        writeln!(
            out,
            "{:<10}{:>15}{:>13}{:>15}",
            region.region,
            format_money(region.revenue),
            format_pct(region.share_pct),
            region.transaction_count
        )?;
    }
    writeln!(out)?;

    // 4. Products
    section(out, "TOP 5 PRODUCTS")?;
    writeln!(out, "{:<6}{:<28}{:>10}{:>15}", "Rank", "Product Name", "Quantity", "Revenue")?;
    for (rank, product) in sections.top_products.iter().enumerate() {
        writeln!(
            out,
            "{:<6}{:<28}{:>10}{:>15}",
            rank + 1,
            product.product_name,
            product.quantity,
            format_money(product.revenue)
        )?;
    }
    writeln!(out)?;

    // 5. Customers
    section(out, "TOP 5 CUSTOMERS")?;
    writeln!(out, "{:<6}{:<14}{:>15}{:>10}", "Rank", "Customer ID", "Total Spent", "Orders")?;
    for (rank, customer) in sections.top_customers.iter().enumerate() {
        writeln!(
            out,
            "{:<6}{:<14}{:>15}{:>10}",
            rank + 1,
            customer.customer_id,
            format_money(customer.total_spent),
            customer.order_count
        )?;
    }
    writeln!(out)?;

    // 6. Daily trend
    section(out, "DAILY SALES TREND")?;
    writeln!(out, "{:<13}{:>15}{:>15}{:>12}", "Date", "Revenue", "Transactions", "Customers")?;
    for day in &sections.daily_trend {
        writeln!(
            out,
            "{:<13}{:>15}{:>15}{:>12}",
            day.date.to_string(),
            format_money(day.revenue),
            day.transaction_count,
            day.unique_customers
        )?;
    }
    writeln!(out)?;

    // 7. Product performance
    section(out, "PRODUCT PERFORMANCE ANALYSIS")?;
    let peak = &sections.peak_day;
    writeln!(
        out,
        "Best Selling Day: {} ({}, {} transactions)",
        peak.date,
        format_money(peak.revenue),
        peak.transaction_count
    )?;
    writeln!(out)?;

    if sections.low_performers.is_empty() {
        writeln!(out, "Low Performing Products: None")?;
    } else {
        writeln!(out, "Low Performing Products:")?;
        for product in &sections.low_performers {
            writeln!(
                out,
                "- {}: {} units sold, {}",
                product.product_name,
                product.quantity,
                format_money(product.revenue)
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Average Transaction Value per Region:")?;
    for region in &sections.regions {
        writeln!(out, "- {}: {}", region.region, format_money(region.average_value()))?;
    }
    writeln!(out)?;

    // 8. Enrichment
    let enrichment = summarize(ctx.enriched);
    section(out, "API ENRICHMENT SUMMARY")?;
    writeln!(out, "Catalog Status:         {}", ctx.catalog)?;
    writeln!(out, "Total Records Enriched: {}", enrichment.total)?;
    writeln!(out, "Successful Enrichments: {}", enrichment.matched)?;
    writeln!(out, "Failed Enrichments:     {}", enrichment.unmatched)?;
    writeln!(out, "Success Rate:           {}", format_pct(enrichment.match_rate_pct))?;
    writeln!(out)?;

    if enrichment.unmatched_products.is_empty() {
        writeln!(out, "All products were successfully enriched.")?;
    } else {
        writeln!(out, "Products That Could Not Be Enriched:")?;
        for name in &enrichment.unmatched_products {
            writeln!(out, "- {name}")?;
        }
    }

    Ok(())
}

/// Render the report to `path`, replacing any previous report
///
/// An empty transaction set is a [`SalesError::Computation`]: there is
/// nothing meaningful to report.
pub fn save_report(path: &Path, ctx: &ReportContext<'_>) -> Result<(), SalesError> {
    if ctx.transactions.is_empty() {
        return Err(SalesError::computation(
            "cannot generate a report from an empty transaction set",
        ));
    }

    create_parent_dir(path)?;
    let file = File::create(path).map_err(|e| SalesError::file_access(path, e))?;
    let mut output = BufWriter::new(file);

    write_report(ctx, &mut output).map_err(|e| SalesError::file_access(path, e))?;
    output.flush().map_err(|e| SalesError::file_access(path, e))?;

    info!(path = %path.display(), "report written");
    Ok(())
}
