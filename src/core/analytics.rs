//! Analytics engine
//!
//! This module provides the AnalyticsEngine that turns the validated
//! transaction set into the [`ReportSections`] consumed by the report.
//!
//! Every computation is a pure function of its input. Sums use checked
//! arithmetic; an overflow is reported as a computation error rather than
//! producing a wrong total.
//!
//! # Ranking
//!
//! Top-N lists rank by revenue (highest first), then by volume (units for
//! products, orders for customers), then by the order in which the key was
//! first seen in the input. The last rule falls out of grouping in
//! first-seen order and using a stable sort.

use crate::types::{
    CustomerStats, DailyStats, ProductStats, RegionStats, ReportSections, SalesError,
    SummaryStats, Transaction,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// Length of the top product and top customer lists
pub const TOP_N: usize = 5;

/// Default revenue share (percent) under which a product is low-performing
pub const DEFAULT_LOW_SHARE_PCT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

fn checked_sum(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, SalesError> {
    a.checked_add(b)
        .ok_or_else(|| SalesError::computation(format!("{} overflowed", what)))
}

/// `part` as a percentage of `total`; zero when there is no revenue at all
///
/// Scaling first keeps full precision; dividing first is the fallback for
/// parts too large to scale by a hundred.
fn share_pct(part: Decimal, total: Decimal) -> Result<Decimal, SalesError> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(total))
        .or_else(|| {
            part.checked_div(total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .ok_or_else(|| SalesError::computation("revenue share overflowed"))
}

/// Group transactions by key, keeping groups in first-seen order
fn group_in_order<'a, K, A>(
    transactions: &'a [Transaction],
    key: impl Fn(&'a Transaction) -> K,
    init: impl Fn(&'a Transaction) -> A,
    mut fold: impl FnMut(&mut A, &'a Transaction) -> Result<(), SalesError>,
) -> Result<Vec<A>, SalesError>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<A> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(key(tx)).or_insert_with(|| {
            groups.push(init(tx));
            groups.len() - 1
        });
        fold(&mut groups[slot], tx)?;
    }

    Ok(groups)
}

/// Sum of `total_amount` over all transactions
pub fn total_revenue(transactions: &[Transaction]) -> Result<Decimal, SalesError> {
    transactions.iter().try_fold(Decimal::ZERO, |acc, tx| {
        checked_sum(acc, tx.total_amount, "total revenue")
    })
}

/// Per-region count, revenue and share, highest revenue first
///
/// Regions differing only in ASCII case are one region, reported under the
/// spelling seen first.
pub fn region_breakdown(transactions: &[Transaction]) -> Result<Vec<RegionStats>, SalesError> {
    let total = total_revenue(transactions)?;

    let mut regions = group_in_order(
        transactions,
        |tx| tx.region.to_ascii_lowercase(),
        |tx| RegionStats {
            region: tx.region.clone(),
            transaction_count: 0,
            revenue: Decimal::ZERO,
            share_pct: Decimal::ZERO,
        },
        |stats, tx| {
            stats.transaction_count += 1;
            stats.revenue = checked_sum(stats.revenue, tx.total_amount, "region revenue")?;
            Ok(())
        },
    )?;

    for stats in &mut regions {
        stats.share_pct = share_pct(stats.revenue, total)?;
    }
    regions.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    Ok(regions)
}

/// Units and revenue per product id, in first-seen order
pub fn product_totals(transactions: &[Transaction]) -> Result<Vec<ProductStats>, SalesError> {
    group_in_order(
        transactions,
        |tx| tx.product_id.as_str(),
        |tx| ProductStats {
            product_id: tx.product_id.clone(),
            product_name: tx.product_name.clone(),
            quantity: 0,
            revenue: Decimal::ZERO,
        },
        |stats, tx| {
            stats.quantity += u64::from(tx.quantity);
            stats.revenue = checked_sum(stats.revenue, tx.total_amount, "product revenue")?;
            Ok(())
        },
    )
}

/// Best `n` products by revenue, then units, then first-seen
pub fn top_products(transactions: &[Transaction], n: usize) -> Result<Vec<ProductStats>, SalesError> {
    let mut products = product_totals(transactions)?;
    products.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| b.quantity.cmp(&a.quantity))
    });
    products.truncate(n);
    Ok(products)
}

/// Best `n` customers by spend, then order count, then first-seen
pub fn top_customers(
    transactions: &[Transaction],
    n: usize,
) -> Result<Vec<CustomerStats>, SalesError> {
    let mut products_bought: HashMap<&str, HashSet<&str>> = HashMap::new();

    let mut customers = group_in_order(
        transactions,
        |tx| tx.customer_id.as_str(),
        |tx| CustomerStats {
            customer_id: tx.customer_id.clone(),
            order_count: 0,
            total_spent: Decimal::ZERO,
            average_order_value: Decimal::ZERO,
            distinct_products: 0,
        },
        |stats, tx| {
            stats.order_count += 1;
            stats.total_spent = checked_sum(stats.total_spent, tx.total_amount, "customer spend")?;
            products_bought
                .entry(tx.customer_id.as_str())
                .or_default()
                .insert(tx.product_id.as_str());
            Ok(())
        },
    )?;

    for stats in &mut customers {
        stats.average_order_value = stats.total_spent / Decimal::from(stats.order_count);
        stats.distinct_products = products_bought
            .get(stats.customer_id.as_str())
            .map_or(0, HashSet::len);
    }

    customers.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| b.order_count.cmp(&a.order_count))
    });
    customers.truncate(n);
    Ok(customers)
}

/// Revenue, volume and unique customers per day, chronological
pub fn daily_trend(transactions: &[Transaction]) -> Result<Vec<DailyStats>, SalesError> {
    let mut days: BTreeMap<_, (DailyStats, HashSet<&str>)> = BTreeMap::new();

    for tx in transactions {
        let (stats, customers) = days.entry(tx.date).or_insert_with(|| {
            (
                DailyStats {
                    date: tx.date,
                    revenue: Decimal::ZERO,
                    transaction_count: 0,
                    unique_customers: 0,
                },
                HashSet::new(),
            )
        });
        stats.revenue = checked_sum(stats.revenue, tx.total_amount, "daily revenue")?;
        stats.transaction_count += 1;
        customers.insert(tx.customer_id.as_str());
    }

    Ok(days
        .into_values()
        .map(|(mut stats, customers)| {
            stats.unique_customers = customers.len();
            stats
        })
        .collect())
}

/// Day with the strictly highest revenue; the earliest wins a tie
///
/// Expects a chronological trend as produced by [`daily_trend`].
pub fn peak_day(trend: &[DailyStats]) -> Option<&DailyStats> {
    trend.iter().fold(None, |best: Option<&DailyStats>, day| match best {
        Some(current) if current.revenue >= day.revenue => Some(current),
        _ => Some(day),
    })
}

/// Products whose revenue share is below `threshold_pct`, lowest first
///
/// Ties are broken by units ascending, then first-seen.
pub fn low_performers(
    transactions: &[Transaction],
    threshold_pct: Decimal,
) -> Result<Vec<ProductStats>, SalesError> {
    let total = total_revenue(transactions)?;

    let mut low = Vec::new();
    for product in product_totals(transactions)? {
        if share_pct(product.revenue, total)? < threshold_pct {
            low.push(product);
        }
    }

    low.sort_by(|a, b| a.revenue.cmp(&b.revenue).then_with(|| a.quantity.cmp(&b.quantity)));
    Ok(low)
}

/// Computes every report section from the validated set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsEngine {
    low_share_pct: Decimal,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_SHARE_PCT)
    }
}

impl AnalyticsEngine {
    /// Create an engine flagging products below `low_share_pct` percent of revenue
    pub fn new(low_share_pct: Decimal) -> Self {
        AnalyticsEngine { low_share_pct }
    }

    /// Compute all report sections
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Computation`] if `transactions` is empty or a sum
    /// overflows.
    pub fn compute(&self, transactions: &[Transaction]) -> Result<ReportSections, SalesError> {
        let dates = transactions.iter().map(|tx| tx.date);
        let first = dates.clone().min();
        let last = dates.max();
        let (Some(first), Some(last)) = (first, last) else {
            return Err(SalesError::computation("no valid transactions to analyze"));
        };

        let total = total_revenue(transactions)?;
        let summary = SummaryStats {
            total_revenue: total,
            transaction_count: transactions.len(),
            average_order_value: total / Decimal::from(transactions.len()),
            first_date: first,
            last_date: last,
        };

        let trend = daily_trend(transactions)?;
        let peak = peak_day(&trend)
            .cloned()
            .ok_or_else(|| SalesError::computation("no sales days"))?;

        Ok(ReportSections {
            summary,
            regions: region_breakdown(transactions)?,
            top_products: top_products(transactions, TOP_N)?,
            top_customers: top_customers(transactions, TOP_N)?,
            daily_trend: trend,
            peak_day: peak,
            low_performers: low_performers(transactions, self.low_share_pct)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::pipe_format::parse_line;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn txs(lines: &[&str]) -> Vec<Transaction> {
        lines.iter().map(|line| parse_line(line).unwrap()).collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample() -> Vec<Transaction> {
        txs(&[
            "T001|2024-01-05|North|P101|Widget|C001|3|10.00|30.00",
            "T002|2024-01-05|South|P102|Gadget|C002|1|50.00|50.00",
            "T003|2024-01-06|North|P103|Bolt|C001|10|1.00|10.00",
            "T004|2024-01-07|East|P101|Widget|C003|2|10.00|20.00",
            "T005|2024-01-06|South|P104|Nut|C002|4|0.50|2.00",
        ])
    }

    #[test]
    fn test_total_revenue_is_sum_of_quantity_times_price() {
        let transactions = sample();
        let expected: Decimal = transactions
            .iter()
            .map(|tx| tx.unit_price * Decimal::from(tx.quantity))
            .sum();

        assert_eq!(total_revenue(&transactions).unwrap(), expected);
        assert_eq!(expected, dec("112.00"));
    }

    #[test]
    fn test_region_breakdown() {
        let regions = region_breakdown(&sample()).unwrap();

        let names: Vec<&str> = regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["South", "North", "East"]);

        assert_eq!(regions[0].revenue, dec("52.00"));
        assert_eq!(regions[0].transaction_count, 2);
        assert_eq!(regions[1].revenue, dec("40.00"));
        assert_eq!(regions[2].transaction_count, 1);

        let shares: Decimal = regions.iter().map(|r| r.share_pct).sum();
        assert_eq!(shares.round_dp(6), dec("100"));
        assert_eq!(regions[2].share_pct.round_dp(2), dec("17.86"));
        assert_eq!(regions[1].average_value(), dec("20"));
    }

    #[test]
    fn test_region_breakdown_merges_case_variants() {
        let transactions = txs(&[
            "T001|2024-01-05|North|P101|Widget|C001|3|10.00|30.00",
            "T002|2024-01-05|South|P102|Gadget|C002|1|50.00|50.00",
            "T003|2024-01-06|north|P103|Bolt|C001|10|1.00|10.00",
            "T004|2024-01-06|NORTH|P103|Bolt|C003|5|1.00|5.00",
        ]);

        let regions = region_breakdown(&transactions).unwrap();

        let names: Vec<&str> = regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["South", "North"]);
        assert_eq!(regions[1].transaction_count, 3);
        assert_eq!(regions[1].revenue, dec("45.00"));
        let shares: Decimal = regions.iter().map(|r| r.share_pct).sum();
        assert_eq!(shares.round_dp(6), dec("100"));
    }

    #[test]
    fn test_top_products_by_revenue() {
        let top = top_products(&sample(), TOP_N).unwrap();

        // P101 and P102 tie on revenue; P101 sold more units
        let ids: Vec<&str> = top.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P101", "P102", "P103", "P104"]);
        assert_eq!(top[0].quantity, 5);
        assert_eq!(top[0].revenue, dec("50.00"));
    }

    #[test]
    fn test_top_products_tie_breaks() {
        let transactions = txs(&[
            "T001|2024-01-01|North|P1|First|C001|1|10.00|10.00",
            "T002|2024-01-01|North|P2|MoreUnits|C001|5|2.00|10.00",
            "T003|2024-01-01|North|P3|Third|C001|1|10.00|10.00",
            "T004|2024-01-01|North|P4|Big|C001|1|99.00|99.00",
        ]);

        let top = top_products(&transactions, 3).unwrap();
        let ids: Vec<&str> = top.iter().map(|p| p.product_id.as_str()).collect();

        // P2 beats P1/P3 on units; P1 beats P3 on first-seen
        assert_eq!(ids, vec!["P4", "P2", "P1"]);
    }

    #[test]
    fn test_top_products_truncates_to_n() {
        let transactions = txs(&[
            "T001|2024-01-01|North|P1|A|C001|1|1.00|1.00",
            "T002|2024-01-01|North|P2|B|C001|1|2.00|2.00",
            "T003|2024-01-01|North|P3|C|C001|1|3.00|3.00",
            "T004|2024-01-01|North|P4|D|C001|1|4.00|4.00",
            "T005|2024-01-01|North|P5|E|C001|1|5.00|5.00",
            "T006|2024-01-01|North|P6|F|C001|1|6.00|6.00",
        ]);

        let top = top_products(&transactions, TOP_N).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].product_id, "P6");
        assert_eq!(top[4].product_id, "P2");
    }

    #[test]
    fn test_top_customers() {
        let top = top_customers(&sample(), TOP_N).unwrap();

        let ids: Vec<&str> = top.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["C002", "C001", "C003"]);

        assert_eq!(top[0].total_spent, dec("52.00"));
        assert_eq!(top[0].order_count, 2);
        assert_eq!(top[0].average_order_value, dec("26"));
        assert_eq!(top[0].distinct_products, 2);
    }

    #[test]
    fn test_top_customers_tie_breaks_on_order_count() {
        let transactions = txs(&[
            "T001|2024-01-01|North|P1|A|C001|1|10.00|10.00",
            "T002|2024-01-01|North|P1|A|C002|1|5.00|5.00",
            "T003|2024-01-02|North|P1|A|C002|1|5.00|5.00",
        ]);

        let top = top_customers(&transactions, TOP_N).unwrap();
        assert_eq!(top[0].customer_id, "C002");
        assert_eq!(top[1].customer_id, "C001");
    }

    #[test]
    fn test_daily_trend_is_chronological() {
        let trend = daily_trend(&sample()).unwrap();

        let dates: Vec<NaiveDate> = trend.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-05"), date("2024-01-06"), date("2024-01-07")]
        );
        assert_eq!(trend[0].revenue, dec("80.00"));
        assert_eq!(trend[0].transaction_count, 2);
        assert_eq!(trend[0].unique_customers, 2);
        assert_eq!(trend[1].revenue, dec("12.00"));
    }

    #[rstest]
    #[case::clear_winner(
        &[
            "T001|2024-01-01|North|P1|A|C001|1|10.00|10.00",
            "T002|2024-01-02|North|P1|A|C001|1|30.00|30.00",
            "T003|2024-01-03|North|P1|A|C001|1|20.00|20.00",
        ],
        "2024-01-02"
    )]
    #[case::tie_goes_to_earliest(
        &[
            "T001|2024-01-03|North|P1|A|C001|1|30.00|30.00",
            "T002|2024-01-01|North|P1|A|C001|1|30.00|30.00",
            "T003|2024-01-02|North|P1|A|C001|1|10.00|10.00",
        ],
        "2024-01-01"
    )]
    fn test_peak_day(#[case] lines: &[&str], #[case] expected: &str) {
        let trend = daily_trend(&txs(lines)).unwrap();
        assert_eq!(peak_day(&trend).unwrap().date, date(expected));
    }

    #[test]
    fn test_peak_day_empty_trend() {
        assert_eq!(peak_day(&[]), None);
    }

    #[test]
    fn test_low_performers_below_share_sorted_ascending() {
        // Total 112: P103 is 8.93%, P104 is 1.79%
        let low = low_performers(&sample(), dec("10")).unwrap();

        let ids: Vec<&str> = low.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P104", "P103"]);
    }

    #[test]
    fn test_low_performers_none_below_zero_threshold() {
        assert!(low_performers(&sample(), Decimal::ZERO).unwrap().is_empty());
    }

    #[test]
    fn test_compute_builds_every_section() {
        let sections = AnalyticsEngine::default().compute(&sample()).unwrap();

        assert_eq!(sections.summary.total_revenue, dec("112.00"));
        assert_eq!(sections.summary.transaction_count, 5);
        assert_eq!(sections.summary.average_order_value, dec("22.4"));
        assert_eq!(sections.summary.first_date, date("2024-01-05"));
        assert_eq!(sections.summary.last_date, date("2024-01-07"));
        assert_eq!(sections.regions.len(), 3);
        assert_eq!(sections.top_products.len(), 4);
        assert_eq!(sections.top_customers.len(), 3);
        assert_eq!(sections.daily_trend.len(), 3);
        assert_eq!(sections.peak_day.date, date("2024-01-05"));
        // Only P104 (1.79%) falls under the default 5%
        assert_eq!(sections.low_performers.len(), 1);
        assert_eq!(sections.low_performers[0].product_id, "P104");
    }

    #[test]
    fn test_compute_empty_set_is_computation_error() {
        let result = AnalyticsEngine::default().compute(&[]);
        assert!(matches!(result, Err(SalesError::Computation { .. })));
    }

    #[test]
    fn test_total_revenue_overflow_is_computation_error() {
        let mut transactions = txs(&["T001|2024-01-01|North|P1|A|C001|1|1.00|1.00"]);
        transactions[0].total_amount = Decimal::MAX;
        transactions.push(transactions[0].clone());

        let result = total_revenue(&transactions);
        assert!(matches!(result, Err(SalesError::Computation { .. })));
    }

    #[rstest]
    #[case::whole(dec("25"), dec("100"), dec("25"))]
    #[case::no_revenue(dec("0"), dec("0"), dec("0"))]
    #[case::too_large_to_scale(
        dec("1000000000000000000000000000"),
        dec("1000000000000000000000000000"),
        dec("100")
    )]
    fn test_share_pct(#[case] part: Decimal, #[case] total: Decimal, #[case] expected: Decimal) {
        assert_eq!(share_pct(part, total).unwrap(), expected);
    }

    #[test]
    fn test_compute_with_huge_amount_does_not_panic() {
        let mut transactions = txs(&["T001|2024-01-01|North|P1|A|C001|1|1.00|1.00"]);
        transactions[0].unit_price = dec("1000000000000000000000000000");
        transactions[0].total_amount = dec("1000000000000000000000000000");

        let sections = AnalyticsEngine::default().compute(&transactions).unwrap();

        assert_eq!(sections.regions[0].share_pct, dec("100"));
        assert!(sections.low_performers.is_empty());
    }
}
