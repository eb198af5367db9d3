//! Spending statistics: calendar bucketing and chart series construction.
//!
//! The fold functions are pure; the facade fetches the owner's transactions
//! for a window and feeds them through here. A transaction whose date falls
//! outside every bucket is skipped.

use bigdecimal::BigDecimal;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Transaction, TransactionKind};

/// Income and expense sums for one calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Chart label for the bucket ("Mon", "Jan 25", "2025")
    pub label: String,
    /// First day covered by the bucket
    pub start: NaiveDate,
    /// Sum of income amounts in the bucket
    pub income: BigDecimal,
    /// Sum of expense amounts in the bucket
    pub expense: BigDecimal,
}

impl PeriodBucket {
    fn new(label: String, start: NaiveDate) -> Self {
        Self {
            label,
            start,
            income: BigDecimal::from(0),
            expense: BigDecimal::from(0),
        }
    }

    fn add(&mut self, kind: TransactionKind, amount: &BigDecimal) {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expense += amount,
        }
    }
}

/// One bar of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    /// Bar height
    pub value: BigDecimal,
    /// Bucket label; carried on the income entry of each pair only
    pub label: Option<String>,
    /// Which side of the ledger this bar shows
    pub kind: TransactionKind,
}

/// Aggregated statistics for one period, plus the transactions behind them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Alternating income/expense entries per bucket, oldest bucket first
    pub series: Vec<ChartEntry>,
    /// The transactions the report was computed from, most recent first
    pub transactions: Vec<Transaction>,
}

/// Buckets for the last seven calendar days ending at `today`, oldest first
pub fn last_seven_days(today: NaiveDate) -> Vec<PeriodBucket> {
    (0..7)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            PeriodBucket::new(day.format("%a").to_string(), day)
        })
        .collect()
}

/// Buckets for the last twelve calendar months ending at `today`'s month,
/// oldest first
pub fn last_twelve_months(today: NaiveDate) -> Vec<PeriodBucket> {
    (0..12)
        .rev()
        .map(|offset| {
            let total = today.year() * 12 + today.month0() as i32 - offset;
            let start = month_start(total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
            PeriodBucket::new(start.format("%b %y").to_string(), start)
        })
        .collect()
}

/// One bucket per calendar year from `first_year` through `last_year`
pub fn years_range(first_year: i32, last_year: i32) -> Vec<PeriodBucket> {
    let first = first_year.min(last_year);
    (first..=last_year)
        .map(|year| PeriodBucket::new(year.to_string(), month_start(year, 1)))
        .collect()
}

/// Year of the earliest transaction, or `default_year` when there are none
pub fn earliest_year(transactions: &[Transaction], default_year: i32) -> i32 {
    transactions
        .iter()
        .map(|txn| txn.date.date().year())
        .min()
        .unwrap_or(default_year)
}

/// Sum transactions into per-day buckets keyed by calendar date
pub fn fold_daily(buckets: &mut [PeriodBucket], transactions: &[Transaction]) {
    for txn in transactions {
        let day = txn.date.date();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.start == day) {
            bucket.add(txn.kind, &txn.amount);
        }
    }
}

/// Sum transactions into per-month buckets keyed by calendar year and month
pub fn fold_monthly(buckets: &mut [PeriodBucket], transactions: &[Transaction]) {
    for txn in transactions {
        let date = txn.date.date();
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.start.year() == date.year() && b.start.month() == date.month())
        {
            bucket.add(txn.kind, &txn.amount);
        }
    }
}

/// Sum transactions into per-year buckets
pub fn fold_yearly(buckets: &mut [PeriodBucket], transactions: &[Transaction]) {
    for txn in transactions {
        let year = txn.date.date().year();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.start.year() == year) {
            bucket.add(txn.kind, &txn.amount);
        }
    }
}

/// Flatten buckets into the chart series: one income entry (labelled) and
/// one expense entry per bucket, in chronological order
pub fn to_chart_series(buckets: &[PeriodBucket]) -> Vec<ChartEntry> {
    buckets
        .iter()
        .flat_map(|bucket| {
            [
                ChartEntry {
                    value: bucket.income.clone(),
                    label: Some(bucket.label.clone()),
                    kind: TransactionKind::Income,
                },
                ChartEntry {
                    value: bucket.expense.clone(),
                    label: None,
                    kind: TransactionKind::Expense,
                },
            ]
        })
        .collect()
}

fn month_start(year: i32, month: u32) -> NaiveDate {
    // month is always 1..=12 by construction
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(datetime: NaiveDateTime, kind: TransactionKind, amount: i64) -> Transaction {
        let now = chrono::Utc::now().naive_utc();
        Transaction {
            id: "t".to_string(),
            wallet_id: "w".to_string(),
            owner: "u".to_string(),
            kind,
            amount: BigDecimal::from(amount),
            category: None,
            note: None,
            receipt: None,
            date: datetime,
            created_at: now,
            updated_at: now,
        }
    }

    fn at_noon(day: NaiveDate) -> NaiveDateTime {
        day.and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn seven_day_buckets_are_chronological() {
        let buckets = last_seven_days(date(2024, 3, 10));

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].start, date(2024, 3, 4));
        assert_eq!(buckets[6].start, date(2024, 3, 10));
        // 2024-03-10 was a Sunday
        assert_eq!(buckets[6].label, "Sun");
    }

    #[test]
    fn twelve_month_buckets_cross_year_boundary() {
        let buckets = last_twelve_months(date(2024, 3, 10));

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].start, date(2023, 4, 1));
        assert_eq!(buckets[0].label, "Apr 23");
        assert_eq!(buckets[11].start, date(2024, 3, 1));
        assert_eq!(buckets[11].label, "Mar 24");
    }

    #[test]
    fn years_range_is_inclusive() {
        let buckets = years_range(2022, 2024);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["2022", "2023", "2024"]);
    }

    #[test]
    fn daily_fold_sums_per_day_and_skips_outsiders() {
        let mut buckets = last_seven_days(date(2024, 3, 10));
        let transactions = vec![
            txn(at_noon(date(2024, 3, 10)), TransactionKind::Income, 100),
            txn(at_noon(date(2024, 3, 10)), TransactionKind::Expense, 40),
            txn(at_noon(date(2024, 3, 9)), TransactionKind::Expense, 5),
            // outside the window, skipped
            txn(at_noon(date(2024, 2, 1)), TransactionKind::Income, 999),
        ];

        fold_daily(&mut buckets, &transactions);

        assert_eq!(buckets[6].income, BigDecimal::from(100));
        assert_eq!(buckets[6].expense, BigDecimal::from(40));
        assert_eq!(buckets[5].expense, BigDecimal::from(5));
        let total_income: BigDecimal = buckets.iter().map(|b| &b.income).sum();
        assert_eq!(total_income, BigDecimal::from(100));
    }

    #[test]
    fn monthly_fold_groups_by_month() {
        let mut buckets = last_twelve_months(date(2024, 3, 10));
        let transactions = vec![
            txn(at_noon(date(2024, 3, 1)), TransactionKind::Income, 10),
            txn(at_noon(date(2024, 3, 28)), TransactionKind::Income, 15),
            txn(at_noon(date(2023, 4, 2)), TransactionKind::Expense, 7),
        ];

        fold_monthly(&mut buckets, &transactions);

        assert_eq!(buckets[11].income, BigDecimal::from(25));
        assert_eq!(buckets[0].expense, BigDecimal::from(7));
    }

    #[test]
    fn yearly_fold_groups_by_year() {
        let mut buckets = years_range(2023, 2024);
        let transactions = vec![
            txn(at_noon(date(2023, 6, 1)), TransactionKind::Income, 10),
            txn(at_noon(date(2024, 6, 1)), TransactionKind::Expense, 4),
        ];

        fold_yearly(&mut buckets, &transactions);

        assert_eq!(buckets[0].income, BigDecimal::from(10));
        assert_eq!(buckets[1].expense, BigDecimal::from(4));
    }

    #[test]
    fn chart_series_alternates_income_and_expense() {
        let mut buckets = years_range(2024, 2024);
        buckets[0].income = BigDecimal::from(100);
        buckets[0].expense = BigDecimal::from(30);

        let series = to_chart_series(&buckets);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].kind, TransactionKind::Income);
        assert_eq!(series[0].value, BigDecimal::from(100));
        assert_eq!(series[0].label.as_deref(), Some("2024"));
        assert_eq!(series[1].kind, TransactionKind::Expense);
        assert_eq!(series[1].value, BigDecimal::from(30));
        assert_eq!(series[1].label, None);
    }

    #[test]
    fn earliest_year_defaults_when_empty() {
        assert_eq!(earliest_year(&[], 2024), 2024);

        let transactions = vec![
            txn(at_noon(date(2021, 1, 1)), TransactionKind::Income, 1),
            txn(at_noon(date(2023, 1, 1)), TransactionKind::Income, 1),
        ];
        assert_eq!(earliest_year(&transactions, 2024), 2021);
    }
}
