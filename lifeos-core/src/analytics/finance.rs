//! Finance analyzer
//!
//! Monthly spending buckets, category breakdown, budget performance for
//! the current month, and average daily spend.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::primitives::{group_by, percentage};
use super::report::Report;
use crate::dates::month_key;
use crate::types::{BudgetRecord, ExpenseRecord};

/// Total spend in one `YYYY-MM` bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpend {
    pub month: String,
    pub amount: f64,
    pub count: usize,
}

/// One category's share of total spend.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
    pub percentage: String,
    pub count: usize,
}

/// How one budget is holding up this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    /// Spent over the cap
    Over,
    /// Spent over 80% of the cap
    Warning,
    Good,
}

/// Budget performance for the current month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: String,
    pub status: BudgetHealth,
}

/// Finance domain summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_expenses: usize,
    pub total_amount: f64,
    pub monthly_spending: Vec<MonthlySpend>,
    pub category_breakdown: Vec<CategorySpend>,
    pub budget_analysis: Vec<BudgetStatus>,
    /// Mean spend per distinct expense day, two decimals
    pub average_daily: String,
}

/// Month-keyed spending buckets, sorted by month.
pub fn monthly_spending(expenses: &[ExpenseRecord]) -> Vec<MonthlySpend> {
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for expense in expenses {
        let entry = buckets.entry(month_key(expense.day())).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(month, (amount, count))| MonthlySpend { month, amount, count })
        .collect()
}

fn category_breakdown(expenses: &[ExpenseRecord]) -> Vec<CategorySpend> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    group_by(expenses, |e| {
        if e.category.is_empty() {
            Some("other".to_string())
        } else {
            Some(e.category.clone())
        }
    })
    .into_iter()
    .map(|(category, members)| {
        let amount: f64 = members.iter().map(|e| e.amount).sum();
        CategorySpend {
            category,
            amount,
            percentage: percentage(amount, total),
            count: members.len(),
        }
    })
    .collect()
}

/// Compare each budget against this month's spend in its category.
pub fn budget_analysis(
    expenses: &[ExpenseRecord],
    budgets: &[BudgetRecord],
    today: NaiveDate,
) -> Vec<BudgetStatus> {
    let current_month = month_key(today);
    let monthly: Vec<&ExpenseRecord> = expenses
        .iter()
        .filter(|e| month_key(e.day()) == current_month)
        .collect();

    budgets
        .iter()
        .map(|budget| {
            let spent: f64 = monthly
                .iter()
                .filter(|e| e.category == budget.category)
                .map(|e| e.amount)
                .sum();
            let status = if spent > budget.amount {
                BudgetHealth::Over
            } else if spent > budget.amount * 0.8 {
                BudgetHealth::Warning
            } else {
                BudgetHealth::Good
            };
            BudgetStatus {
                category: budget.category.clone(),
                budget: budget.amount,
                spent,
                remaining: budget.amount - spent,
                percentage: percentage(spent, budget.amount),
                status,
            }
        })
        .collect()
}

fn average_daily(expenses: &[ExpenseRecord]) -> String {
    let days: BTreeSet<NaiveDate> = expenses.iter().map(|e| e.day()).collect();
    if days.is_empty() {
        return "0.00".to_string();
    }
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    format!("{:.2}", total / days.len() as f64)
}

/// Analyze the finance buckets. Empty expense list yields the sentinel.
pub fn analyze_finance(
    expenses: &[ExpenseRecord],
    budgets: &[BudgetRecord],
    today: NaiveDate,
) -> Report<FinanceSummary> {
    if expenses.is_empty() {
        return Report::empty();
    }

    Report::data(FinanceSummary {
        total_expenses: expenses.len(),
        total_amount: expenses.iter().map(|e| e.amount).sum(),
        monthly_spending: monthly_spending(expenses),
        category_breakdown: category_breakdown(expenses),
        budget_analysis: budget_analysis(expenses, budgets, today),
        average_daily: average_daily(expenses),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, day: (i32, u32, u32), amount: f64, category: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            amount,
            category: category.into(),
            description: String::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()
    }

    #[test]
    fn test_empty_yields_sentinel() {
        let report = analyze_finance(&[], &[], today());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "hasData": false })
        );
    }

    #[test]
    fn test_monthly_bucketing() {
        let expenses = vec![
            expense("e1", (2024, 3, 5), 40.0, "food"),
            expense("e2", (2024, 3, 28), 60.0, "food"),
            expense("e3", (2024, 4, 1), 10.0, "food"),
        ];
        let buckets = monthly_spending(&expenses);
        assert_eq!(
            buckets[0],
            MonthlySpend { month: "2024-03".into(), amount: 100.0, count: 2 }
        );
        assert_eq!(buckets[1].month, "2024-04");
    }

    #[test]
    fn test_category_breakdown_defaults_other() {
        let expenses = vec![
            expense("e1", (2024, 3, 5), 75.0, "food"),
            expense("e2", (2024, 3, 6), 25.0, ""),
        ];
        let report = analyze_finance(&expenses, &[], today());
        let summary = report.summary().unwrap();

        assert_eq!(summary.category_breakdown[0].category, "food");
        assert_eq!(summary.category_breakdown[0].percentage, "75.0");
        assert_eq!(summary.category_breakdown[1].category, "other");
        assert_eq!(summary.category_breakdown[1].percentage, "25.0");
    }

    #[test]
    fn test_budget_statuses() {
        let expenses = vec![
            expense("e1", (2024, 3, 5), 90.0, "food"),
            expense("e2", (2024, 3, 6), 50.0, "transport"),
            // Previous month never counts against this month's budget
            expense("e3", (2024, 2, 20), 500.0, "food"),
        ];
        let budgets = vec![
            BudgetRecord { category: "food".into(), amount: 100.0 },
            BudgetRecord { category: "transport".into(), amount: 200.0 },
            BudgetRecord { category: "fun".into(), amount: 50.0 },
        ];
        let analysis = budget_analysis(&expenses, &budgets, today());

        assert_eq!(analysis[0].status, BudgetHealth::Warning);
        assert_eq!(analysis[0].spent, 90.0);
        assert_eq!(analysis[0].remaining, 10.0);
        assert_eq!(analysis[1].status, BudgetHealth::Good);
        assert_eq!(analysis[2].status, BudgetHealth::Good);
        assert_eq!(analysis[2].spent, 0.0);
        assert_eq!(analysis[2].percentage, "0.0");
    }

    #[test]
    fn test_budget_over() {
        let expenses = vec![expense("e1", (2024, 3, 5), 120.0, "food")];
        let budgets = vec![BudgetRecord { category: "food".into(), amount: 100.0 }];
        let analysis = budget_analysis(&expenses, &budgets, today());
        assert_eq!(analysis[0].status, BudgetHealth::Over);
        assert_eq!(analysis[0].remaining, -20.0);
    }

    #[test]
    fn test_average_daily_over_distinct_days() {
        let expenses = vec![
            expense("e1", (2024, 3, 5), 30.0, "food"),
            expense("e2", (2024, 3, 5), 20.0, "food"),
            expense("e3", (2024, 3, 6), 10.0, "food"),
        ];
        let report = analyze_finance(&expenses, &[], today());
        // 60 total over 2 distinct days
        assert_eq!(report.summary().unwrap().average_daily, "30.00");
    }
}
