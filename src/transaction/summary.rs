//! Aggregation of a user's transactions into the dashboard summaries.
//!
//! The aggregation is done in plain Rust over the user's full transaction
//! list rather than in SQL, so the category grouping rules (trim, case-fold,
//! first-seen display label) live in one testable place.

use std::collections::HashMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, auth::Claims};

use super::{PaymentMode, Transaction, TransactionType, get_transactions_by_user_in_entry_order};

/// One category's share of the user's total expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    /// The category label as it was first written by the user.
    pub category: String,
    /// The summed expense amount for this category.
    pub amount: f64,
    /// The category's share of total expenses as a percentage with one
    /// decimal place, e.g. `"66.7"`. `"0.0"` when there are no expenses.
    pub percent: String,
}

/// The dashboard totals for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Total income minus total expenses. Negative when the user spent more
    /// than they earned.
    pub total_balance: f64,
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expense: f64,
    /// Expenses grouped by category, in the order each category first
    /// appears in the transaction list.
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
}

/// The summed expenses for one payment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModeTotal {
    /// How the expenses were paid.
    pub payment_mode: PaymentMode,
    /// The summed expense amount for this payment mode.
    pub amount: f64,
}

/// Aggregate a user's transactions into the dashboard summary.
///
/// Categories are grouped case-insensitively on the trimmed label; the label
/// shown is the spelling of the category's first transaction. Income
/// transactions contribute to the totals but never to the breakdown.
pub fn compute_summary(transactions: &[Transaction]) -> Summary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    let mut entries: Vec<(String, f64)> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                total_expense += transaction.amount;

                let key = transaction.category.trim().to_lowercase();
                match index_by_key.get(&key) {
                    Some(&index) => entries[index].1 += transaction.amount,
                    None => {
                        index_by_key.insert(key, entries.len());
                        entries.push((transaction.category.clone(), transaction.amount));
                    }
                }
            }
        }
    }

    let category_breakdown = entries
        .into_iter()
        .map(|(category, amount)| {
            let percent = if total_expense == 0.0 {
                "0.0".to_owned()
            } else {
                format!("{:.1}", amount / total_expense * 100.0)
            };

            CategoryBreakdownEntry {
                category,
                amount,
                percent,
            }
        })
        .collect();

    Summary {
        total_balance: total_income - total_expense,
        total_income,
        total_expense,
        category_breakdown,
    }
}

/// Sum a user's expenses by payment mode, in the order each mode first
/// appears. Income transactions are ignored.
pub fn compute_payment_mode_summary(transactions: &[Transaction]) -> Vec<PaymentModeTotal> {
    let mut totals: Vec<PaymentModeTotal> = Vec::new();
    let mut index_by_mode: HashMap<PaymentMode, usize> = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        match index_by_mode.get(&transaction.payment_mode) {
            Some(&index) => totals[index].amount += transaction.amount,
            None => {
                index_by_mode.insert(transaction.payment_mode, totals.len());
                totals.push(PaymentModeTotal {
                    payment_mode: transaction.payment_mode,
                    amount: transaction.amount,
                });
            }
        }
    }

    totals
}

/// A route handler for the dashboard summary of the authenticated user's
/// transactions.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn summary_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let transactions = {
        let connection = state.db_connection.lock().unwrap();
        get_transactions_by_user_in_entry_order(claims.user_id()?, &connection)?
    };

    Ok(Json(compute_summary(&transactions)))
}

/// A route handler for the authenticated user's expenses summed by payment
/// mode.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn payment_mode_summary_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let transactions = {
        let connection = state.db_connection.lock().unwrap();
        get_transactions_by_user_in_entry_order(claims.user_id()?, &connection)?
    };

    Ok(Json(compute_payment_mode_summary(&transactions)))
}
