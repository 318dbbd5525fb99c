//! # Normalization & Validation
//!
//! Canonical forms for categories and transaction types, plus the category
//! reconciliation policy used by both the manual and the AI entry paths.
//!
//! A category is normalized by trimming, collapsing inner whitespace and title
//! casing it: a letter is upper-cased when it follows a non-letter and
//! lower-cased otherwise. `"  other   (expense) "` becomes `"Other (Expense)"`.

use crate::domain::errors::{FinanceError, FinanceResult};
use crate::domain::models::TransactionType;

/// Substituted when an expense category is not in the expense list
pub const EXPENSE_FALLBACK_CATEGORY: &str = "Other (Expense)";
/// Substituted when an income category is not in the income list
pub const INCOME_FALLBACK_CATEGORY: &str = "Other (Income)";

pub fn normalize_category(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                // Multi-char uppercase expansions (e.g. "ß" -> "SS") keep only
                // the first char upper so the result stays a fixed point.
                let mut upper = c.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                    out.extend(upper.flat_map(char::to_lowercase));
                }
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

/// Collapse a raw type label onto the enum. Localized labels are accepted.
pub fn normalize_type(raw: &str) -> FinanceResult<TransactionType> {
    match normalize_category(raw).as_str() {
        "Income" | "Pemasukan" => Ok(TransactionType::Income),
        "Expense" | "Pengeluaran" => Ok(TransactionType::Expense),
        _ => Err(FinanceError::validation(format!(
            "transaction type must be Income or Expense, got '{}'",
            raw.trim()
        ))),
    }
}

pub fn fallback_category(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => INCOME_FALLBACK_CATEGORY,
        TransactionType::Expense => EXPENSE_FALLBACK_CATEGORY,
    }
}

/// Valid categories per transaction type. Both lists are normalized and always
/// end with their fallback category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLists {
    expense: Vec<String>,
    income: Vec<String>,
}

impl CategoryLists {
    pub fn new<E, I>(expense: E, income: I) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            expense: Self::normalized_list(expense, EXPENSE_FALLBACK_CATEGORY),
            income: Self::normalized_list(income, INCOME_FALLBACK_CATEGORY),
        }
    }

    fn normalized_list<T>(raw: T, fallback: &str) -> Vec<String>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for category in raw {
            let normalized = normalize_category(category.as_ref());
            if !normalized.is_empty() && !list.contains(&normalized) {
                list.push(normalized);
            }
        }
        if !list.iter().any(|c| c == fallback) {
            list.push(fallback.to_string());
        }
        list
    }

    pub fn expense(&self) -> &[String] {
        &self.expense
    }

    pub fn income(&self) -> &[String] {
        &self.income
    }

    pub fn for_type(&self, transaction_type: TransactionType) -> &[String] {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    /// Expense categories followed by income categories
    pub fn all(&self) -> Vec<String> {
        self.expense.iter().chain(self.income.iter()).cloned().collect()
    }

    pub fn contains(&self, transaction_type: TransactionType, category: &str) -> bool {
        let normalized = normalize_category(category);
        self.for_type(transaction_type).iter().any(|c| *c == normalized)
    }
}

/// Outcome of checking a category against the list for its type
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub category: String,
    /// The normalized category that was rejected, if a fallback was substituted
    pub replaced: Option<String>,
}

impl Reconciliation {
    pub fn warning(&self, transaction_type: TransactionType) -> Option<String> {
        self.replaced.as_ref().map(|rejected| {
            let list = match transaction_type {
                TransactionType::Income => "income",
                TransactionType::Expense => "expense",
            };
            format!(
                "Category '{}' is not in the {} category list; using '{}' instead",
                rejected, list, self.category
            )
        })
    }
}

/// Best-effort category policy: keep a listed category, otherwise substitute
/// the fallback for the transaction's type rather than rejecting the record.
pub fn reconcile_category(
    transaction_type: TransactionType,
    category: &str,
    lists: &CategoryLists,
) -> Reconciliation {
    let normalized = normalize_category(category);
    if lists.contains(transaction_type, &normalized) {
        Reconciliation {
            category: normalized,
            replaced: None,
        }
    } else {
        Reconciliation {
            category: fallback_category(transaction_type).to_string(),
            replaced: Some(normalized),
        }
    }
}
