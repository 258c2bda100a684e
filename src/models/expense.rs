use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Expense — A stored expense record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// NewExpense — Create/update payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "categoria")]
    pub category: String,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Build from raw form fields, as typed by the user.
    pub fn from_form(description: &str, amount: &str, category: &str) -> Result<Self> {
        let (description, amount, category) = (description.trim(), amount.trim(), category.trim());
        if description.is_empty() || amount.is_empty() || category.is_empty() {
            return Err(DashboardError::InvalidArgument(
                "Please fill in every field".into(),
            ));
        }
        let amount: Decimal = amount
            .parse()
            .map_err(|_| DashboardError::InvalidArgument(format!("'{amount}' is not an amount")))?;
        let expense = Self::new(description, amount, category);
        expense.validate()?;
        Ok(expense)
    }

    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(DashboardError::InvalidArgument("Description is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(DashboardError::InvalidArgument("Category is required".into()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(DashboardError::InvalidArgument(
                "Amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Confirmation body returned by mutating calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(rename = "mensaje", default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BudgetUpdate {
    #[serde(rename = "nuevo_limite")]
    pub new_limit: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_record() {
        let raw = r#"{"id": 3, "monto": 12.5, "categoria": "Food", "fecha": "2024-05-02", "descripcion": "Tacos"}"#;
        let e: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(e.id, 3);
        assert_eq!(e.amount, Decimal::new(125, 1));
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(e.description, "Tacos");
    }

    #[test]
    fn form_requires_every_field() {
        assert!(NewExpense::from_form("", "10", "Food").is_err());
        assert!(NewExpense::from_form("Lunch", " ", "Food").is_err());
        assert!(NewExpense::from_form("Lunch", "10", "").is_err());
    }

    #[test]
    fn form_rejects_bad_amounts() {
        assert!(NewExpense::from_form("Lunch", "ten", "Food").is_err());
        assert!(NewExpense::from_form("Lunch", "0", "Food").is_err());
        assert!(NewExpense::from_form("Lunch", "-4", "Food").is_err());
    }

    #[test]
    fn form_trims_input() {
        let e = NewExpense::from_form(" Lunch ", " 9.90 ", " Food ").unwrap();
        assert_eq!(e, NewExpense::new("Lunch", Decimal::new(990, 2), "Food"));
    }

    #[test]
    fn payload_uses_wire_names() {
        let body = serde_json::to_value(NewExpense::new("Bus", Decimal::new(2, 0), "Transport")).unwrap();
        assert_eq!(body["descripcion"], "Bus");
        assert_eq!(body["categoria"], "Transport");
        assert_eq!(body["monto"], 2.0);
    }
}
