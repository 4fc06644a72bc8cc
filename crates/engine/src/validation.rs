//! Field constraints shared by create and update.
//!
//! Lengths are counted in characters, not bytes.

use crate::{EngineError, ExpenseChanges, FieldViolation, NewExpense, ResultEngine};

pub const CATEGORY_MIN_LEN: usize = 2;
pub const CATEGORY_MAX_LEN: usize = 50;
pub const DESCRIPTION_MIN_LEN: usize = 3;
pub const DESCRIPTION_MAX_LEN: usize = 200;

fn check_amount(amount: f64, violations: &mut Vec<FieldViolation>) {
    // NaN fails the comparison too.
    if !(amount > 0.0) {
        violations.push(FieldViolation {
            field: "amount",
            message: "must be greater than 0".to_string(),
        });
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) {
    let len = value.chars().count();
    if len < min {
        violations.push(FieldViolation {
            field,
            message: format!("must be at least {min} characters"),
        });
    } else if len > max {
        violations.push(FieldViolation {
            field,
            message: format!("must be at most {max} characters"),
        });
    }
}

fn finish(violations: Vec<FieldViolation>) -> ResultEngine<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(violations))
    }
}

impl NewExpense {
    /// Check every field, collecting all violations.
    pub fn validate(&self) -> ResultEngine<()> {
        let mut violations = Vec::new();
        check_amount(self.amount, &mut violations);
        check_length(
            "category",
            &self.category,
            CATEGORY_MIN_LEN,
            CATEGORY_MAX_LEN,
            &mut violations,
        );
        check_length(
            "description",
            &self.description,
            DESCRIPTION_MIN_LEN,
            DESCRIPTION_MAX_LEN,
            &mut violations,
        );
        finish(violations)
    }
}

impl ExpenseChanges {
    /// Check only the fields that are present.
    pub fn validate(&self) -> ResultEngine<()> {
        let mut violations = Vec::new();
        if let Some(amount) = self.amount {
            check_amount(amount, &mut violations);
        }
        if let Some(category) = &self.category {
            check_length(
                "category",
                category,
                CATEGORY_MIN_LEN,
                CATEGORY_MAX_LEN,
                &mut violations,
            );
        }
        if let Some(description) = &self.description {
            check_length(
                "description",
                description,
                DESCRIPTION_MIN_LEN,
                DESCRIPTION_MAX_LEN,
                &mut violations,
            );
        }
        finish(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, category: &str, description: &str) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_string(),
            description: description.to_string(),
        }
    }

    fn fields(err: EngineError) -> Vec<&'static str> {
        match err {
            EngineError::Validation(violations) => violations.iter().map(|v| v.field).collect(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_values_on_the_bounds() {
        assert!(expense(0.01, "ab", "abc").validate().is_ok());
        assert!(expense(1.0, &"c".repeat(50), &"d".repeat(200)).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert_eq!(fields(expense(0.0, "Food", "Lunch").validate().unwrap_err()), ["amount"]);
        assert_eq!(fields(expense(-5.0, "Food", "Lunch").validate().unwrap_err()), ["amount"]);
        assert_eq!(
            fields(expense(f64::NAN, "Food", "Lunch").validate().unwrap_err()),
            ["amount"]
        );
    }

    #[test]
    fn reports_every_failing_field() {
        let err = expense(0.0, "F", &"x".repeat(201)).validate().unwrap_err();
        assert_eq!(fields(err), ["amount", "category", "description"]);
    }

    #[test]
    fn length_counts_characters() {
        // Two characters, four bytes.
        assert!(expense(1.0, "éé", "abc").validate().is_ok());
        assert!(expense(1.0, "€", "abc").validate().is_err());
    }

    #[test]
    fn changes_only_check_present_fields() {
        assert!(ExpenseChanges::default().validate().is_ok());

        let changes = ExpenseChanges {
            category: Some("Travel".to_string()),
            ..Default::default()
        };
        assert!(changes.validate().is_ok());

        let changes = ExpenseChanges {
            amount: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(fields(changes.validate().unwrap_err()), ["amount"]);
    }
}
