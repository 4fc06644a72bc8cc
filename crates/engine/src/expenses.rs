//! The module contains the `Expense` record and its table mapping.

use sea_orm::entity::{ActiveValue, prelude::*};

/// A single expense as stored in the `expenses` table.
///
/// The `id` is assigned by the database on insert and never changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// Fields required to record a new expense.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// Partial update of an expense. `None` means "leave as stored".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseChanges {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ExpenseChanges {
    /// Overwrite the stored fields that are present in `self`.
    pub fn merge(self, mut stored: Model) -> Model {
        if let Some(amount) = self.amount {
            stored.amount = amount;
        }
        if let Some(category) = self.category {
            stored.category = category;
        }
        if let Some(description) = self.description {
            stored.description = description;
        }
        stored
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            category: model.category,
            description: model.description,
        }
    }
}

impl From<NewExpense> for ActiveModel {
    fn from(expense: NewExpense) -> Self {
        Self {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category),
            description: ActiveValue::Set(expense.description),
        }
    }
}
