use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{Expense, ExpenseChanges, NewExpense, ResultEngine, expenses};

use super::{Engine, with_tx};

impl Engine {
    /// Insert a new expense and return it with the id assigned by the store.
    pub async fn create_expense(&self, expense: NewExpense) -> ResultEngine<Expense> {
        expense.validate()?;
        let model = with_tx!(self, |db_tx| {
            let active: expenses::ActiveModel = expense.into();
            Ok(active.insert(&db_tx).await?)
        })?;
        tracing::info!("created expense with id {}", model.id);
        Ok(model.into())
    }

    /// Page through expenses in ascending id order.
    pub async fn list_expenses(&self, skip: u64, limit: u64) -> ResultEngine<Vec<Expense>> {
        let models = with_tx!(self, |db_tx| {
            Ok(expenses::Entity::find()
                .order_by_asc(expenses::Column::Id)
                .offset(skip)
                .limit(limit)
                .all(&db_tx)
                .await?)
        })?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Return the expense with `id`, or `None` if there is no such row.
    pub async fn expense(&self, id: i64) -> ResultEngine<Option<Expense>> {
        let model = with_tx!(self, |db_tx| {
            Ok(expenses::Entity::find_by_id(id).one(&db_tx).await?)
        })?;
        Ok(model.map(Expense::from))
    }

    /// Apply `changes` to the expense with `id`.
    ///
    /// Returns `None` without writing anything when the row does not exist.
    /// Fields absent from `changes` keep their stored value.
    pub async fn update_expense(
        &self,
        id: i64,
        changes: ExpenseChanges,
    ) -> ResultEngine<Option<Expense>> {
        changes.validate()?;
        let model = with_tx!(self, |db_tx| {
            let Some(stored) = expenses::Entity::find_by_id(id).one(&db_tx).await? else {
                return Ok(None);
            };

            let merged = changes.merge(stored.clone());
            if merged == stored {
                return Ok(Some(stored));
            }

            let active = expenses::ActiveModel {
                id: ActiveValue::Unchanged(merged.id),
                amount: ActiveValue::Set(merged.amount),
                category: ActiveValue::Set(merged.category),
                description: ActiveValue::Set(merged.description),
            };
            Ok(Some(active.update(&db_tx).await?))
        })?;

        if model.is_some() {
            tracing::info!("updated expense with id {id}");
        }
        Ok(model.map(Expense::from))
    }

    /// Delete the expense with `id`. Returns `false` if there was nothing to delete.
    pub async fn delete_expense(&self, id: i64) -> ResultEngine<bool> {
        let deleted = with_tx!(self, |db_tx| {
            if expenses::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Ok(false);
            }
            expenses::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(true)
        })?;

        if deleted {
            tracing::info!("deleted expense with id {id}");
        }
        Ok(deleted)
    }

    /// All expenses whose category matches exactly (case-sensitive), by ascending id.
    pub async fn expenses_by_category(&self, category: &str) -> ResultEngine<Vec<Expense>> {
        let models = with_tx!(self, |db_tx| {
            Ok(expenses::Entity::find()
                .filter(expenses::Column::Category.eq(category))
                .order_by_asc(expenses::Column::Id)
                .all(&db_tx)
                .await?)
        })?;
        Ok(models.into_iter().map(Expense::from).collect())
    }
}
