//! Expense API endpoints.

use api_types::{
    error::{ErrorMessage, ValidationErrors},
    expense::{ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Expense, ExpenseChanges, NewExpense};

use crate::{
    ServerError,
    extract::{ExpenseId, Params, Payload},
    failed,
    server::ServerState,
};

const MAX_LIMIT: i64 = 1000;

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount,
        category: expense.category,
        description: expense.description,
    }
}

fn map_expenses(expenses: Vec<Expense>) -> Vec<ExpenseView> {
    expenses.into_iter().map(map_expense).collect()
}

/// Check the pagination bounds and convert them for the engine.
fn page(params: ExpenseListQuery) -> Result<(u64, u64), ServerError> {
    let skip = u64::try_from(params.skip)
        .map_err(|_| ServerError::invalid("skip", "must be greater than or equal to 0"))?;
    if params.limit < 1 {
        return Err(ServerError::invalid(
            "limit",
            "must be greater than or equal to 1",
        ));
    }
    if params.limit > MAX_LIMIT {
        return Err(ServerError::invalid(
            "limit",
            format!("must be less than or equal to {MAX_LIMIT}"),
        ));
    }
    // `limit` is in 1..=MAX_LIMIT here.
    Ok((skip, params.limit.unsigned_abs()))
}

#[utoipa::path(
    post,
    path = "/expenses",
    tag = "expenses",
    request_body = ExpenseNew,
    responses(
        (status = 201, description = "Expense stored", body = ExpenseView),
        (status = 422, description = "Invalid or malformed body", body = ValidationErrors),
        (status = 500, description = "Store failure", body = ErrorMessage),
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Payload(payload): Payload<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(NewExpense {
            amount: payload.amount,
            category: payload.category,
            description: payload.description,
        })
        .await
        .map_err(failed("create expense"))?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

#[utoipa::path(
    get,
    path = "/expenses",
    tag = "expenses",
    params(ExpenseListQuery),
    responses(
        (status = 200, description = "One page of expenses in id order", body = [ExpenseView]),
        (status = 422, description = "Pagination out of range", body = ValidationErrors),
        (status = 500, description = "Store failure", body = ErrorMessage),
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Params(params): Params<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let (skip, limit) = page(params)?;
    let expenses = state
        .engine
        .list_expenses(skip, limit)
        .await
        .map_err(failed("fetch expenses"))?;
    Ok(Json(map_expenses(expenses)))
}

#[utoipa::path(
    get,
    path = "/expenses/{id}",
    tag = "expenses",
    params(("id" = i64, Path, description = "Expense id")),
    responses(
        (status = 200, description = "The expense", body = ExpenseView),
        (status = 404, description = "No expense with this id", body = ErrorMessage),
        (status = 422, description = "Id is not an integer", body = ValidationErrors),
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    ExpenseId(id): ExpenseId,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .expense(id)
        .await
        .map_err(failed("fetch expense"))?
        .ok_or(ServerError::NotFound(id))?;
    Ok(Json(map_expense(expense)))
}

#[utoipa::path(
    put,
    path = "/expenses/{id}",
    tag = "expenses",
    params(("id" = i64, Path, description = "Expense id")),
    request_body(content = ExpenseUpdate, description = "Fields to change; omitted fields keep their value"),
    responses(
        (status = 200, description = "The updated expense", body = ExpenseView),
        (status = 404, description = "No expense with this id", body = ErrorMessage),
        (status = 422, description = "Invalid or malformed body", body = ValidationErrors),
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ExpenseId(id): ExpenseId,
    Payload(payload): Payload<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let changes = ExpenseChanges {
        amount: payload.amount,
        category: payload.category,
        description: payload.description,
    };
    let expense = state
        .engine
        .update_expense(id, changes)
        .await
        .map_err(failed("update expense"))?
        .ok_or(ServerError::NotFound(id))?;
    Ok(Json(map_expense(expense)))
}

#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    tag = "expenses",
    params(("id" = i64, Path, description = "Expense id")),
    responses(
        (status = 204, description = "Expense removed"),
        (status = 404, description = "No expense with this id", body = ErrorMessage),
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    ExpenseId(id): ExpenseId,
) -> Result<StatusCode, ServerError> {
    let deleted = state
        .engine
        .delete_expense(id)
        .await
        .map_err(failed("delete expense"))?;
    if !deleted {
        return Err(ServerError::NotFound(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/expenses/category/{category}",
    tag = "expenses",
    params(("category" = String, Path, description = "Exact, case-sensitive category")),
    responses(
        (status = 200, description = "Every expense in the category", body = [ExpenseView]),
    )
)]
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .expenses_by_category(&category)
        .await
        .map_err(failed("fetch expenses by category"))?;
    Ok(Json(map_expenses(expenses)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(skip: i64, limit: i64) -> ExpenseListQuery {
        ExpenseListQuery { skip, limit }
    }

    #[test]
    fn page_accepts_bounds() {
        assert_eq!(page(params(0, 1)).unwrap(), (0, 1));
        assert_eq!(page(params(5, 1000)).unwrap(), (5, 1000));
        assert_eq!(page(ExpenseListQuery::default()).unwrap(), (0, 100));
    }

    #[test]
    fn page_rejects_out_of_range() {
        assert!(matches!(page(params(-1, 10)), Err(ServerError::Validation(_))));
        assert!(matches!(page(params(0, 0)), Err(ServerError::Validation(_))));
        assert!(matches!(page(params(0, 1001)), Err(ServerError::Validation(_))));
    }
}
