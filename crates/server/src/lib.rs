use api_types::error::{ErrorMessage, FieldError, ValidationErrors};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;

pub use server::{ServerConfig, ServerState, router, run_with_listener};

mod docs;
mod expenses;
mod extract;
mod health;
mod server;

#[derive(Debug)]
pub enum ServerError {
    /// An engine call failed while performing `action`.
    Engine {
        err: EngineError,
        action: &'static str,
    },
    NotFound(i64),
    Validation(Vec<FieldError>),
    Internal,
}

impl ServerError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

/// Wrap an engine failure with the action the handler was performing.
pub(crate) fn failed(action: &'static str) -> impl FnOnce(EngineError) -> ServerError {
    move |err| ServerError::Engine { err, action }
}

fn field_errors(err: EngineError) -> Vec<FieldError> {
    match err {
        EngineError::Validation(violations) => violations
            .into_iter()
            .map(|violation| FieldError {
                field: violation.field.to_string(),
                message: violation.message,
            })
            .collect(),
        EngineError::Database(_) => Vec::new(),
    }
}

pub(crate) fn message(status: StatusCode, detail: impl Into<String>) -> Response {
    let body = ErrorMessage {
        detail: detail.into(),
    };
    (status, Json(body)).into_response()
}

fn invalid_fields(detail: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationErrors { detail }),
    )
        .into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Engine {
                err: err @ EngineError::Validation(_),
                ..
            } => invalid_fields(field_errors(err)),
            ServerError::Engine {
                err: EngineError::Database(db_err),
                action,
            } => {
                tracing::error!("database error while trying to {action}: {db_err}");
                message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to {action}"),
                )
            }
            ServerError::NotFound(id) => message(
                StatusCode::NOT_FOUND,
                format!("Expense with ID {id} not found"),
            ),
            ServerError::Validation(errors) => invalid_fields(errors),
            ServerError::Internal => {
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::FieldViolation;
    use sea_orm::DbErr;

    #[test]
    fn engine_validation_maps_to_422() {
        let err = EngineError::Validation(vec![FieldViolation {
            field: "amount",
            message: "must be greater than 0".to_string(),
        }]);
        let res = failed("create expense")(err).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let err = EngineError::Database(DbErr::Custom("disk full".to_string()));
        let res = failed("create expense")(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::NotFound(9999).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn request_validation_maps_to_422() {
        let res = ServerError::invalid("limit", "must be at most 1000").into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ServerError::Internal.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
