//! Extractors that report malformed input as validation errors (422)
//! instead of axum's default plain-text rejections.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::ServerError;

/// JSON request body. A body that does not match `T` is reported against the
/// offending field, falling back to `body` when no field can be named.
pub struct Payload<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Name of the field a deserialization error points at.
fn failing_field(err: &serde_path_to_error::Error<serde_json::Error>) -> String {
    if err.path().iter().next().is_some() {
        return err.path().to_string();
    }
    // Missing fields are reported on the enclosing object.
    err.inner()
        .to_string()
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
        .unwrap_or("body")
        .to_string()
}

pub(crate) fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ServerError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| ServerError::invalid(&failing_field(&err), err.inner().to_string()))?;
    deserializer
        .end()
        .map_err(|err| ServerError::invalid("body", err.to_string()))?;
    Ok(value)
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(ServerError::invalid(
                "body",
                "expected request with `Content-Type: application/json`",
            ));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::invalid("body", rejection.body_text()))?;
        parse_json(&bytes).map(Self)
    }
}

/// Query string parameters.
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::invalid("query", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Integer expense id taken from the `{id}` path segment.
pub struct ExpenseId(pub i64);

impl<S> FromRequestParts<S> for ExpenseId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::invalid("id", rejection.body_text()))?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::expense::{ExpenseNew, ExpenseUpdate};

    fn rejected_field<T: DeserializeOwned>(body: &str) -> String {
        match parse_json::<T>(body.as_bytes()) {
            Err(ServerError::Validation(errors)) => errors[0].field.clone(),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("{body} was accepted"),
        }
    }

    #[test]
    fn missing_field_is_named() {
        assert_eq!(rejected_field::<ExpenseNew>(r#"{"amount":5.0}"#), "category");
        assert_eq!(
            rejected_field::<ExpenseNew>(r#"{"amount":5.0,"category":"Food"}"#),
            "description"
        );
    }

    #[test]
    fn wrong_type_is_named() {
        assert_eq!(
            rejected_field::<ExpenseNew>(
                r#"{"amount":"x","category":"Food","description":"Lunch"}"#
            ),
            "amount"
        );
        assert_eq!(
            rejected_field::<ExpenseUpdate>(r#"{"description":null}"#),
            "description"
        );
    }

    #[test]
    fn syntax_errors_fall_back_to_body() {
        assert_eq!(rejected_field::<ExpenseNew>("{not json"), "body");
        assert_eq!(rejected_field::<ExpenseNew>("[]"), "body");
        assert_eq!(
            rejected_field::<ExpenseNew>(
                r#"{"amount":1.0,"category":"Food","description":"Tea"} trailing"#
            ),
            "body"
        );
    }

    #[test]
    fn json_content_types() {
        let headers = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, value.parse().unwrap());
            headers
        };
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("application/json; charset=utf-8")));
        assert!(is_json(&headers("application/merge-patch+json")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
