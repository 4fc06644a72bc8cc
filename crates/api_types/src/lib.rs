use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Deserialize a field that may be omitted but must not be `null`.
///
/// Combined with `#[serde(default)]`, an absent key stays `None` while an
/// explicit `null` is rejected by the inner type's deserializer.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub mod expense {
    use super::*;

    pub const DEFAULT_SKIP: i64 = 0;
    pub const DEFAULT_LIMIT: i64 = 100;

    #[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
    pub struct ExpenseNew {
        #[schema(exclusive_minimum = 0.0)]
        pub amount: f64,
        #[schema(min_length = 2, max_length = 50)]
        pub category: String,
        #[schema(min_length = 3, max_length = 200)]
        pub description: String,
    }

    /// Partial update. Keys left out of the request body keep the stored value.
    #[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
    pub struct ExpenseUpdate {
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        #[schema(exclusive_minimum = 0.0)]
        pub amount: Option<f64>,
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        #[schema(min_length = 2, max_length = 50)]
        pub category: Option<String>,
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        #[schema(min_length = 3, max_length = 200)]
        pub description: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
    pub struct ExpenseView {
        pub id: i64,
        pub amount: f64,
        pub category: String,
        pub description: String,
    }

    /// Query parameters of the paginated listing.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, IntoParams)]
    #[into_params(parameter_in = Query)]
    pub struct ExpenseListQuery {
        /// Number of expenses to pass over.
        #[serde(default = "default_skip")]
        #[param(minimum = 0, default = 0)]
        pub skip: i64,
        /// Maximum number of expenses returned.
        #[serde(default = "default_limit")]
        #[param(minimum = 1, maximum = 1000, default = 100)]
        pub limit: i64,
    }

    impl Default for ExpenseListQuery {
        fn default() -> Self {
            Self {
                skip: DEFAULT_SKIP,
                limit: DEFAULT_LIMIT,
            }
        }
    }

    fn default_skip() -> i64 {
        DEFAULT_SKIP
    }

    fn default_limit() -> i64 {
        DEFAULT_LIMIT
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub struct HealthCheck {
        pub status: String,
        pub database: String,
    }

    impl HealthCheck {
        pub fn healthy() -> Self {
            Self {
                status: "healthy".to_string(),
                database: "healthy".to_string(),
            }
        }

        pub fn unhealthy() -> Self {
            Self {
                status: "unhealthy".to_string(),
                database: "unhealthy".to_string(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
    pub struct AppInfo {
        pub message: String,
        pub version: String,
        pub docs: String,
    }
}

pub mod error {
    use super::*;

    /// One failed constraint on one input field.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Body of a 422 response.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub struct ValidationErrors {
        pub detail: Vec<FieldError>,
    }

    /// Body of 404, 500 and 503 responses.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    pub struct ErrorMessage {
        pub detail: String,
    }
}

#[cfg(test)]
mod tests {
    use super::expense::{ExpenseListQuery, ExpenseUpdate};

    #[test]
    fn update_distinguishes_absent_from_present() {
        let update: ExpenseUpdate = serde_json::from_str(r#"{"category":"Travel"}"#).unwrap();
        assert_eq!(update.category.as_deref(), Some("Travel"));
        assert!(update.amount.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn update_rejects_explicit_null() {
        let err = serde_json::from_str::<ExpenseUpdate>(r#"{"amount":null}"#);
        assert!(err.is_err());
    }

    #[test]
    fn list_params_default_when_missing() {
        let params: ExpenseListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);
    }
}
