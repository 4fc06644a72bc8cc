//! Storage and access layer of the expense tracker.
//!
//! [`Engine`] owns the database connection. Every operation opens its own
//! transaction, so no state is kept in memory between calls.

pub use error::{EngineError, FieldViolation};
pub use expenses::{Expense, ExpenseChanges, NewExpense};
pub use ops::{Engine, EngineBuilder};

mod error;
mod expenses;
mod ops;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
