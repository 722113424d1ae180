use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Category {id} is used by {expenses} expense(s)")]
    CategoryInUse { id: Uuid, expenses: usize },
    #[error("Income source not found: {0}")]
    IncomeNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// `true` for the unknown-id family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::IncomeNotFound(_)
                | CoreError::ExpenseNotFound(_)
                | CoreError::CategoryNotFound(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
