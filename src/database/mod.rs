//! Collaborator stores.
//!
//! Handlers only see these traits; persistence lives behind them. The
//! in-memory [`MemoryStore`] backs the service and the tests.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use models::{BudgetRecord, BudgetUpdate, MonthRecord, UserProfile, UserRecord};

/// Errors from a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn add_user(&self, record: UserRecord) -> Result<(), StoreError>;

    async fn generate_user_id(&self) -> Result<String, StoreError>;
}

#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn generate_budget_id(&self) -> Result<String, StoreError>;

    async fn add_budget(&self, record: BudgetRecord) -> Result<(), StoreError>;

    async fn get_budget(&self, budget_id: &str) -> Result<Option<BudgetRecord>, StoreError>;

    /// All budgets owned by `user_id`, oldest first.
    async fn get_budgets(&self, user_id: &str) -> Result<Vec<BudgetRecord>, StoreError>;

    async fn update_budget(&self, budget_id: &str, update: BudgetUpdate) -> Result<BudgetRecord, StoreError>;

    async fn delete_budget(&self, budget_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MonthStore: Send + Sync {
    async fn get_months(&self, budget_id: &str) -> Result<Vec<MonthRecord>, StoreError>;

    async fn add_month(&self, record: MonthRecord) -> Result<(), StoreError>;
}
