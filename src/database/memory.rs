use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BudgetRecord, BudgetStore, BudgetUpdate, MonthRecord, MonthStore, StoreError, UserRecord, UserStore};

/// Process-local store for users, budgets and months.
#[derive(Clone, Default)]
pub struct MemoryStore {
    // keyed by email
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    // keyed by budget id, insertion order kept in `budget_order`
    budgets: Arc<RwLock<HashMap<String, BudgetRecord>>>,
    budget_order: Arc<RwLock<Vec<String>>>,
    months: Arc<RwLock<Vec<MonthRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn add_user(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.email) {
            return Err(StoreError::Duplicate(format!("email {}", record.email)));
        }
        if users.values().any(|u| u.userid == record.userid) {
            return Err(StoreError::Duplicate(format!("userid {}", record.userid)));
        }
        users.insert(record.email.clone(), record);
        Ok(())
    }

    async fn generate_user_id(&self) -> Result<String, StoreError> {
        Ok(generate_id())
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn generate_budget_id(&self) -> Result<String, StoreError> {
        Ok(generate_id())
    }

    async fn add_budget(&self, record: BudgetRecord) -> Result<(), StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets.contains_key(&record.budgetid) {
            return Err(StoreError::Duplicate(format!("budgetid {}", record.budgetid)));
        }
        self.budget_order.write().await.push(record.budgetid.clone());
        budgets.insert(record.budgetid.clone(), record);
        Ok(())
    }

    async fn get_budget(&self, budget_id: &str) -> Result<Option<BudgetRecord>, StoreError> {
        Ok(self.budgets.read().await.get(budget_id).cloned())
    }

    async fn get_budgets(&self, user_id: &str) -> Result<Vec<BudgetRecord>, StoreError> {
        let budgets = self.budgets.read().await;
        let order = self.budget_order.read().await;
        Ok(order
            .iter()
            .filter_map(|id| budgets.get(id))
            .filter(|b| b.userid == user_id)
            .cloned()
            .collect())
    }

    async fn update_budget(&self, budget_id: &str, update: BudgetUpdate) -> Result<BudgetRecord, StoreError> {
        let mut budgets = self.budgets.write().await;
        let budget = budgets
            .get_mut(budget_id)
            .ok_or_else(|| StoreError::NotFound(format!("budget {}", budget_id)))?;
        budget.apply(update);
        Ok(budget.clone())
    }

    async fn delete_budget(&self, budget_id: &str) -> Result<(), StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets.remove(budget_id).is_none() {
            return Err(StoreError::NotFound(format!("budget {}", budget_id)));
        }
        self.budget_order.write().await.retain(|id| id != budget_id);
        self.months.write().await.retain(|m| m.budgetid != budget_id);
        Ok(())
    }
}

#[async_trait]
impl MonthStore for MemoryStore {
    async fn get_months(&self, budget_id: &str) -> Result<Vec<MonthRecord>, StoreError> {
        let mut months: Vec<MonthRecord> = self
            .months
            .read()
            .await
            .iter()
            .filter(|m| m.budgetid == budget_id)
            .cloned()
            .collect();
        months.sort_by_key(|m| (m.year, m.month));
        Ok(months)
    }

    async fn add_month(&self, record: MonthRecord) -> Result<(), StoreError> {
        let mut months = self.months.write().await;
        if months.iter().any(|m| m.monthid == record.monthid) {
            return Err(StoreError::Duplicate(format!("monthid {}", record.monthid)));
        }
        months.push(record);
        Ok(())
    }
}
