//! Shared application state.
//!
//! Built once before the listener binds and cloned into every request.
//! Everything behind it is read-only or internally synchronized.

use std::sync::Arc;

use axum::http::HeaderName;

use crate::auth::{ConfigurationError, CredentialHasher, KeyStore, TokenService};
use crate::config::AppConfig;
use crate::database::{BudgetStore, MemoryStore, MonthStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub hasher: CredentialHasher,
    pub users: Arc<dyn UserStore>,
    pub budgets: Arc<dyn BudgetStore>,
    pub months: Arc<dyn MonthStore>,
    /// Header carrying the identity token
    pub token_header: HeaderName,
    /// Upper bound on buffered request bodies
    pub body_limit: usize,
}

impl AppState {
    /// State backed by a fresh [`MemoryStore`].
    pub fn new(config: &AppConfig, keys: Arc<KeyStore>) -> Result<Self, ConfigurationError> {
        let token_header = HeaderName::try_from(config.security.token_header.as_str()).map_err(|e| {
            ConfigurationError::InvalidSetting {
                name: "SECURITY_TOKEN_HEADER",
                reason: e.to_string(),
            }
        })?;

        let store = MemoryStore::new();

        Ok(Self {
            tokens: TokenService::from_config(keys, &config.security)?,
            hasher: CredentialHasher::new(),
            users: Arc::new(store.clone()),
            budgets: Arc::new(store.clone()),
            months: Arc::new(store),
            token_header,
            body_limit: config.api.max_request_size_bytes,
        })
    }

    pub fn with_user_store(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = users;
        self
    }

    pub fn with_budget_store(mut self, budgets: Arc<dyn BudgetStore>) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_month_store(mut self, months: Arc<dyn MonthStore>) -> Self {
        self.months = months;
        self
    }
}
