use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub budgetid: String,
    pub userid: String,
    pub displayname: String,
    pub budgetnotes: String,
    pub accessdate: DateTime<Utc>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub displayname: Option<String>,
    pub budgetnotes: Option<String>,
    pub accessdate: Option<DateTime<Utc>>,
}

impl BudgetRecord {
    pub fn apply(&mut self, update: BudgetUpdate) {
        if let Some(displayname) = update.displayname {
            self.displayname = displayname;
        }
        if let Some(notes) = update.budgetnotes {
            self.budgetnotes = notes;
        }
        if let Some(accessdate) = update.accessdate {
            self.accessdate = accessdate;
        }
    }
}
