use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub monthid: String,
    pub budgetid: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub notes: String,
}
