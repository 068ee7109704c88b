pub mod budget;
pub mod month;
pub mod user;

pub use budget::{BudgetRecord, BudgetUpdate};
pub use month::MonthRecord;
pub use user::{UserProfile, UserRecord};
