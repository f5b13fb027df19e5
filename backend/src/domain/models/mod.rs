pub mod assignment;
pub mod chore;
pub mod completion;
pub mod health;
pub mod member;

pub use assignment::ChoreAssignment;
pub use chore::{Chore, RecurrenceRule, WeekdaySet};
pub use completion::CompletionRecord;
pub use health::{HealthBand, HouseHealthResult, RoomHealth};
pub use member::HouseholdMember;
