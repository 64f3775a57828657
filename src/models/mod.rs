pub mod enrollment;
pub mod time;

pub use enrollment::{Enrollment, EnrollmentDraft, Scheduled, Slot};
pub use time::{TimeOfDay, WEEK, day_code, parse_day, parse_time};
