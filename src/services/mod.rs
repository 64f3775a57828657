pub mod conflict;
pub mod enrollment_service;
pub mod layout;
pub mod validator;

pub use enrollment_service::{EnrollmentService, Saved};
pub use layout::{Block, LayoutWindow, Placement, WeekView};
pub use validator::{Field, ValidationReport, ValidationRules};
