// Alert eligibility rules.
//
// - eligibility.rs: which emails may raise an alert
// - window.rs: the active-hours gate
// - editing.rs: validation applied when filters and settings are edited

pub mod editing;
pub mod eligibility;
pub mod window;

pub use eligibility::{select_alerts, should_notify};
pub use window::in_window;
