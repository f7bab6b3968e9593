//! Domain models for the fulfillment router.

pub mod assignment;
pub mod order;
pub mod print_center;
pub mod session;

pub use assignment::{Assignment, TrackingCenter, TrackingView};
pub use order::{NewOrder, Order};
pub use print_center::PrintCenter;
pub use session::{CurrentStaff, keys as session_keys};
