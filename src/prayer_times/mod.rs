pub mod aladhan;
pub mod countdown;
pub mod location;
pub mod reminder;
pub mod schedule;

pub use aladhan::AladhanClient;
pub use countdown::{next_prayer, Ticker};
pub use location::{coordinates_for, resolve_coordinates, IpLocator};
pub use reminder::upcoming_reminder;
pub use schedule::ScheduleService;
