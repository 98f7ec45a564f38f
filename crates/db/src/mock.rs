pub mod repositories;

pub use repositories::{MockMailer, MockSessions, MockStore};
