//! # Rendezvous core
//!
//! Domain types and the pure logic of appointment booking:
//!
//! - [`availability`]: unavailable calendar blocks from working hours and
//!   existing appointments
//! - [`slot`]: whether a calendar selection fits the agency's opening hours
//! - [`wizard`]: the creation and edit wizards as state machines
//! - [`store`] and [`notification`]: the collaborators the wizards are wired to

pub mod availability;
pub mod errors;
pub mod models;
pub mod notification;
pub mod selection;
pub mod slot;
pub mod store;
pub mod verification;
pub mod wizard;
