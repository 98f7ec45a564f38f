pub mod admin;
pub mod bookings;
pub mod edit;
pub mod wizard;
