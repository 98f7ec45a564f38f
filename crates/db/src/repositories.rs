pub mod advisor;
pub mod agency;
pub mod appointment_type;
pub mod booking;
