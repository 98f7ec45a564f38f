pub mod agency;
pub mod booking;
pub mod calendar;
pub mod working_hours;

pub use agency::{
    Advisor, Agency, AppointmentType, CreateAdvisorRequest, CreateAgencyRequest,
    CreateAppointmentTypeRequest, SelectionOption,
};
pub use booking::{
    Booking, BookingFilter, BookingStatus, BookingSummary, CustomerDetails, NewBooking, TimeRange,
};
pub use calendar::{
    BookedSlot, CalendarSettings, CalendarWorkingHours, SlotSelection, UnavailableBlock,
};
pub use working_hours::{BusinessHours, HoursRule, WorkingHours};
