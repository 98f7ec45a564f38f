pub mod booking;
pub mod edit;
pub mod fields;

pub use booking::{
    BOOKING_WIZARD_ID, BookingAction, BookingDraft, BookingStep, BookingTransition,
    PendingBooking, StepInput,
};
pub use edit::{BookingChanges, EDIT_WIZARD_ID, EditAction, EditDraft, EditStep, EditTransition};
pub use fields::CustomerForm;
