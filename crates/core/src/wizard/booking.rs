//! The appointment creation wizard as a pure state machine.
//!
//! A [`BookingDraft`] is never mutated in place: [`BookingDraft::apply`]
//! returns the next draft, or the field errors that keep the caller on the
//! current one. Collected fields survive forward and backward navigation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldErrors;
use crate::models::{BookingStatus, CustomerDetails, NewBooking, SlotSelection, TimeRange};
use crate::selection::select;

use super::fields::{CustomerForm, validate_slot};

pub const BOOKING_WIZARD_ID: &str = "appointment_add_form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    ChooseAgency,
    ChooseAppointmentType,
    ChooseAdvisor,
    ChooseTimeSlot,
    EnterCustomerDetails,
    Review,
    Success,
}

impl BookingStep {
    /// Position of the step, 1 to 7.
    pub fn number(self) -> u8 {
        match self {
            BookingStep::ChooseAgency => 1,
            BookingStep::ChooseAppointmentType => 2,
            BookingStep::ChooseAdvisor => 3,
            BookingStep::ChooseTimeSlot => 4,
            BookingStep::EnterCustomerDetails => 5,
            BookingStep::Review => 6,
            BookingStep::Success => 7,
        }
    }

    fn following(self) -> Self {
        match self {
            BookingStep::ChooseAgency => BookingStep::ChooseAppointmentType,
            BookingStep::ChooseAppointmentType => BookingStep::ChooseAdvisor,
            BookingStep::ChooseAdvisor => BookingStep::ChooseTimeSlot,
            BookingStep::ChooseTimeSlot => BookingStep::EnterCustomerDetails,
            BookingStep::EnterCustomerDetails => BookingStep::Review,
            BookingStep::Review | BookingStep::Success => BookingStep::Success,
        }
    }

    fn preceding(self) -> Self {
        match self {
            BookingStep::ChooseAgency | BookingStep::ChooseAppointmentType => {
                BookingStep::ChooseAgency
            }
            BookingStep::ChooseAdvisor => BookingStep::ChooseAppointmentType,
            BookingStep::ChooseTimeSlot => BookingStep::ChooseAdvisor,
            BookingStep::EnterCustomerDetails => BookingStep::ChooseTimeSlot,
            BookingStep::Review => BookingStep::EnterCustomerDetails,
            BookingStep::Success => BookingStep::Success,
        }
    }
}

/// Values submitted with a "next" action, one variant per input step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    Agency {
        selected_agency: Option<Uuid>,
    },
    AppointmentType {
        selected_type: Option<Uuid>,
    },
    Advisor {
        selected_advisor: Option<Uuid>,
    },
    TimeSlot(SlotSelection),
    Customer(CustomerForm),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BookingAction {
    /// Click on a selectable item of steps 1 to 3.
    Toggle { id: Uuid },
    Next { input: StepInput },
    Previous,
    EditProfile,
    EditDate,
    Submit,
}

/// Everything needed to persist the booking except its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBooking {
    pub agency_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_type_id: Uuid,
    pub range: TimeRange,
    pub customer: CustomerDetails,
}

impl PendingBooking {
    /// Titles the booking `"{type} appointment on {dd-mm-yyyy HH:MM}"`.
    pub fn into_new_booking(self, type_name: &str) -> NewBooking {
        NewBooking {
            title: format!(
                "{} appointment on {}",
                type_name,
                self.range.start.format("%d-%m-%Y %H:%M")
            ),
            agency_id: self.agency_id,
            advisor_id: self.advisor_id,
            appointment_type_id: self.appointment_type_id,
            range: self.range,
            customer: self.customer,
            status: BookingStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingTransition {
    /// The wizard moved (or stayed) without side effects.
    Moved(BookingDraft),
    /// Final submit: persist, then call [`BookingDraft::completed`].
    Persist(PendingBooking),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub step: BookingStep,
    pub agency_id: Option<Uuid>,
    pub appointment_type_id: Option<Uuid>,
    pub advisor_id: Option<Uuid>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub customer: CustomerForm,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingDraft {
    pub fn new() -> Self {
        Self {
            step: BookingStep::ChooseAgency,
            agency_id: None,
            appointment_type_id: None,
            advisor_id: None,
            start: None,
            end: None,
            customer: CustomerForm::default(),
        }
    }

    pub fn range(&self) -> Option<TimeRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => TimeRange::new(start, end).ok(),
            _ => None,
        }
    }

    /// The terminal draft shown after a successful submit.
    pub fn completed(&self) -> Self {
        Self {
            step: BookingStep::Success,
            ..self.clone()
        }
    }

    fn at(&self, step: BookingStep) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }

    pub fn apply(&self, action: BookingAction) -> Result<BookingTransition, FieldErrors> {
        if self.step == BookingStep::Success {
            return Err(FieldErrors::single(
                "step",
                "This appointment has already been booked.",
            ));
        }

        match action {
            BookingAction::Toggle { id } => self.toggle(id).map(BookingTransition::Moved),
            BookingAction::Next { input } => self.next(input).map(BookingTransition::Moved),
            BookingAction::Previous => Ok(BookingTransition::Moved(self.at(self.step.preceding()))),
            BookingAction::EditProfile => self
                .from_review(BookingStep::EnterCustomerDetails)
                .map(BookingTransition::Moved),
            BookingAction::EditDate => self
                .from_review(BookingStep::ChooseTimeSlot)
                .map(BookingTransition::Moved),
            BookingAction::Submit => self.submit().map(BookingTransition::Persist),
        }
    }

    fn toggle(&self, id: Uuid) -> Result<Self, FieldErrors> {
        let mut draft = self.clone();
        match self.step {
            BookingStep::ChooseAgency => draft.agency_id = select(self.agency_id, id),
            BookingStep::ChooseAppointmentType => {
                draft.appointment_type_id = select(self.appointment_type_id, id)
            }
            BookingStep::ChooseAdvisor => draft.advisor_id = select(self.advisor_id, id),
            _ => {
                return Err(FieldErrors::single(
                    "step",
                    "Nothing can be selected on this step.",
                ));
            }
        }
        Ok(draft)
    }

    fn next(&self, input: StepInput) -> Result<Self, FieldErrors> {
        let mut draft = self.clone();
        match (self.step, input) {
            (BookingStep::ChooseAgency, StepInput::Agency { selected_agency }) => {
                draft.agency_id = Some(selected_agency.ok_or_else(|| {
                    FieldErrors::single("selected_agency", "Please select an agency.")
                })?);
            }
            (BookingStep::ChooseAppointmentType, StepInput::AppointmentType { selected_type }) => {
                draft.appointment_type_id = Some(selected_type.ok_or_else(|| {
                    FieldErrors::single("selected_type", "Please select an appointment type.")
                })?);
            }
            (BookingStep::ChooseAdvisor, StepInput::Advisor { selected_advisor }) => {
                draft.advisor_id = Some(selected_advisor.ok_or_else(|| {
                    FieldErrors::single("selected_advisor", "Please select an advisor.")
                })?);
            }
            (BookingStep::ChooseTimeSlot, StepInput::TimeSlot(selection)) => {
                let range = validate_slot(&selection)?;
                draft.start = Some(range.start);
                draft.end = Some(range.end);
            }
            (BookingStep::EnterCustomerDetails, StepInput::Customer(form)) => {
                form.validate()?;
                draft.customer = form;
            }
            (BookingStep::Review, _) => {
                return Err(FieldErrors::single(
                    "step",
                    "Please confirm or edit the appointment.",
                ));
            }
            _ => {
                return Err(FieldErrors::single(
                    "step",
                    "The submitted values do not belong to this step.",
                ));
            }
        }
        draft.step = self.step.following();
        Ok(draft)
    }

    fn from_review(&self, target: BookingStep) -> Result<Self, FieldErrors> {
        if self.step != BookingStep::Review {
            return Err(FieldErrors::single(
                "step",
                "Only the summary can be edited this way.",
            ));
        }
        Ok(self.at(target))
    }

    fn submit(&self) -> Result<PendingBooking, FieldErrors> {
        if self.step != BookingStep::Review {
            return Err(FieldErrors::single(
                "step",
                "The appointment can only be submitted from the summary.",
            ));
        }

        let mut errors = FieldErrors::new();
        if self.agency_id.is_none() {
            errors.push("selected_agency", "Please select an agency.");
        }
        if self.appointment_type_id.is_none() {
            errors.push("selected_type", "Please select an appointment type.");
        }
        if self.advisor_id.is_none() {
            errors.push("selected_advisor", "Please select an advisor.");
        }
        let range = self.range();
        if range.is_none() {
            errors.push("start_date", "Please select a start date and time.");
        }
        let customer = match self.customer.validate() {
            Ok(customer) => Some(customer),
            Err(customer_errors) => {
                for e in customer_errors.iter() {
                    errors.push(&e.field, &e.message);
                }
                None
            }
        };

        match (
            self.agency_id,
            self.appointment_type_id,
            self.advisor_id,
            range,
            customer,
        ) {
            (
                Some(agency_id),
                Some(appointment_type_id),
                Some(advisor_id),
                Some(range),
                Some(customer),
            ) if errors.is_empty() => {
                Ok(PendingBooking {
                    agency_id,
                    advisor_id,
                    appointment_type_id,
                    range,
                    customer,
                })
            }
            _ => Err(errors),
        }
    }
}
