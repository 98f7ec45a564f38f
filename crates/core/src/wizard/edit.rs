//! The appointment edit wizard.
//!
//! Editing starts by mailing a verification code to the address stored on
//! the booking. Nothing can be changed until that code is entered back.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldErrors;
use crate::models::{Booking, CustomerDetails, TimeRange};
use crate::verification::VerificationCode;

use super::booking::StepInput;
use super::fields::{CustomerForm, validate_slot};

pub const EDIT_WIZARD_ID: &str = "appointment_edit_form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStep {
    Start,
    Verify,
    ChooseTimeSlot,
    EnterCustomerDetails,
    Review,
    Success,
}

impl EditStep {
    /// Position of the step, 1 to 6.
    pub fn number(self) -> u8 {
        match self {
            EditStep::Start => 1,
            EditStep::Verify => 2,
            EditStep::ChooseTimeSlot => 3,
            EditStep::EnterCustomerDetails => 4,
            EditStep::Review => 5,
            EditStep::Success => 6,
        }
    }

    /// Whether the code has been entered, which unlocks the booking's details.
    pub fn is_verified(self) -> bool {
        self >= EditStep::ChooseTimeSlot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    Verify { code: String },
    Next { input: StepInput },
    Previous,
    EditProfile,
    EditDate,
    Submit,
}

/// New values for an existing booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingChanges {
    pub booking_id: Uuid,
    pub range: TimeRange,
    pub customer: CustomerDetails,
}

impl BookingChanges {
    pub fn apply_to(&self, booking: &Booking) -> Booking {
        Booking {
            start: self.range.start,
            end: self.range.end,
            customer: self.customer.clone(),
            updated_at: Utc::now(),
            ..booking.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTransition {
    Moved(EditDraft),
    /// Final submit: save the changes, then call [`EditDraft::completed`].
    Update(BookingChanges),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    pub step: EditStep,
    pub booking_id: Uuid,
    pub code: VerificationCode,
    /// The booking's range when editing started, excluded from availability.
    pub original: TimeRange,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub customer: CustomerForm,
}

impl EditDraft {
    /// Opens an edit session on `booking`, waiting for `code` to be entered.
    pub fn begin(booking: &Booking, code: VerificationCode) -> Self {
        Self {
            step: EditStep::Verify,
            booking_id: booking.id,
            code,
            original: booking.range(),
            start: booking.start,
            end: booking.end,
            customer: CustomerForm::from_details(&booking.customer),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }

    pub fn completed(&self) -> Self {
        Self {
            step: EditStep::Success,
            ..self.clone()
        }
    }

    fn at(&self, step: EditStep) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }

    pub fn apply(&self, action: EditAction) -> Result<EditTransition, FieldErrors> {
        match self.step {
            EditStep::Success => {
                return Err(FieldErrors::single(
                    "step",
                    "This appointment has already been updated.",
                ));
            }
            EditStep::Start | EditStep::Verify => {
                if !matches!(action, EditAction::Verify { .. } | EditAction::Previous) {
                    return Err(FieldErrors::single(
                        "verification_code",
                        "Please enter the verification code.",
                    ));
                }
            }
            _ => {}
        }

        match action {
            EditAction::Verify { code } => self.verify(&code).map(EditTransition::Moved),
            EditAction::Next { input } => self.next(input).map(EditTransition::Moved),
            EditAction::Previous => Ok(EditTransition::Moved(self.previous())),
            EditAction::EditProfile => self
                .from_review(EditStep::EnterCustomerDetails)
                .map(EditTransition::Moved),
            EditAction::EditDate => self
                .from_review(EditStep::ChooseTimeSlot)
                .map(EditTransition::Moved),
            EditAction::Submit => self.submit().map(EditTransition::Update),
        }
    }

    fn verify(&self, entered: &str) -> Result<Self, FieldErrors> {
        if self.step != EditStep::Verify {
            return Err(FieldErrors::single(
                "verification_code",
                "The code has already been verified.",
            ));
        }
        if entered.trim().is_empty() {
            return Err(FieldErrors::single(
                "verification_code",
                "Please enter the verification code.",
            ));
        }
        if !self.code.matches(entered) {
            return Err(FieldErrors::single(
                "verification_code",
                "The verification code is incorrect.",
            ));
        }
        Ok(self.at(EditStep::ChooseTimeSlot))
    }

    fn next(&self, input: StepInput) -> Result<Self, FieldErrors> {
        let mut draft = self.clone();
        match (self.step, input) {
            (EditStep::ChooseTimeSlot, StepInput::TimeSlot(selection)) => {
                let range = validate_slot(&selection)?;
                draft.start = range.start;
                draft.end = range.end;
                draft.step = EditStep::EnterCustomerDetails;
            }
            (EditStep::EnterCustomerDetails, StepInput::Customer(form)) => {
                form.validate()?;
                draft.customer = form;
                draft.step = EditStep::Review;
            }
            _ => {
                return Err(FieldErrors::single(
                    "step",
                    "The submitted values do not belong to this step.",
                ));
            }
        }
        Ok(draft)
    }

    /// Never returns to verification once the code was accepted.
    fn previous(&self) -> Self {
        let step = match self.step {
            EditStep::Start | EditStep::Verify => EditStep::Verify,
            EditStep::ChooseTimeSlot | EditStep::EnterCustomerDetails => EditStep::ChooseTimeSlot,
            EditStep::Review => EditStep::EnterCustomerDetails,
            EditStep::Success => EditStep::Success,
        };
        self.at(step)
    }

    fn from_review(&self, target: EditStep) -> Result<Self, FieldErrors> {
        if self.step != EditStep::Review {
            return Err(FieldErrors::single(
                "step",
                "Only the summary can be edited this way.",
            ));
        }
        Ok(self.at(target))
    }

    fn submit(&self) -> Result<BookingChanges, FieldErrors> {
        if self.step != EditStep::Review {
            return Err(FieldErrors::single(
                "step",
                "The changes can only be saved from the summary.",
            ));
        }
        let customer = self.customer.validate()?;
        let range = TimeRange::new(self.start, self.end)
            .map_err(|e| FieldErrors::single("start_date", &e.to_string()))?;
        Ok(BookingChanges {
            booking_id: self.booking_id,
            range,
            customer,
        })
    }
}
