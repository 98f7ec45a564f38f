//! # Wizard Service
//!
//! Drives the creation and edit wizards against their collaborators: the
//! record store, the notifier and the per-session draft storage.
//!
//! The pure state machines in `rendezvous_core::wizard` decide where a draft
//! goes next. This service adds what needs I/O:
//!
//! - lookup checks on the selections of steps 1 to 3
//! - the calendar of step 4 and the availability check of the chosen slot
//! - persistence and notification on submit
//!
//! A failed action never stores the draft, so the caller stays on the step
//! it was on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rendezvous_core::{
    availability::{advisor_hours_outside_agency, compute_unavailable},
    errors::{BookingError, BookingResult, FieldErrors},
    models::{
        Advisor, Agency, AppointmentType, BookedSlot, Booking, BookingFilter, BookingStatus,
        BookingSummary, CalendarSettings, CalendarWorkingHours, CreateAdvisorRequest,
        CreateAgencyRequest, CreateAppointmentTypeRequest, SelectionOption, TimeRange,
    },
    notification::{
        Notifier, format_clock, format_long_date, send_confirmation_emails,
        send_verification_code,
    },
    slot::is_selection_allowed,
    store::{BookingStore, DraftKey, SessionStore, load_draft, save_draft},
    verification::VerificationCode,
    wizard::{
        BOOKING_WIZARD_ID, BookingAction, BookingDraft, BookingStep, BookingTransition,
        CustomerForm, EDIT_WIZARD_ID, EditAction, EditDraft, EditStep, EditTransition,
        PendingBooking, StepInput, fields::is_digits,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

pub const RETRY_MESSAGE: &str =
    "An error occurred while saving your appointment. Please try again.";
pub const BOOKED_MESSAGE: &str = "Your appointment has been booked.";
pub const UPDATED_MESSAGE: &str = "Your appointment has been updated.";
pub const CODE_SENT_MESSAGE: &str = "A verification code has been sent to your email address.";
pub const CODE_NOT_SENT_MESSAGE: &str =
    "The verification code could not be sent. Please try again later.";

const INVALID_AGENCY: &str = "The selected agency is invalid.";
const INVALID_TYPE: &str = "The selected appointment type is invalid.";
const INVALID_ADVISOR: &str = "The selected advisor is invalid.";
const OUTSIDE_HOURS: &str = "Please select a time within the agency's opening hours.";
const SLOT_UNAVAILABLE: &str = "The selected time slot is not available.";

/// What the creation wizard shows for the current step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    pub step: BookingStep,
    pub step_number: u8,
    pub draft: BookingDraft,
    /// Selectable items of steps 1 to 3.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the edit wizard shows. The verification code is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditView {
    pub step: EditStep,
    pub step_number: u8,
    pub booking_id: Uuid,
    /// Where the code was mailed. Only set before verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct WizardService<S: ?Sized, N: ?Sized, T: ?Sized> {
    store: Arc<S>,
    notifier: Arc<N>,
    sessions: Arc<T>,
    langcode: String,
}

/// The service as wired into the HTTP server.
pub type DynWizardService = WizardService<dyn BookingStore, dyn Notifier, dyn SessionStore>;

fn persistence_error(err: BookingError) -> BookingError {
    match err {
        BookingError::Database(_) | BookingError::Internal(_) => {
            error!("Error saving appointment: {}", err);
            BookingError::Internal(RETRY_MESSAGE.into())
        }
        other => other,
    }
}

fn check_slot(
    agency: &Agency,
    settings: &CalendarSettings,
    range: &TimeRange,
) -> BookingResult<()> {
    if !is_selection_allowed(range.start, range.end, &agency.working_hours) {
        return Err(FieldErrors::single("start_date", OUTSIDE_HOURS).into());
    }
    if settings.unavailable.iter().any(|block| block.overlaps(range)) {
        return Err(FieldErrors::single("start_date", SLOT_UNAVAILABLE).into());
    }
    Ok(())
}

fn same_range(slot: &BookedSlot, range: Option<&TimeRange>) -> bool {
    range.is_some_and(|r| r.start == slot.start && r.end == slot.end)
}

impl<S, N, T> WizardService<S, N, T>
where
    S: BookingStore + ?Sized,
    N: Notifier + ?Sized,
    T: SessionStore + ?Sized,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        sessions: Arc<T>,
        langcode: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            sessions,
            langcode: langcode.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Creation wizard

    pub async fn view(&self, session: &str) -> BookingResult<BookingView> {
        let key = DraftKey::new(session, BOOKING_WIZARD_ID);
        let draft: BookingDraft = load_draft(&*self.sessions, &key).await?.unwrap_or_default();
        self.booking_view(draft, None).await
    }

    pub async fn toggle(&self, session: &str, id: Uuid) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::Toggle { id }).await
    }

    pub async fn next(&self, session: &str, input: StepInput) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::Next { input }).await
    }

    pub async fn previous(&self, session: &str) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::Previous).await
    }

    pub async fn edit_profile(&self, session: &str) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::EditProfile).await
    }

    pub async fn edit_date(&self, session: &str) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::EditDate).await
    }

    pub async fn submit(&self, session: &str) -> BookingResult<BookingView> {
        self.apply_booking(session, BookingAction::Submit).await
    }

    /// Discards the session's creation draft.
    pub async fn reset(&self, session: &str) -> BookingResult<()> {
        self.sessions
            .delete(&DraftKey::new(session, BOOKING_WIZARD_ID))
            .await
    }

    async fn apply_booking(
        &self,
        session: &str,
        action: BookingAction,
    ) -> BookingResult<BookingView> {
        let key = DraftKey::new(session, BOOKING_WIZARD_ID);
        let draft: BookingDraft = load_draft(&*self.sessions, &key).await?.unwrap_or_default();
        let advancing = matches!(action, BookingAction::Next { .. });

        match draft.apply(action)? {
            BookingTransition::Moved(next) => {
                if advancing {
                    self.check_step(draft.step, &next).await?;
                }
                save_draft(&*self.sessions, &key, &next).await?;
                debug!("Booking wizard for {} moved to step {}", session, next.step.number());
                self.booking_view(next, None).await
            }
            BookingTransition::Persist(pending) => self.persist(&key, &draft, pending).await,
        }
    }

    /// Checks what the pure machine cannot: that the selections of `left`
    /// refer to usable records and that the chosen slot is free.
    async fn check_step(&self, left: BookingStep, draft: &BookingDraft) -> BookingResult<()> {
        match left {
            BookingStep::ChooseAgency => {
                if let Some(id) = draft.agency_id {
                    self.load_agency(id).await?;
                }
            }
            BookingStep::ChooseAppointmentType => {
                if let Some(id) = draft.appointment_type_id {
                    self.load_appointment_type(id).await?;
                }
            }
            BookingStep::ChooseAdvisor => {
                if let Some(id) = draft.advisor_id {
                    let advisor = self.load_advisor(id).await?;
                    if !advisor.active || Some(advisor.agency_id) != draft.agency_id {
                        warn!("Advisor {} cannot be booked at agency {:?}", id, draft.agency_id);
                        return Err(BookingError::NotFound(INVALID_ADVISOR.to_string()));
                    }
                }
            }
            BookingStep::ChooseTimeSlot => {
                let (Some(agency_id), Some(advisor_id), Some(range)) =
                    (draft.agency_id, draft.advisor_id, draft.range())
                else {
                    return Err(BookingError::Validation(
                        "Please complete the previous steps first.".to_string(),
                    ));
                };
                let (agency, settings) = self.calendar(agency_id, advisor_id, None).await?;
                check_slot(&agency, &settings, &range)?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn persist(
        &self,
        key: &DraftKey,
        draft: &BookingDraft,
        pending: PendingBooking,
    ) -> BookingResult<BookingView> {
        let kind = self.load_appointment_type(pending.appointment_type_id).await?;
        let booking = self
            .store
            .create_booking(pending.into_new_booking(&kind.name))
            .await
            .map_err(persistence_error)?;
        info!("Appointment {} booked with advisor {}", booking.id, booking.advisor_id);

        send_confirmation_emails(&*self.store, &*self.notifier, booking.id, &self.langcode).await;

        if let Err(e) = self.sessions.delete(key).await {
            warn!("Could not clear booking draft for {}: {}", key.session_id, e);
        }

        let done = draft.completed();
        Ok(BookingView {
            step: done.step,
            step_number: done.step.number(),
            draft: done,
            options: Vec::new(),
            calendar: None,
            booking_id: Some(booking.id),
            message: Some(BOOKED_MESSAGE.to_string()),
        })
    }

    async fn booking_view(
        &self,
        draft: BookingDraft,
        message: Option<String>,
    ) -> BookingResult<BookingView> {
        let mut options = Vec::new();
        let mut calendar = None;

        match draft.step {
            BookingStep::ChooseAgency => {
                options = self
                    .store
                    .list_agencies(None)
                    .await?
                    .iter()
                    .map(SelectionOption::from)
                    .collect();
            }
            BookingStep::ChooseAppointmentType => {
                options = self
                    .store
                    .list_appointment_types()
                    .await?
                    .iter()
                    .map(SelectionOption::from)
                    .collect();
            }
            BookingStep::ChooseAdvisor => {
                if let Some(agency_id) = draft.agency_id {
                    options = self
                        .store
                        .list_active_advisors(agency_id)
                        .await?
                        .iter()
                        .map(SelectionOption::from)
                        .collect();
                }
            }
            BookingStep::ChooseTimeSlot => {
                if let (Some(agency_id), Some(advisor_id)) = (draft.agency_id, draft.advisor_id) {
                    let (_, mut settings) = self.calendar(agency_id, advisor_id, None).await?;
                    settings.default_start = draft.start;
                    settings.default_end = draft.end;
                    calendar = Some(settings);
                }
            }
            _ => {}
        }

        Ok(BookingView {
            step: draft.step,
            step_number: draft.step.number(),
            draft,
            options,
            calendar,
            booking_id: None,
            message,
        })
    }

    // Edit wizard

    /// Opens an edit session on a booking and mails its verification code.
    pub async fn start_edit(&self, session: &str, booking_id: Uuid) -> BookingResult<EditView> {
        let booking = self.load_booking(booking_id).await?;
        if !booking.holds_slot() {
            return Err(BookingError::Validation(
                "Cancelled appointments cannot be edited.".to_string(),
            ));
        }

        let draft = EditDraft::begin(&booking, VerificationCode::generate());
        save_draft(&*self.sessions, &DraftKey::new(session, EDIT_WIZARD_ID), &draft).await?;

        let message = self.mail_code(&booking, &draft.code).await;
        self.edit_view(draft, Some(message)).await
    }

    pub async fn edit_view_for(&self, session: &str) -> BookingResult<EditView> {
        let draft = self.load_edit_draft(session).await?;
        self.edit_view(draft, None).await
    }

    pub async fn verify(&self, session: &str, code: String) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::Verify { code }).await
    }

    /// Mails the stored code again; a new one is never generated.
    pub async fn resend(&self, session: &str) -> BookingResult<EditView> {
        let draft = self.load_edit_draft(session).await?;
        let booking = self.load_booking(draft.booking_id).await?;
        let message = self.mail_code(&booking, &draft.code).await;
        self.edit_view(draft, Some(message)).await
    }

    pub async fn edit_next(&self, session: &str, input: StepInput) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::Next { input }).await
    }

    pub async fn edit_previous(&self, session: &str) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::Previous).await
    }

    pub async fn edit_change_profile(&self, session: &str) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::EditProfile).await
    }

    pub async fn edit_change_date(&self, session: &str) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::EditDate).await
    }

    pub async fn edit_submit(&self, session: &str) -> BookingResult<EditView> {
        self.apply_edit(session, EditAction::Submit).await
    }

    async fn mail_code(&self, booking: &Booking, code: &VerificationCode) -> String {
        let sent = send_verification_code(
            &*self.notifier,
            &booking.customer.email,
            &self.langcode,
            code,
        )
        .await;
        if sent {
            CODE_SENT_MESSAGE.to_string()
        } else {
            CODE_NOT_SENT_MESSAGE.to_string()
        }
    }

    async fn load_edit_draft(&self, session: &str) -> BookingResult<EditDraft> {
        load_draft(&*self.sessions, &DraftKey::new(session, EDIT_WIZARD_ID))
            .await?
            .ok_or_else(|| BookingError::NotFound("No appointment is being edited.".to_string()))
    }

    async fn apply_edit(&self, session: &str, action: EditAction) -> BookingResult<EditView> {
        let key = DraftKey::new(session, EDIT_WIZARD_ID);
        let draft = self.load_edit_draft(session).await?;
        let verifying = matches!(action, EditAction::Verify { .. });
        let choosing_slot =
            matches!(action, EditAction::Next { .. }) && draft.step == EditStep::ChooseTimeSlot;

        let transition = draft.apply(action).map_err(|errors| {
            if verifying {
                warn!("Verification failed for appointment {}", draft.booking_id);
                BookingError::Verification(errors.to_string())
            } else {
                errors.into()
            }
        })?;

        match transition {
            EditTransition::Moved(next) => {
                if choosing_slot {
                    let booking = self.load_booking(next.booking_id).await?;
                    let (agency, settings) = self
                        .calendar(booking.agency_id, booking.advisor_id, Some(&next.original))
                        .await?;
                    check_slot(&agency, &settings, &next.range())?;
                }
                save_draft(&*self.sessions, &key, &next).await?;
                self.edit_view(next, None).await
            }
            EditTransition::Update(changes) => {
                let booking = self.load_booking(changes.booking_id).await?;
                let (agency, settings) = self
                    .calendar(booking.agency_id, booking.advisor_id, Some(&booking.range()))
                    .await?;
                check_slot(&agency, &settings, &changes.range)?;

                let saved = self
                    .store
                    .save_booking(&changes.apply_to(&booking))
                    .await
                    .map_err(persistence_error)?;
                info!("Appointment {} updated", saved.id);

                send_confirmation_emails(&*self.store, &*self.notifier, saved.id, &self.langcode)
                    .await;

                if let Err(e) = self.sessions.delete(&key).await {
                    warn!("Could not clear edit draft for {}: {}", session, e);
                }
                self.edit_view(draft.completed(), Some(UPDATED_MESSAGE.to_string()))
                    .await
                    .map(|view| EditView {
                        start: Some(saved.start),
                        end: Some(saved.end),
                        customer: Some(CustomerForm::from_details(&saved.customer)),
                        ..view
                    })
            }
        }
    }

    async fn edit_view(
        &self,
        draft: EditDraft,
        message: Option<String>,
    ) -> BookingResult<EditView> {
        let calendar = if draft.step == EditStep::ChooseTimeSlot {
            let booking = self.load_booking(draft.booking_id).await?;
            let (_, mut settings) = self
                .calendar(booking.agency_id, booking.advisor_id, Some(&draft.original))
                .await?;
            settings.default_start = Some(draft.start);
            settings.default_end = Some(draft.end);
            Some(settings)
        } else {
            None
        };

        if !draft.step.is_verified() {
            return Ok(EditView {
                step: draft.step,
                step_number: draft.step.number(),
                booking_id: draft.booking_id,
                sent_to: Some(draft.customer.email),
                start: None,
                end: None,
                customer: None,
                calendar,
                message,
            });
        }

        Ok(EditView {
            step: draft.step,
            step_number: draft.step.number(),
            booking_id: draft.booking_id,
            sent_to: None,
            start: Some(draft.start),
            end: Some(draft.end),
            customer: Some(draft.customer),
            calendar,
            message,
        })
    }

    // Shared lookups

    async fn load_agency(&self, id: Uuid) -> BookingResult<Agency> {
        self.store.get_agency(id).await?.ok_or_else(|| {
            warn!("Agency {} not found", id);
            BookingError::NotFound(INVALID_AGENCY.to_string())
        })
    }

    async fn load_appointment_type(&self, id: Uuid) -> BookingResult<AppointmentType> {
        self.store.get_appointment_type(id).await?.ok_or_else(|| {
            warn!("Appointment type {} not found", id);
            BookingError::NotFound(INVALID_TYPE.to_string())
        })
    }

    async fn load_advisor(&self, id: Uuid) -> BookingResult<Advisor> {
        self.store.get_advisor(id).await?.ok_or_else(|| {
            warn!("Advisor {} not found", id);
            BookingError::NotFound(INVALID_ADVISOR.to_string())
        })
    }

    async fn load_booking(&self, id: Uuid) -> BookingResult<Booking> {
        self.store.get_booking(id).await?.ok_or_else(|| {
            warn!("Appointment {} not found", id);
            BookingError::NotFound("Appointment not found.".to_string())
        })
    }

    async fn type_names(&self) -> BookingResult<HashMap<Uuid, String>> {
        Ok(self
            .store
            .list_appointment_types()
            .await?
            .into_iter()
            .map(|kind| (kind.id, kind.name))
            .collect())
    }

    /// Calendar settings for booking `advisor_id` at `agency_id`, skipping
    /// the appointment whose range is `excluding`.
    async fn calendar(
        &self,
        agency_id: Uuid,
        advisor_id: Uuid,
        excluding: Option<&TimeRange>,
    ) -> BookingResult<(Agency, CalendarSettings)> {
        let agency = self.load_agency(agency_id).await?;
        let advisor = self.load_advisor(advisor_id).await?;
        let type_names = self.type_names().await?;

        let booked: Vec<BookedSlot> = self
            .store
            .list_advisor_bookings(agency_id, advisor_id)
            .await?
            .iter()
            .filter(|booking| booking.holds_slot())
            .map(|booking| {
                let type_name = type_names
                    .get(&booking.appointment_type_id)
                    .map(String::as_str)
                    .unwrap_or_default();
                BookedSlot::from_booking(booking, type_name)
            })
            .collect();

        let unavailable = compute_unavailable(
            &agency.working_hours,
            &advisor.working_hours,
            &booked,
            excluding,
        );

        let settings = CalendarSettings {
            working_hours: CalendarWorkingHours {
                agency: agency.working_hours.business_hours(),
                advisor: advisor.working_hours.business_hours(),
            },
            existing_appointments: booked
                .into_iter()
                .filter(|slot| !same_range(slot, excluding))
                .collect(),
            unavailable,
            default_start: None,
            default_end: None,
        };

        Ok((agency, settings))
    }

    // Search and administration

    /// Bookings made with `phone`, newest first.
    pub async fn search_by_phone(&self, phone: &str) -> BookingResult<Vec<BookingSummary>> {
        let phone = phone.trim();
        if !is_digits(phone) {
            return Err(FieldErrors::single(
                "phone",
                "Please enter a valid phone number (numbers only).",
            )
            .into());
        }
        let bookings = self.store.find_bookings_by_phone(phone).await?;
        self.summarize(bookings).await
    }

    pub async fn list_bookings(
        &self,
        filter: &BookingFilter,
    ) -> BookingResult<Vec<BookingSummary>> {
        let bookings = self.store.list_bookings(filter).await?;
        self.summarize(bookings).await
    }

    pub async fn cancel(&self, id: Uuid) -> BookingResult<Booking> {
        let booking = self
            .store
            .set_booking_status(id, BookingStatus::Cancelled)
            .await?;
        info!("Appointment {} cancelled", id);
        Ok(booking)
    }

    pub async fn create_agency(&self, request: CreateAgencyRequest) -> BookingResult<Agency> {
        let mut errors = FieldErrors::new();
        if request.name.trim().is_empty() {
            errors.push("name", "Please enter a name.");
        }
        if request.address.trim().is_empty() {
            errors.push("address", "Please enter an address.");
        }
        errors.into_result()?;

        let agency = self.store.create_agency(request).await?;
        info!("Agency {} created: {}", agency.id, agency.name);
        Ok(agency)
    }

    /// Creates an advisor whose hours stay within the agency's opening hours.
    pub async fn create_advisor(&self, request: CreateAdvisorRequest) -> BookingResult<Advisor> {
        let mut errors = FieldErrors::new();
        if request.name.trim().is_empty() {
            errors.push("name", "Please enter a name.");
        }
        if !request.email.trim().validate_email() {
            errors.push("email", "Please enter a valid email address.");
        }
        errors.into_result()?;

        let agency = self.load_agency(request.agency_id).await?;
        let outside = advisor_hours_outside_agency(&agency.working_hours, &request.working_hours);
        if !outside.is_empty() {
            let days: Vec<String> = outside.iter().map(ToString::to_string).collect();
            return Err(BookingError::Validation(format!(
                "Advisor hours fall outside the agency's opening hours on {}",
                days.join(", ")
            )));
        }

        let advisor = self.store.create_advisor(request).await?;
        info!("Advisor {} created at agency {}", advisor.id, advisor.agency_id);
        Ok(advisor)
    }

    pub async fn create_appointment_type(
        &self,
        request: CreateAppointmentTypeRequest,
    ) -> BookingResult<AppointmentType> {
        if request.name.trim().is_empty() {
            return Err(FieldErrors::single("name", "Please enter a name.").into());
        }
        self.store.create_appointment_type(request).await
    }

    async fn summarize(&self, bookings: Vec<Booking>) -> BookingResult<Vec<BookingSummary>> {
        let agencies: HashMap<Uuid, String> = self
            .store
            .list_agencies(None)
            .await?
            .into_iter()
            .map(|agency| (agency.id, agency.name))
            .collect();
        let type_names = self.type_names().await?;
        let mut advisors: HashMap<Uuid, String> = HashMap::new();

        let mut summaries = Vec::with_capacity(bookings.len());
        for booking in bookings {
            if !advisors.contains_key(&booking.advisor_id) {
                let name = self
                    .store
                    .get_advisor(booking.advisor_id)
                    .await?
                    .map(|advisor| advisor.name)
                    .unwrap_or_default();
                advisors.insert(booking.advisor_id, name);
            }

            let lookup = |names: &HashMap<Uuid, String>, id: Uuid| {
                names.get(&id).cloned().unwrap_or_default()
            };
            summaries.push(BookingSummary {
                id: booking.id,
                formatted_date: format!(
                    "{} {}-{}",
                    format_long_date(booking.start),
                    format_clock(booking.start),
                    format_clock(booking.end)
                ),
                start: booking.start,
                end: booking.end,
                agency: lookup(&agencies, booking.agency_id),
                adviser: lookup(&advisors, booking.advisor_id),
                appointment_type: lookup(&type_names, booking.appointment_type_id),
                status: booking.status,
                title: booking.title,
            });
        }
        Ok(summaries)
    }
}
