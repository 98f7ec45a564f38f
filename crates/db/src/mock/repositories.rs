use async_trait::async_trait;
use mockall::mock;
use rendezvous_core::errors::BookingResult;
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, Booking, BookingFilter, BookingStatus, CreateAdvisorRequest,
    CreateAgencyRequest, CreateAppointmentTypeRequest, NewBooking,
};
use rendezvous_core::notification::{MailParams, Notifier};
use rendezvous_core::store::{BookingStore, DraftKey, SessionStore};
use uuid::Uuid;

// Mock collaborators for testing
mock! {
    pub Store {}

    #[async_trait]
    impl BookingStore for Store {
        async fn list_agencies(&self, name: Option<String>) -> BookingResult<Vec<Agency>>;

        async fn get_agency(&self, id: Uuid) -> BookingResult<Option<Agency>>;

        async fn create_agency(&self, request: CreateAgencyRequest) -> BookingResult<Agency>;

        async fn get_advisor(&self, id: Uuid) -> BookingResult<Option<Advisor>>;

        async fn list_active_advisors(&self, agency_id: Uuid) -> BookingResult<Vec<Advisor>>;

        async fn create_advisor(&self, request: CreateAdvisorRequest) -> BookingResult<Advisor>;

        async fn list_appointment_types(&self) -> BookingResult<Vec<AppointmentType>>;

        async fn get_appointment_type(&self, id: Uuid) -> BookingResult<Option<AppointmentType>>;

        async fn create_appointment_type(
            &self,
            request: CreateAppointmentTypeRequest,
        ) -> BookingResult<AppointmentType>;

        async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>>;

        async fn list_advisor_bookings(
            &self,
            agency_id: Uuid,
            advisor_id: Uuid,
        ) -> BookingResult<Vec<Booking>>;

        async fn find_bookings_by_phone(&self, phone: &str) -> BookingResult<Vec<Booking>>;

        async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>>;

        async fn create_booking(&self, booking: NewBooking) -> BookingResult<Booking>;

        async fn save_booking(&self, booking: &Booking) -> BookingResult<Booking>;

        async fn set_booking_status(
            &self,
            id: Uuid,
            status: BookingStatus,
        ) -> BookingResult<Booking>;
    }
}

mock! {
    pub Sessions {}

    #[async_trait]
    impl SessionStore for Sessions {
        async fn get(&self, key: &DraftKey) -> BookingResult<Option<serde_json::Value>>;

        async fn set(&self, key: &DraftKey, value: serde_json::Value) -> BookingResult<()>;

        async fn delete(&self, key: &DraftKey) -> BookingResult<()>;
    }
}

mock! {
    pub Mailer {}

    #[async_trait]
    impl Notifier for Mailer {
        async fn send_mail(
            &self,
            template_key: &str,
            recipient: &str,
            langcode: &str,
            params: &MailParams,
        ) -> bool;
    }
}
