use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SalonFlow API",
        version = "0.3.0",
        description = r#"
Multi-tenant salon booking backend.

Professionals register a salon and manage its appointments, service
catalog, staff, inventory and payment methods under `/api/v1` with a JWT
bearer token. Every record belongs to exactly one salon and every request
is scoped to the caller's salon; cross-salon access is rejected.

End clients browse a salon's public page by slug and book appointments
under `/public` with no authentication.

`GET /api/v1/analytics/report?period=week|month|year` composes the
business report (revenue, bookings, retention, service popularity, daily
series, top clients, staff performance, peak hours, growth) over a
rolling window ending now.
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Appointments", description = "Appointment management"),
        (name = "Catalog", description = "Bookable service catalog"),
        (name = "Staff", description = "Staff roster"),
        (name = "Inventory", description = "Stock tracking"),
        (name = "PaymentMethods", description = "Accepted payment options"),
        (name = "Messages", description = "Client inbox"),
        (name = "Analytics", description = "Business reporting"),
        (name = "Public", description = "Unauthenticated salon pages and booking"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::auth::register_handler,
        crate::auth::login_handler,

        crate::handlers::appointments::create_appointment,
        crate::handlers::appointments::get_appointment,
        crate::handlers::appointments::list_appointments,
        crate::handlers::appointments::update_appointment_status,
        crate::handlers::appointments::reschedule_appointment,
        crate::handlers::appointments::cancel_appointment,

        crate::handlers::catalog::create_service,
        crate::handlers::catalog::list_services,
        crate::handlers::catalog::get_service,
        crate::handlers::catalog::update_service,
        crate::handlers::catalog::delete_service,

        crate::handlers::staff::create_staff,
        crate::handlers::staff::list_staff,
        crate::handlers::staff::update_staff,
        crate::handlers::staff::delete_staff,

        crate::handlers::inventory::create_item,
        crate::handlers::inventory::list_items,
        crate::handlers::inventory::adjust_item,
        crate::handlers::inventory::delete_item,

        crate::handlers::payment_methods::create_method,
        crate::handlers::payment_methods::list_methods,
        crate::handlers::payment_methods::set_method_enabled,
        crate::handlers::payment_methods::delete_method,

        crate::handlers::messages::list_messages,
        crate::handlers::messages::mark_message_read,

        crate::handlers::analytics::get_report,

        crate::handlers::public::get_salon_page,
        crate::handlers::public::list_salon_services,
        crate::handlers::public::book_appointment,
        crate::handlers::public::submit_message,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,

            crate::auth::RegisterRequest,
            crate::auth::LoginRequest,
            crate::auth::AuthResponse,
            crate::auth::TokenResponse,

            crate::services::appointments::CreateAppointmentRequest,
            crate::services::appointments::UpdateAppointmentStatusRequest,
            crate::services::appointments::RescheduleAppointmentRequest,
            crate::services::appointments::AppointmentResponse,
            crate::services::appointments::AppointmentListResponse,
            crate::handlers::appointments::CancelAppointmentRequest,
            crate::entities::appointment::AppointmentStatus,

            crate::services::catalog::CreateServiceRequest,
            crate::services::catalog::UpdateServiceRequest,
            crate::services::catalog::ServiceResponse,

            crate::services::staff::CreateStaffRequest,
            crate::services::staff::UpdateStaffRequest,
            crate::services::staff::StaffResponse,

            crate::services::inventory::CreateInventoryItemRequest,
            crate::services::inventory::AdjustInventoryRequest,
            crate::services::inventory::InventoryItemResponse,

            crate::services::payment_methods::CreatePaymentMethodRequest,
            crate::services::payment_methods::PaymentMethodResponse,
            crate::handlers::payment_methods::SetEnabledRequest,

            crate::services::messages::SubmitMessageRequest,
            crate::services::messages::MessageResponse,
            crate::services::messages::MessageListResponse,

            crate::services::analytics::AnalyticsReport,
            crate::services::analytics::Period,
            crate::services::analytics::ServicePopularity,
            crate::services::analytics::DailyRevenue,
            crate::services::analytics::TopClient,
            crate::services::analytics::StaffPerformance,
            crate::services::analytics::PeakHour,

            crate::handlers::public::SalonPageResponse,
            crate::handlers::public::PublicBookingRequest,

            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
