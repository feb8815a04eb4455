use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, availability, doctor, health};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Doctor directory
        .route("/api/v1/doctors", post(doctor::create_doctor).get(doctor::list_doctors))
        .route("/api/v1/doctors/{doctor_id}", get(doctor::get_doctor).delete(doctor::delete_doctor))

        // Availability rules (admin)
        .route("/api/v1/doctors/{doctor_id}/availability-rules", post(availability::add_rule).get(availability::list_rules))
        .route("/api/v1/doctors/{doctor_id}/availability-rules/{rule_id}", delete(availability::remove_rule))

        // Public booking flow
        .route("/api/v1/doctors/{doctor_id}/availability", get(availability::get_availability))
        .route("/api/v1/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/v1/appointments/doctor/{doctor_id}", get(appointment::list_doctor_appointments))
        .route("/api/v1/booking-intents", post(appointment::create_booking_intent))

        // Admin appointment management
        .route("/api/v1/appointments/{appointment_id}/confirm", put(appointment::confirm_appointment))
        .route("/api/v1/appointments/{appointment_id}", delete(appointment::delete_appointment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
