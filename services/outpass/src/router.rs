use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use outpass_core::health::healthz;
use outpass_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{add_phone, get_me, login, register, staff_probe, student_probe},
    health::readyz,
    notification::{
        delete_notification, edit_notification, list_active_notifications,
        list_my_notifications, send_notification,
    },
    outpass::{
        approve, approve_all, cancel_outpass, count_pending, list_delayed, list_mine,
        list_pending, list_students, mark_reached, reject, reject_all, request_outpass,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/add-phone", put(add_phone))
        .route("/auth/me", get(get_me))
        .route("/auth/student", get(student_probe))
        .route("/auth/staff", get(staff_probe))
        // Outpass (student)
        .route("/outpass/request", post(request_outpass))
        .route("/outpass/my", get(list_mine))
        .route("/outpass/cancel/{id}", delete(cancel_outpass))
        .route("/outpass/reached/{id}", put(mark_reached))
        // Outpass (staff)
        .route("/outpass/pending", get(list_pending))
        .route("/outpass/approve-all", put(approve_all))
        .route("/outpass/reject-all", put(reject_all))
        .route("/outpass/approve/{id}", put(approve))
        .route("/outpass/reject/{id}", put(reject))
        .route("/outpass/staff/count", get(count_pending))
        .route("/outpass/students", get(list_students))
        .route("/outpass/delay", get(list_delayed))
        // Notifications
        .route("/notifications/send", post(send_notification))
        .route("/notifications/edit/{id}", put(edit_notification))
        .route("/notifications/staff/my", get(list_my_notifications))
        .route("/notifications/active", get(list_active_notifications))
        .route("/notifications/delete/{id}", delete(delete_notification))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
