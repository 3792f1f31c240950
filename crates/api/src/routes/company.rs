//! Route definitions for everything scoped to one company.
//!
//! Paths are registered in full rather than nested so the `{id}` segment is
//! shared by every route in the tree.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{
    company, enrollment, hospital, leaderboard, news, pdf, protocol, stats, training, user,
};
use crate::state::AppState;

/// Company-scoped routes.
///
/// ```text
/// GET    /company/{id}                                  -> get_company
/// PUT    /company/{id}                                  -> update_company
/// DELETE /company/{id}                                  -> delete_company
/// GET    /company/{id}/stats                            -> company_stats
/// GET    /company/{id}/leaderboard                      -> get_leaderboard
///
/// GET    /company/{id}/users                            -> list_users
/// POST   /company/{id}/users                            -> create_user
/// GET    /company/{id}/users/{user_id}                  -> get_user
/// PUT    /company/{id}/users/{user_id}                  -> update_user
/// DELETE /company/{id}/users/{user_id}                  -> deactivate_user
/// POST   /company/{id}/users/{user_id}/reset-password   -> reset_password
///
/// GET    /company/{id}/hospitals                        -> list_hospitals
/// POST   /company/{id}/hospitals                        -> create_hospital
/// GET    /company/{id}/hospitals/{hospital_id}          -> get_hospital
/// PUT    /company/{id}/hospitals/{hospital_id}          -> update_hospital
/// DELETE /company/{id}/hospitals/{hospital_id}          -> delete_hospital
/// GET    /company/{id}/hospitals/{hospital_id}/enrollments -> list_hospital_enrollments
/// POST   /company/{id}/hospitals/{hospital_id}/enrollments -> create_enrollment
///
/// GET    /company/{id}/enrollments                      -> list_enrollments
/// DELETE /company/{id}/enrollments/{enrollment_id}      -> withdraw_enrollment
///
/// GET    /company/{id}/news                             -> list_news
/// POST   /company/{id}/news                             -> create_news
/// GET    /company/{id}/news/{news_id}                   -> get_news
/// PUT    /company/{id}/news/{news_id}                   -> update_news
/// DELETE /company/{id}/news/{news_id}                   -> delete_news
///
/// GET    /company/{id}/pdfs                             -> list_pdfs
/// POST   /company/{id}/pdfs                             -> create_pdf
/// GET    /company/{id}/pdfs/{pdf_id}                    -> get_pdf
/// PUT    /company/{id}/pdfs/{pdf_id}                    -> update_pdf
/// DELETE /company/{id}/pdfs/{pdf_id}                    -> delete_pdf
///
/// GET    /company/{id}/training                         -> list_training
/// POST   /company/{id}/training                         -> create_training
/// GET    /company/{id}/training/{material_id}           -> get_training
/// PUT    /company/{id}/training/{material_id}           -> update_training
/// DELETE /company/{id}/training/{material_id}           -> delete_training
///
/// GET    /company/{id}/protocols                        -> list_protocols
/// POST   /company/{id}/protocols                        -> create_protocol
/// GET    /company/{id}/protocols/current                -> current_protocol
/// GET    /company/{id}/protocols/{protocol_id}          -> get_protocol
/// PUT    /company/{id}/protocols/{protocol_id}          -> update_protocol
/// DELETE /company/{id}/protocols/{protocol_id}          -> delete_protocol
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/company/{id}",
            get(company::get_company)
                .put(company::update_company)
                .delete(company::delete_company),
        )
        .route("/company/{id}/stats", get(stats::company_stats))
        .route("/company/{id}/leaderboard", get(leaderboard::get_leaderboard))
        // Users
        .route(
            "/company/{id}/users",
            get(user::list_users).post(user::create_user),
        )
        .route(
            "/company/{id}/users/{user_id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::deactivate_user),
        )
        .route(
            "/company/{id}/users/{user_id}/reset-password",
            post(user::reset_password),
        )
        // Hospitals and enrollments
        .route(
            "/company/{id}/hospitals",
            get(hospital::list_hospitals).post(hospital::create_hospital),
        )
        .route(
            "/company/{id}/hospitals/{hospital_id}",
            get(hospital::get_hospital)
                .put(hospital::update_hospital)
                .delete(hospital::delete_hospital),
        )
        .route(
            "/company/{id}/hospitals/{hospital_id}/enrollments",
            get(enrollment::list_hospital_enrollments).post(enrollment::create_enrollment),
        )
        .route(
            "/company/{id}/enrollments",
            get(enrollment::list_enrollments),
        )
        .route(
            "/company/{id}/enrollments/{enrollment_id}",
            delete(enrollment::withdraw_enrollment),
        )
        // News
        .route(
            "/company/{id}/news",
            get(news::list_news).post(news::create_news),
        )
        .route(
            "/company/{id}/news/{news_id}",
            get(news::get_news)
                .put(news::update_news)
                .delete(news::delete_news),
        )
        // PDFs
        .route(
            "/company/{id}/pdfs",
            get(pdf::list_pdfs).post(pdf::create_pdf),
        )
        .route(
            "/company/{id}/pdfs/{pdf_id}",
            get(pdf::get_pdf).put(pdf::update_pdf).delete(pdf::delete_pdf),
        )
        // Training
        .route(
            "/company/{id}/training",
            get(training::list_training).post(training::create_training),
        )
        .route(
            "/company/{id}/training/{material_id}",
            get(training::get_training)
                .put(training::update_training)
                .delete(training::delete_training),
        )
        // Protocols
        .route(
            "/company/{id}/protocols",
            get(protocol::list_protocols).post(protocol::create_protocol),
        )
        .route(
            "/company/{id}/protocols/current",
            get(protocol::current_protocol),
        )
        .route(
            "/company/{id}/protocols/{protocol_id}",
            get(protocol::get_protocol)
                .put(protocol::update_protocol)
                .delete(protocol::delete_protocol),
        )
}
