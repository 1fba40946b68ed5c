//! # Coursebook REST API
//!
//! HTTP façade over the coursebook-core services.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All storage and validation logic lives in `coursebook-core`; this crate
//! only translates requests into service calls and outcomes into responses.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coursebook_core::DocumentStore;

/// Application state for the REST API server.
///
/// Holds the shared document store; handlers construct the service they need
/// per request, which is cheap since services only wrap the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::chapters::all_chapters,
        handlers::chapters::get_full_summary,
        handlers::chapters::replace_full_summary,
        handlers::chapters::edit_sentence,
        handlers::chapters::delete_sentence,
        handlers::sections::all_sections,
        handlers::sections::get_section_summary,
        handlers::sections::replace_section_summary,
        handlers::sections::edit_section_summary,
        handlers::sections::create_section_summary,
        handlers::sections::clear_section_summary,
        handlers::domain_words::all_domain_words,
        handlers::domain_words::get_domain_word,
        handlers::domain_words::update_domain_word,
        handlers::domain_words::create_domain_word,
        handlers::domain_words::delete_domain_word,
        handlers::taxonomy::all_taxonomies,
        handlers::taxonomy::get_taxonomy,
        handlers::taxonomy::get_taxonomy_with_image,
        handlers::taxonomy::get_taxonomy_image,
        handlers::taxonomy::get_taxonomy_image_base64,
        handlers::taxonomy::update_taxonomy,
        handlers::taxonomy::update_taxonomy_image,
        handlers::taxonomy::create_taxonomy,
        handlers::taxonomy::delete_taxonomy,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::verify_session,
        handlers::auth::logout,
    ),
    components(schemas(
        error::ErrorRes,
        handlers::HealthRes,
        handlers::chapters::ChapterRes,
        handlers::chapters::AllChaptersRes,
        handlers::chapters::FullSummaryRes,
        handlers::chapters::ReplaceReq,
        handlers::chapters::ReplaceRes,
        handlers::chapters::EditReq,
        handlers::chapters::EditRes,
        handlers::chapters::DeleteSentenceReq,
        handlers::chapters::DeleteSentenceRes,
        handlers::sections::SectionRes,
        handlers::sections::AllSectionsRes,
        handlers::sections::SectionSummaryRes,
        handlers::sections::SectionReplaceReq,
        handlers::sections::SectionEditReq,
        handlers::sections::SectionEditRes,
        handlers::sections::SectionAckRes,
        handlers::domain_words::DomainWordRes,
        handlers::domain_words::AllDomainWordsRes,
        handlers::domain_words::DomainWordUpdateReq,
        handlers::domain_words::DomainWordCreateReq,
        handlers::domain_words::DomainWordAckRes,
        handlers::taxonomy::TaxonomyRes,
        handlers::taxonomy::AllTaxonomiesRes,
        handlers::taxonomy::TaxonomyDetailRes,
        handlers::taxonomy::TaxonomyWithImageRes,
        handlers::taxonomy::TaxonomyImageBase64Res,
        handlers::taxonomy::TaxonomyUpdateReq,
        handlers::taxonomy::TaxonomyCreateReq,
        handlers::taxonomy::TaxonomyImageUpdateReq,
        handlers::taxonomy::TaxonomyAckRes,
        handlers::auth::SignupReq,
        handlers::auth::SignupRes,
        handlers::auth::LoginReq,
        handlers::auth::LoginRes,
        handlers::auth::VerifySessionRes,
        handlers::auth::LogoutRes,
    ))
)]
pub struct ApiDoc;

/// Builds the application router with every endpoint and the Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/all-chapters", get(handlers::chapters::all_chapters))
        .route(
            "/full-summary/:chapter_id",
            get(handlers::chapters::get_full_summary)
                .put(handlers::chapters::edit_sentence)
                .delete(handlers::chapters::delete_sentence),
        )
        .route(
            "/full-summary/replace/:chapter_id",
            put(handlers::chapters::replace_full_summary),
        )
        .route("/all-sections", get(handlers::sections::all_sections))
        .route(
            "/section-summary/:chapter_id/:section_id",
            get(handlers::sections::get_section_summary)
                .put(handlers::sections::edit_section_summary)
                .post(handlers::sections::create_section_summary)
                .delete(handlers::sections::clear_section_summary),
        )
        .route(
            "/section-summary/replace/:chapter_id/:section_id",
            put(handlers::sections::replace_section_summary),
        )
        .route(
            "/all-domain-words",
            get(handlers::domain_words::all_domain_words),
        )
        .route(
            "/domain-words/:chapter_id/:domain_id",
            get(handlers::domain_words::get_domain_word)
                .put(handlers::domain_words::update_domain_word)
                .post(handlers::domain_words::create_domain_word)
                .delete(handlers::domain_words::delete_domain_word),
        )
        .route("/all-taxonomies", get(handlers::taxonomy::all_taxonomies))
        .route(
            "/taxonomy/:chapter_id/:domain_id",
            get(handlers::taxonomy::get_taxonomy)
                .put(handlers::taxonomy::update_taxonomy)
                .post(handlers::taxonomy::create_taxonomy)
                .delete(handlers::taxonomy::delete_taxonomy),
        )
        .route(
            "/taxonomy-with-image/:chapter_id/:domain_id",
            get(handlers::taxonomy::get_taxonomy_with_image),
        )
        .route(
            "/taxonomy/image/:taxonomy_id",
            get(handlers::taxonomy::get_taxonomy_image),
        )
        .route(
            "/taxonomy/image/:chapter_id/:domain_id",
            put(handlers::taxonomy::update_taxonomy_image),
        )
        .route(
            "/taxonomy/image-base64/:taxonomy_id",
            get(handlers::taxonomy::get_taxonomy_image_base64),
        )
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/verify-session", get(handlers::auth::verify_session))
        .route("/logout", post(handlers::auth::logout))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
