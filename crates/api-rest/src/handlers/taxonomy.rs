//! Taxonomy diagram endpoints.
//!
//! Metadata reads return relative image URLs so the dashboard can embed the
//! raw endpoint directly in an `img` tag; the base64 variants exist for
//! clients that inline the payload instead.

use axum::extract::{Path as AxumPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use coursebook_core::image;
use coursebook_core::models::TaxonomyEntry;
use coursebook_core::repositories::taxonomy::TaxonomyService;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyRes {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    pub domain_name: String,
    pub image_format: String,
    pub image_url: String,
}

impl From<TaxonomyEntry> for TaxonomyRes {
    fn from(entry: TaxonomyEntry) -> Self {
        Self {
            image_url: format!("/taxonomy/image/{}", entry.id),
            id: entry.id,
            chapter_id: entry.chapter_id,
            domain_id: entry.domain_id,
            domain_name: entry.domain_name,
            image_format: entry.image_format,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllTaxonomiesRes {
    pub taxonomies: Vec<TaxonomyRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyDetailRes {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    pub domain_name: String,
    pub image_format: String,
    pub image_url: String,
    pub image_url_base64: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyWithImageRes {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    pub domain_name: String,
    pub image_format: String,
    pub image_base64: Option<String>,
    pub image_src: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyImageBase64Res {
    pub image_base64: String,
    pub content_type: String,
    pub data_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyUpdateReq {
    pub domain_name: String,
    pub image_format: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyCreateReq {
    pub domain_name: String,
    pub image_format: String,
    /// Base64 encoded image payload; empty for no image.
    #[serde(default)]
    pub taxonomy_image: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyImageUpdateReq {
    /// Base64 encoded image payload.
    pub image_data: String,
}

/// Shared acknowledgement shape for taxonomy writes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyAckRes {
    pub message: String,
    pub domain_id: String,
    pub chapter_id: String,
}

#[utoipa::path(
    get,
    path = "/all-taxonomies",
    responses(
        (status = 200, description = "All taxonomy entries", body = AllTaxonomiesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Lists taxonomy metadata; image payloads are referenced by URL only.
#[axum::debug_handler]
pub async fn all_taxonomies(State(state): State<AppState>) -> ApiResult<Json<AllTaxonomiesRes>> {
    let taxonomies = TaxonomyService::new(state.store.clone())
        .list()?
        .into_iter()
        .map(TaxonomyRes::from)
        .collect();
    Ok(Json(AllTaxonomiesRes { taxonomies }))
}

#[utoipa::path(
    get,
    path = "/taxonomy/{chapter_id}/{domain_id}",
    responses(
        (status = 200, description = "Taxonomy metadata", body = TaxonomyDetailRes),
        (status = 404, description = "Taxonomy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_taxonomy(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<TaxonomyDetailRes>> {
    let entry = TaxonomyService::new(state.store.clone()).get(&chapter_id, &domain_id)?;
    Ok(Json(TaxonomyDetailRes {
        image_url: format!("/taxonomy/image/{}", entry.id),
        image_url_base64: format!("/taxonomy/image-base64/{}", entry.id),
        id: entry.id,
        chapter_id: entry.chapter_id,
        domain_id: entry.domain_id,
        domain_name: entry.domain_name,
        image_format: entry.image_format,
    }))
}

#[utoipa::path(
    get,
    path = "/taxonomy-with-image/{chapter_id}/{domain_id}",
    responses(
        (status = 200, description = "Taxonomy metadata with inlined image", body = TaxonomyWithImageRes),
        (status = 404, description = "Taxonomy not found")
    )
)]
/// Returns metadata with the image inlined as base64 and as a data URL.
#[axum::debug_handler]
pub async fn get_taxonomy_with_image(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<TaxonomyWithImageRes>> {
    let found = TaxonomyService::new(state.store.clone()).get_with_image(&chapter_id, &domain_id)?;
    let image_base64 = found.image.as_deref().map(image::encode_base64);
    let image_src = found
        .image
        .as_deref()
        .map(|bytes| image::data_url(bytes, &found.entry.image_format));
    Ok(Json(TaxonomyWithImageRes {
        id: found.entry.id,
        chapter_id: found.entry.chapter_id,
        domain_id: found.entry.domain_id,
        domain_name: found.entry.domain_name,
        image_format: found.entry.image_format,
        image_base64,
        image_src,
    }))
}

#[utoipa::path(
    get,
    path = "/taxonomy/image/{taxonomy_id}",
    responses(
        (status = 200, description = "Raw image bytes"),
        (status = 404, description = "Image not found")
    )
)]
/// Serves the raw image bytes for direct embedding. The no-cache headers keep
/// the dashboard from showing a stale diagram after an image update.
#[axum::debug_handler]
pub async fn get_taxonomy_image(
    State(state): State<AppState>,
    AxumPath(taxonomy_id): AxumPath<String>,
) -> ApiResult<impl IntoResponse> {
    let img = TaxonomyService::new(state.store.clone()).image(&taxonomy_id)?;
    Ok((
        [
            (header::CONTENT_TYPE, image::mime_type(&img.image_format)),
            (header::CONTENT_DISPOSITION, "inline"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        img.bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/taxonomy/image-base64/{taxonomy_id}",
    responses(
        (status = 200, description = "Image as base64 and data URL", body = TaxonomyImageBase64Res),
        (status = 404, description = "Image not found")
    )
)]
/// Base64 variant of the raw image endpoint.
#[axum::debug_handler]
pub async fn get_taxonomy_image_base64(
    State(state): State<AppState>,
    AxumPath(taxonomy_id): AxumPath<String>,
) -> ApiResult<Json<TaxonomyImageBase64Res>> {
    let img = TaxonomyService::new(state.store.clone()).image(&taxonomy_id)?;
    Ok(Json(TaxonomyImageBase64Res {
        image_base64: image::encode_base64(&img.bytes),
        content_type: image::mime_type(&img.image_format).to_string(),
        data_url: image::data_url(&img.bytes, &img.image_format),
    }))
}

#[utoipa::path(
    put,
    path = "/taxonomy/{chapter_id}/{domain_id}",
    request_body = TaxonomyUpdateReq,
    responses(
        (status = 200, description = "Taxonomy updated", body = TaxonomyAckRes),
        (status = 404, description = "Taxonomy not found")
    )
)]
/// Updates the display name and declared image format.
#[axum::debug_handler]
pub async fn update_taxonomy(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
    Json(req): Json<TaxonomyUpdateReq>,
) -> ApiResult<Json<TaxonomyAckRes>> {
    TaxonomyService::new(state.store.clone()).update(
        &chapter_id,
        &domain_id,
        &req.domain_name,
        &req.image_format,
    )?;
    Ok(Json(TaxonomyAckRes {
        message: format!("Taxonomy '{domain_id}' updated successfully"),
        domain_id,
        chapter_id,
    }))
}

#[utoipa::path(
    put,
    path = "/taxonomy/image/{chapter_id}/{domain_id}",
    request_body = TaxonomyImageUpdateReq,
    responses(
        (status = 200, description = "Taxonomy image updated", body = TaxonomyAckRes),
        (status = 400, description = "Invalid image data"),
        (status = 404, description = "Taxonomy not found")
    )
)]
/// Replaces the stored image with a new base64 payload.
#[axum::debug_handler]
pub async fn update_taxonomy_image(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
    Json(req): Json<TaxonomyImageUpdateReq>,
) -> ApiResult<Json<TaxonomyAckRes>> {
    TaxonomyService::new(state.store.clone()).update_image(
        &chapter_id,
        &domain_id,
        &req.image_data,
    )?;
    Ok(Json(TaxonomyAckRes {
        message: format!("Taxonomy image for '{domain_id}' updated successfully"),
        domain_id,
        chapter_id,
    }))
}

#[utoipa::path(
    post,
    path = "/taxonomy/{chapter_id}/{domain_id}",
    request_body = TaxonomyCreateReq,
    responses(
        (status = 201, description = "Taxonomy created", body = TaxonomyAckRes),
        (status = 400, description = "Taxonomy already exists or invalid image data")
    )
)]
#[axum::debug_handler]
pub async fn create_taxonomy(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
    Json(req): Json<TaxonomyCreateReq>,
) -> ApiResult<(StatusCode, Json<TaxonomyAckRes>)> {
    TaxonomyService::new(state.store.clone()).create(
        &chapter_id,
        &domain_id,
        &req.domain_name,
        &req.image_format,
        &req.taxonomy_image,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(TaxonomyAckRes {
            message: format!("Taxonomy '{domain_id}' created successfully"),
            domain_id,
            chapter_id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/taxonomy/{chapter_id}/{domain_id}",
    responses(
        (status = 200, description = "Taxonomy deleted", body = TaxonomyAckRes),
        (status = 404, description = "Taxonomy not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_taxonomy(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<TaxonomyAckRes>> {
    TaxonomyService::new(state.store.clone()).delete(&chapter_id, &domain_id)?;
    Ok(Json(TaxonomyAckRes {
        message: format!("Taxonomy '{domain_id}' deleted successfully"),
        domain_id,
        chapter_id,
    }))
}
