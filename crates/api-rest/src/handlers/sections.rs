//! Section summary endpoints.

use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use coursebook_core::repositories::sections::SectionService;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionRes {
    pub chapter_id: String,
    pub section_id: String,
    pub section_summary: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllSectionsRes {
    pub sections: Vec<SectionRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionSummaryRes {
    pub section_summary: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionReplaceReq {
    pub section_summary: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionEditReq {
    pub replace_text: String,
    pub with_text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionEditRes {
    pub message: String,
    pub old_text: String,
    pub new_text: String,
    pub section_id: String,
    pub chapter_id: String,
}

/// Shared acknowledgement shape for section writes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionAckRes {
    pub message: String,
    pub section_id: String,
    pub chapter_id: String,
}

#[utoipa::path(
    get,
    path = "/all-sections",
    responses(
        (status = 200, description = "All section summaries", body = AllSectionsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Lists every section summary across all chapters.
#[axum::debug_handler]
pub async fn all_sections(State(state): State<AppState>) -> ApiResult<Json<AllSectionsRes>> {
    let sections = SectionService::new(state.store.clone())
        .list()?
        .into_iter()
        .map(|section| SectionRes {
            chapter_id: section.chapter_id,
            section_id: section.section_id,
            section_summary: section.section_summary,
        })
        .collect();
    Ok(Json(AllSectionsRes { sections }))
}

#[utoipa::path(
    get,
    path = "/section-summary/{chapter_id}/{section_id}",
    responses(
        (status = 200, description = "Section summary text", body = SectionSummaryRes),
        (status = 404, description = "Section not found")
    )
)]
#[axum::debug_handler]
pub async fn get_section_summary(
    State(state): State<AppState>,
    AxumPath((chapter_id, section_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<SectionSummaryRes>> {
    let section_summary = SectionService::new(state.store.clone()).get(&chapter_id, &section_id)?;
    Ok(Json(SectionSummaryRes { section_summary }))
}

#[utoipa::path(
    put,
    path = "/section-summary/replace/{chapter_id}/{section_id}",
    request_body = SectionReplaceReq,
    responses(
        (status = 200, description = "Section summary replaced", body = SectionAckRes),
        (status = 404, description = "Section not found")
    )
)]
/// Replaces the whole summary text for a section.
#[axum::debug_handler]
pub async fn replace_section_summary(
    State(state): State<AppState>,
    AxumPath((chapter_id, section_id)): AxumPath<(String, String)>,
    Json(req): Json<SectionReplaceReq>,
) -> ApiResult<Json<SectionAckRes>> {
    SectionService::new(state.store.clone()).replace(
        &chapter_id,
        &section_id,
        &req.section_summary,
    )?;
    Ok(Json(SectionAckRes {
        message: format!(
            "Section summary for '{section_id}' in chapter '{chapter_id}' updated successfully"
        ),
        section_id,
        chapter_id,
    }))
}

#[utoipa::path(
    put,
    path = "/section-summary/{chapter_id}/{section_id}",
    request_body = SectionEditReq,
    responses(
        (status = 200, description = "Section summary edited", body = SectionEditRes),
        (status = 400, description = "Find-text not present"),
        (status = 404, description = "Section not found")
    )
)]
/// Replaces every occurrence of the find-text in the summary.
#[axum::debug_handler]
pub async fn edit_section_summary(
    State(state): State<AppState>,
    AxumPath((chapter_id, section_id)): AxumPath<(String, String)>,
    Json(req): Json<SectionEditReq>,
) -> ApiResult<Json<SectionEditRes>> {
    SectionService::new(state.store.clone()).edit(
        &chapter_id,
        &section_id,
        &req.replace_text,
        &req.with_text,
    )?;
    Ok(Json(SectionEditRes {
        message: format!("Section summary for '{section_id}' partially edited successfully"),
        old_text: req.replace_text,
        new_text: req.with_text,
        section_id,
        chapter_id,
    }))
}

#[utoipa::path(
    post,
    path = "/section-summary/{chapter_id}/{section_id}",
    request_body = SectionReplaceReq,
    responses(
        (status = 201, description = "Section created", body = SectionAckRes),
        (status = 400, description = "Section already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_section_summary(
    State(state): State<AppState>,
    AxumPath((chapter_id, section_id)): AxumPath<(String, String)>,
    Json(req): Json<SectionReplaceReq>,
) -> ApiResult<(StatusCode, Json<SectionAckRes>)> {
    SectionService::new(state.store.clone()).create(
        &chapter_id,
        &section_id,
        &req.section_summary,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(SectionAckRes {
            message: format!(
                "Section summary for '{section_id}' in chapter '{chapter_id}' created successfully"
            ),
            section_id,
            chapter_id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/section-summary/{chapter_id}/{section_id}",
    responses(
        (status = 200, description = "Section summary cleared", body = SectionAckRes),
        (status = 404, description = "Section not found")
    )
)]
/// Soft delete: clears the summary text but keeps the section document.
#[axum::debug_handler]
pub async fn clear_section_summary(
    State(state): State<AppState>,
    AxumPath((chapter_id, section_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<SectionAckRes>> {
    SectionService::new(state.store.clone()).clear(&chapter_id, &section_id)?;
    Ok(Json(SectionAckRes {
        message: format!(
            "Section summary for '{section_id}' in chapter '{chapter_id}' cleared successfully"
        ),
        section_id,
        chapter_id,
    }))
}
