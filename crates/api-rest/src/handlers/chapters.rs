//! Chapter full-summary endpoints.

use axum::extract::{Path as AxumPath, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use coursebook_core::repositories::chapters::ChapterService;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterRes {
    pub chapter_id: String,
    pub full_summary: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllChaptersRes {
    pub chapters: Vec<ChapterRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FullSummaryRes {
    pub full_summary: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplaceReq {
    pub sentences: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplaceRes {
    pub message: String,
    pub new_sentences_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditReq {
    pub index: i64,
    pub replace_text: String,
    pub with_text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditRes {
    pub message: String,
    pub old_sentence: String,
    pub new_sentence: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteSentenceReq {
    pub index: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteSentenceRes {
    pub message: String,
    pub deleted_sentence: String,
}

#[utoipa::path(
    get,
    path = "/all-chapters",
    responses(
        (status = 200, description = "All chapters with their summaries", body = AllChaptersRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Lists every chapter with its full summary.
#[axum::debug_handler]
pub async fn all_chapters(State(state): State<AppState>) -> ApiResult<Json<AllChaptersRes>> {
    let chapters = ChapterService::new(state.store.clone())
        .list()?
        .into_iter()
        .map(|chapter| ChapterRes {
            chapter_id: chapter.chapter_id,
            full_summary: chapter.full_summary,
        })
        .collect();
    Ok(Json(AllChaptersRes { chapters }))
}

#[utoipa::path(
    get,
    path = "/full-summary/{chapter_id}",
    responses(
        (status = 200, description = "Chapter summary sentences", body = FullSummaryRes),
        (status = 404, description = "Chapter not found")
    )
)]
/// Returns the sentence list for one chapter.
#[axum::debug_handler]
pub async fn get_full_summary(
    State(state): State<AppState>,
    AxumPath(chapter_id): AxumPath<String>,
) -> ApiResult<Json<FullSummaryRes>> {
    let full_summary = ChapterService::new(state.store.clone()).get(&chapter_id)?;
    Ok(Json(FullSummaryRes { full_summary }))
}

#[utoipa::path(
    put,
    path = "/full-summary/replace/{chapter_id}",
    request_body = ReplaceReq,
    responses(
        (status = 200, description = "Summary replaced", body = ReplaceRes),
        (status = 404, description = "Chapter not found")
    )
)]
/// Replaces the whole sentence list for a chapter.
#[axum::debug_handler]
pub async fn replace_full_summary(
    State(state): State<AppState>,
    AxumPath(chapter_id): AxumPath<String>,
    Json(req): Json<ReplaceReq>,
) -> ApiResult<Json<ReplaceRes>> {
    let new_sentences_count =
        ChapterService::new(state.store.clone()).replace(&chapter_id, req.sentences)?;
    Ok(Json(ReplaceRes {
        message: format!("Full summary for chapter '{chapter_id}' updated successfully"),
        new_sentences_count,
    }))
}

#[utoipa::path(
    put,
    path = "/full-summary/{chapter_id}",
    request_body = EditReq,
    responses(
        (status = 200, description = "Sentence edited", body = EditRes),
        (status = 400, description = "Invalid index or find-text not present"),
        (status = 404, description = "Chapter not found")
    )
)]
/// Replaces every occurrence of the find-text within one sentence.
#[axum::debug_handler]
pub async fn edit_sentence(
    State(state): State<AppState>,
    AxumPath(chapter_id): AxumPath<String>,
    Json(req): Json<EditReq>,
) -> ApiResult<Json<EditRes>> {
    let edit = ChapterService::new(state.store.clone()).edit_sentence(
        &chapter_id,
        req.index,
        &req.replace_text,
        &req.with_text,
    )?;
    Ok(Json(EditRes {
        message: format!(
            "Sentence at index {} partially edited successfully",
            req.index
        ),
        old_sentence: edit.old_sentence,
        new_sentence: edit.new_sentence,
    }))
}

#[utoipa::path(
    delete,
    path = "/full-summary/{chapter_id}",
    request_body = DeleteSentenceReq,
    responses(
        (status = 200, description = "Sentence deleted", body = DeleteSentenceRes),
        (status = 400, description = "Invalid index"),
        (status = 404, description = "Chapter not found")
    )
)]
/// Deletes the sentence at the given index. The chapter document survives.
#[axum::debug_handler]
pub async fn delete_sentence(
    State(state): State<AppState>,
    AxumPath(chapter_id): AxumPath<String>,
    Json(req): Json<DeleteSentenceReq>,
) -> ApiResult<Json<DeleteSentenceRes>> {
    let deleted_sentence =
        ChapterService::new(state.store.clone()).delete_sentence(&chapter_id, req.index)?;
    Ok(Json(DeleteSentenceRes {
        message: format!("Sentence at index {} deleted successfully", req.index),
        deleted_sentence,
    }))
}
