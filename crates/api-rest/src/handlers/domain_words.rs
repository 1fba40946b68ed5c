//! Domain-word glossary endpoints.

use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use coursebook_core::models::DomainWord;
use coursebook_core::repositories::domain_words::{DomainWordService, NewDomainWord};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainWordRes {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_id: String,
    pub domain_id: String,
    pub definition: String,
    pub is_mwe: bool,
    pub mwe_type: Option<String>,
    pub name: String,
    #[schema(value_type = Vec<Vec<String>>)]
    pub tokens_with_pos: Vec<(String, String)>,
    #[schema(value_type = Object)]
    pub translations: BTreeMap<String, String>,
    #[schema(value_type = Object)]
    pub word_structure: BTreeMap<String, String>,
}

impl From<DomainWord> for DomainWordRes {
    fn from(word: DomainWord) -> Self {
        Self {
            id: word.id,
            chapter_id: word.chapter_id,
            domain_id: word.domain_id,
            definition: word.definition,
            is_mwe: word.is_mwe,
            mwe_type: word.mwe_type,
            name: word.name,
            tokens_with_pos: word.tokens_with_pos,
            translations: word.translations,
            word_structure: word.word_structure,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllDomainWordsRes {
    pub domain_words: Vec<DomainWordRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainWordUpdateReq {
    pub definition: String,
    #[schema(value_type = Object)]
    pub translations: BTreeMap<String, String>,
    #[schema(value_type = Object)]
    pub word_structure: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainWordCreateReq {
    pub definition: String,
    #[schema(value_type = Object)]
    pub translations: BTreeMap<String, String>,
    #[schema(value_type = Object)]
    pub word_structure: BTreeMap<String, String>,
    #[serde(default)]
    pub is_mwe: bool,
    #[serde(default)]
    pub mwe_type: Option<String>,
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<String>>)]
    pub tokens_with_pos: Vec<(String, String)>,
}

/// Shared acknowledgement shape for domain-word writes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainWordAckRes {
    pub message: String,
    pub domain_id: String,
    pub chapter_id: String,
}

#[utoipa::path(
    get,
    path = "/all-domain-words",
    responses(
        (status = 200, description = "All glossary entries", body = AllDomainWordsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Lists every glossary entry. The reserved audio field is never serialised.
#[axum::debug_handler]
pub async fn all_domain_words(State(state): State<AppState>) -> ApiResult<Json<AllDomainWordsRes>> {
    let domain_words = DomainWordService::new(state.store.clone())
        .list()?
        .into_iter()
        .map(DomainWordRes::from)
        .collect();
    Ok(Json(AllDomainWordsRes { domain_words }))
}

#[utoipa::path(
    get,
    path = "/domain-words/{chapter_id}/{domain_id}",
    responses(
        (status = 200, description = "Glossary entry", body = DomainWordRes),
        (status = 404, description = "Domain word not found")
    )
)]
#[axum::debug_handler]
pub async fn get_domain_word(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<DomainWordRes>> {
    let word = DomainWordService::new(state.store.clone()).get(&chapter_id, &domain_id)?;
    Ok(Json(word.into()))
}

#[utoipa::path(
    put,
    path = "/domain-words/{chapter_id}/{domain_id}",
    request_body = DomainWordUpdateReq,
    responses(
        (status = 200, description = "Glossary entry updated", body = DomainWordAckRes),
        (status = 404, description = "Domain word not found")
    )
)]
/// Updates the editable fields: definition, translations, and word structure.
#[axum::debug_handler]
pub async fn update_domain_word(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
    Json(req): Json<DomainWordUpdateReq>,
) -> ApiResult<Json<DomainWordAckRes>> {
    DomainWordService::new(state.store.clone()).update(
        &chapter_id,
        &domain_id,
        &req.definition,
        req.translations,
        req.word_structure,
    )?;
    Ok(Json(DomainWordAckRes {
        message: format!("Domain word '{domain_id}' updated successfully"),
        domain_id,
        chapter_id,
    }))
}

#[utoipa::path(
    post,
    path = "/domain-words/{chapter_id}/{domain_id}",
    request_body = DomainWordCreateReq,
    responses(
        (status = 201, description = "Glossary entry created", body = DomainWordAckRes),
        (status = 400, description = "Domain word already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_domain_word(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
    Json(req): Json<DomainWordCreateReq>,
) -> ApiResult<(StatusCode, Json<DomainWordAckRes>)> {
    DomainWordService::new(state.store.clone()).create(
        &chapter_id,
        &domain_id,
        NewDomainWord {
            definition: req.definition,
            translations: req.translations,
            word_structure: req.word_structure,
            is_mwe: req.is_mwe,
            mwe_type: req.mwe_type,
            name: req.name,
            tokens_with_pos: req.tokens_with_pos,
        },
    )?;
    Ok((
        StatusCode::CREATED,
        Json(DomainWordAckRes {
            message: format!("Domain word '{domain_id}' created successfully"),
            domain_id,
            chapter_id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/domain-words/{chapter_id}/{domain_id}",
    responses(
        (status = 200, description = "Glossary entry deleted", body = DomainWordAckRes),
        (status = 404, description = "Domain word not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_domain_word(
    State(state): State<AppState>,
    AxumPath((chapter_id, domain_id)): AxumPath<(String, String)>,
) -> ApiResult<Json<DomainWordAckRes>> {
    DomainWordService::new(state.store.clone()).delete(&chapter_id, &domain_id)?;
    Ok(Json(DomainWordAckRes {
        message: format!("Domain word '{domain_id}' deleted successfully"),
        domain_id,
        chapter_id,
    }))
}
