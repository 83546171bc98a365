//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use phipsi_core::Summarizable;
use phipsi_plot::ChartItem;
use phipsi_struct::{AngleDataset, AnglePair};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, HtmlError};
use crate::state::AppState;

/// Body of `POST /calculate_ramachandran`.
#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub pdb_id: String,
}

/// Query string of `/`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub pdb_id: Option<String>,
}

#[derive(Serialize)]
struct AnglesResponse<'a> {
    pdb_id: &'a str,
    count: usize,
    summary: String,
    pairs: Vec<&'a AnglePair>,
}

// ---------------------------------------------------------------------------
// Shared pipeline
// ---------------------------------------------------------------------------

/// Fetch, parse and extract. Every request runs the whole pipeline.
async fn analyze(state: &AppState, pdb_id: &str) -> Result<AngleDataset, ApiError> {
    let structure = state
        .client
        .fetch_structure(pdb_id)
        .await
        .map_err(ApiError::structure)?;
    let dataset = state.extractor.extract(&structure);
    log::info!("{}: {}", pdb_id, dataset.summary());
    Ok(dataset)
}

async fn chart_item(state: &AppState, pdb_id: &str) -> Result<ChartItem, ApiError> {
    let dataset = analyze(state, pdb_id).await?;
    Ok(state.renderer.render(&dataset, pdb_id))
}

async fn chart_json(state: &AppState, pdb_id: &str) -> Result<Response, ApiError> {
    let body = chart_item(state, pdb_id).await?.to_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn chart_page(state: &AppState, pdb_id: &str) -> Result<Html<String>, HtmlError> {
    let page = chart_item(state, pdb_id).await?.to_html()?;
    Ok(Html(page))
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

pub async fn calculate_ramachandran(
    State(state): State<AppState>,
    Path(pdb_id): Path<String>,
) -> Result<Response, ApiError> {
    chart_json(&state, &pdb_id).await
}

pub async fn calculate_ramachandran_post(
    State(state): State<AppState>,
    body: Result<Json<ChartRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    chart_json(&state, &request.pdb_id).await
}

pub async fn pdb_page(
    State(state): State<AppState>,
    Path(pdb_id): Path<String>,
) -> Result<Html<String>, HtmlError> {
    chart_page(&state, &pdb_id).await
}

/// Chart page for `?pdb_id=`, or for the configured default entry.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, HtmlError> {
    let pdb_id = query
        .pdb_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| state.config.defaults.pdb_id.clone());
    chart_page(&state, &pdb_id).await
}

pub async fn angles(
    State(state): State<AppState>,
    Path(pdb_id): Path<String>,
) -> Result<Response, ApiError> {
    let dataset = analyze(&state, &pdb_id).await?;
    let body = AnglesResponse {
        pdb_id: &pdb_id,
        count: dataset.len(),
        summary: dataset.summary(),
        pairs: dataset.iter().collect(),
    };
    Ok(Json(body).into_response())
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ---------------------------------------------------------------------------
// Metadata relays
// ---------------------------------------------------------------------------

pub async fn rcsb_entry(
    State(state): State<AppState>,
    Path(pdb_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    log::info!("rcsb entry {}", pdb_id);
    Ok(Json(state.client.rcsb_entry(&pdb_id).await?))
}

pub async fn uniprot_entry(
    State(state): State<AppState>,
    Path(accession): Path<String>,
) -> Result<Json<Value>, ApiError> {
    log::info!("uniprot entry {}", accession);
    Ok(Json(state.client.uniprot_entry(&accession).await?))
}

pub async fn quickgo_term(
    State(state): State<AppState>,
    Path(go_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    log::info!("quickgo term {}", go_id);
    Ok(Json(state.client.quickgo_term(&go_id).await?))
}

pub async fn pubmed_summary(
    State(state): State<AppState>,
    Path(pmid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    log::info!("pubmed summary {}", pmid);
    Ok(Json(state.client.pubmed_summary(&pmid).await?))
}

pub async fn emdb_entry(
    State(state): State<AppState>,
    Path(emdb_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    log::info!("emdb entry {}", emdb_id);
    Ok(Json(state.client.emdb_entry(&emdb_id).await?))
}
