use std::collections::HashMap;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::error;
use crate::api::{ApiContext, Result};
use crate::entities::{Tag, TagDraft, TagId};
use crate::service::{TagCounts, DEFAULT_PAGE_FROM, DEFAULT_PAGE_SIZE};

pub fn router() -> Router {
    Router::new()
        .route("/tags", post(save_tag))
        .route("/tags/_counts", post(count_tags_by_post_id))
        .route("/tags/:post_id", get(list_tags_sorted_by_desc_time))
        .route("/tags/:post_id/:size", get(list_tags_sorted_by_desc_time))
        .route("/tags/:post_id/:size/:from", get(list_tags_sorted_by_desc_time))
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct SavedTag {
    id: TagId,
}

async fn save_tag(
    ctx: Extension<ApiContext>,
    payload: std::result::Result<Json<TagDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedTag>)> {
    let Json(draft) = payload.inspect_err(|e| error!("Error in creating tag: {e}"))?;
    let id = ctx.tags.save(draft).await
        .inspect_err(|e| error!("Error in creating tag: {e}"))?;
    Ok((StatusCode::CREATED, Json(SavedTag { id })))
}

async fn list_tags_sorted_by_desc_time(
    ctx: Extension<ApiContext>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<Vec<Tag>>> {
    let post_id = params.get("post_id").map(String::as_str).unwrap_or_default();
    let size = params.get("size").map(String::as_str).unwrap_or(DEFAULT_PAGE_SIZE);
    let from = params.get("from").map(String::as_str).unwrap_or(DEFAULT_PAGE_FROM);
    let tags = ctx.tags.list_sorted_by_desc_time(post_id, size, from).await
        .inspect_err(|e| error!("Error in retrieving tags: {e}"))?;
    Ok(Json(tags))
}

async fn count_tags_by_post_id(
    ctx: Extension<ApiContext>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<TagCounts>> {
    let Json(body) = payload.inspect_err(|e| error!("Error in counting tags: {e}"))?;
    let post_ids = body.get("postIds").unwrap_or(&Value::Null);
    let counts = ctx.tags.count_tags(post_ids).await
        .inspect_err(|e| error!("Error in counting tags: {e}"))?;
    Ok(Json(counts))
}
