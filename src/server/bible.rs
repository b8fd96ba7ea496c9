use abide_core::scripture::{resolve, BibleResponse};
use abide_core::{ScriptureError, ScriptureProvider, TextGenerator};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{AppState, ErrorBody};

/// Query string of `GET /api/bible`
#[derive(Debug, Deserialize)]
pub struct BibleQuery {
    pub book: Option<String>,
    pub chap: Option<String>,
}

fn status_for(error: &ScriptureError) -> StatusCode {
    match error {
        ScriptureError::UnknownBook(_) | ScriptureError::ChapterOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        ScriptureError::NotFound { .. } => StatusCode::NOT_FOUND,
        ScriptureError::Request(_) | ScriptureError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

/// `GET /api/bible?book=約&chap=3`, answered in the FHL `qb.php` shape.
pub async fn bible_handler<G, P>(
    State(state): State<AppState<G, P>>,
    Query(query): Query<BibleQuery>,
) -> Response
where
    G: TextGenerator + 'static,
    P: ScriptureProvider + 'static,
{
    let (Some(book), Some(chap)) = (query.book, query.chap) else {
        return (StatusCode::BAD_REQUEST, ErrorBody::new("Missing book or chap")).into_response();
    };
    let Ok(chapter) = chap.trim().parse::<u32>() else {
        return (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(format!("Invalid chapter: {}", chap)),
        )
            .into_response();
    };

    let result = match resolve(&book, chapter) {
        Ok(found) => state
            .scripture
            .fetch_chapter(found.name, chapter)
            .await
            .map(|verses| BibleResponse::from_verses(found, &verses)),
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::BAD_GATEWAY {
                tracing::error!("Bible lookup {} {} failed: {}", book, chapter, e);
            }
            (status, ErrorBody::new(e)).into_response()
        }
    }
}
