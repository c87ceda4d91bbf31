use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use cardclip_core::{
    daily_streak,
    gesture::Gesture,
    scheduler::{due_flashcards, next_review_batch, DEFAULT_BATCH_SIZE},
    summarize, CoreError, Store,
};

use crate::api::dto::{parse_difficulty, BatchQuery, CardIn, CardOut, ErrorOut, ReviewIn, StatsOut};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

fn bad_request(msg: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorOut { error: msg.into() }),
    )
        .into_response()
}

pub async fn list_flashcards(State(st): State<Arc<AppState>>) -> Json<Vec<CardOut>> {
    let mut cards = st.store.list_flashcards().await;
    cards.sort_by_key(|c| c.created_at);
    Json(cards.into_iter().map(CardOut::from).collect())
}

pub async fn create_flashcard(
    State(st): State<Arc<AppState>>,
    Json(body): Json<CardIn>,
) -> Response {
    match st
        .store
        .save_flashcard(&body.front, &body.back, &body.tags)
        .await
    {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(CoreError::Invalid(msg)) => bad_request(msg),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub async fn get_flashcard(State(st): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match st.store.get_flashcard(id).await {
        Some(c) => Json(CardOut::from(c)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Cards are addressed by id; a bare decimal index is honored as a shim for
/// the first web client, which addressed cards by list position.
pub async fn update_flashcard(
    State(st): State<Arc<AppState>>,
    Path(sel): Path<String>,
    Json(body): Json<CardIn>,
) -> Response {
    let existing = if let Ok(id) = Uuid::parse_str(&sel) {
        match st.store.get_flashcard(id).await {
            Some(c) => c,
            None => return StatusCode::NOT_FOUND.into_response(),
        }
    } else if let Ok(index) = sel.parse::<usize>() {
        let mut cards = st.store.list_flashcards().await;
        cards.sort_by_key(|c| c.created_at);
        match cards.into_iter().nth(index) {
            Some(c) => c,
            None => return bad_request("Invalid flashcard index"),
        }
    } else {
        return bad_request("Invalid flashcard index");
    };

    let mut card = existing;
    card.front = body.front;
    card.back = body.back;
    card.tags = body.tags;

    match st.store.update_flashcard(&card).await {
        Ok(Some(c)) => Json(CardOut::from(c)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(CoreError::Invalid(msg)) => bad_request(msg),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub async fn delete_flashcard(State(st): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match st.store.delete_flashcard(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub async fn due_cards(State(st): State<Arc<AppState>>) -> Json<Vec<CardOut>> {
    let mut cards = due_flashcards(&*st.store, Utc::now()).await;
    cards.sort_by_key(|c| c.created_at);
    Json(cards.into_iter().map(CardOut::from).collect())
}

pub async fn review_batch(
    State(st): State<Arc<AppState>>,
    Query(q): Query<BatchQuery>,
) -> Json<Vec<CardOut>> {
    let count = q.count.unwrap_or(DEFAULT_BATCH_SIZE);
    let batch = next_review_batch(&*st.store, Utc::now(), count).await;
    Json(batch.into_iter().map(CardOut::from).collect())
}

pub async fn post_review(State(st): State<Arc<AppState>>, Json(body): Json<ReviewIn>) -> Response {
    let difficulty = match (body.difficulty.as_deref(), body.gesture.as_deref()) {
        (Some(d), None) => match parse_difficulty(d) {
            Some(d) => d,
            None => return bad_request("unknown difficulty"),
        },
        (None, Some(g)) => match Gesture::parse(g) {
            Some(g) => g.difficulty(),
            None => return bad_request("unknown gesture"),
        },
        _ => return bad_request("provide exactly one of difficulty or gesture"),
    };

    match st.store.save_review(body.flashcard_id, difficulty).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub async fn stats(State(st): State<Arc<AppState>>) -> Json<StatsOut> {
    let reviews = st.store.list_reviews().await;
    let s = summarize(&reviews);
    Json(StatsOut {
        totals: s.totals,
        daily_streak: daily_streak(&reviews, Utc::now().date_naive()),
    })
}
