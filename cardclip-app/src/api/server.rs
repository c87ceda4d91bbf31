use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::routes::{
    create_flashcard, delete_flashcard, due_cards, get_flashcard, list_flashcards, post_review,
    review_batch, stats, update_flashcard, AppState,
};
use cardclip_core::Store;

pub async fn run(store: Arc<dyn Store>, addr: SocketAddr) -> anyhow::Result<()> {
    init_tracing();
    let state = Arc::new(AppState { store });

    let app = Router::new()
        .route("/flashcards", get(list_flashcards).post(create_flashcard))
        .route(
            "/flashcards/:id",
            get(get_flashcard)
                .put(update_flashcard)
                .delete(delete_flashcard),
        )
        .route("/due", get(due_cards))
        .route("/batch", get(review_batch))
        .route("/review", post(post_review))
        .route("/stats", get(stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "cardclip api listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
