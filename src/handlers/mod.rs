pub mod auth;
pub mod cards;
pub mod decks;
pub mod review;

use axum::{
    routing::{get, post},
    Router,
};

use crate::db::DbPool;

pub fn api_router(pool: DbPool) -> Router {
    let deck_router = Router::new()
        .route("/", get(decks::list_decks).post(decks::create_deck))
        .route(
            "/{deck_id}",
            get(decks::view_deck)
                .patch(decks::update_deck)
                .delete(decks::delete_deck),
        );

    let card_router = Router::new()
        .route("/", post(cards::create_card))
        .route(
            "/{card_id}",
            get(cards::view_card)
                .patch(cards::update_card)
                .delete(cards::delete_card),
        );

    let review_router = Router::new()
        .route("/", get(review::due_cards).post(review::submit_review));

    Router::new()
        .nest("/decks", deck_router)
        .nest("/cards", card_router)
        .nest("/review", review_router)
        .with_state(pool)
}
