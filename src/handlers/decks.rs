use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::{
    data::models::{
        ApiResponse, AppError, CreateDeckRequest, Deck, DeckSummary, DeckWithCards,
        UpdateDeckRequest,
    },
    data::repositories::DeckRepository,
    db::DbPool,
    utils::CurrentUser,
};

pub async fn list_decks(
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<DeckSummary>>, AppError> {
    let mut conn = pool.get()?;
    let decks = DeckRepository::list_for_user(&mut conn, user_id)?;
    Ok(Json(decks))
}

pub async fn create_deck(
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateDeckRequest>, AppError>,
) -> Result<(StatusCode, Json<Deck>), AppError> {
    let (title, description) = payload.normalize()?;
    let mut conn = pool.get()?;

    let deck = DeckRepository::create(
        &mut conn,
        user_id,
        &title,
        description.as_deref(),
        Utc::now().naive_utc(),
    )?;

    log::info!("User {} created deck {}", user_id, deck.deck_id);
    Ok((StatusCode::CREATED, Json(deck)))
}

pub async fn view_deck(
    Path(deck_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DeckWithCards>, AppError> {
    let mut conn = pool.get()?;

    let deck = DeckRepository::find_owned(&mut conn, user_id, deck_id)?
        .ok_or(AppError::NotFound("Deck"))?;

    Ok(Json(DeckRepository::with_cards(&mut conn, deck)?))
}

pub async fn update_deck(
    Path(deck_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateDeckRequest>, AppError>,
) -> Result<Json<Deck>, AppError> {
    let mut conn = pool.get()?;

    if DeckRepository::find_owned(&mut conn, user_id, deck_id)?.is_none() {
        return Err(AppError::NotFound("Deck"));
    }

    let changes = payload.into_changes(Utc::now().naive_utc())?;
    Ok(Json(DeckRepository::update(&mut conn, deck_id, &changes)?))
}

pub async fn delete_deck(
    Path(deck_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse>, AppError> {
    let mut conn = pool.get()?;

    if DeckRepository::find_owned(&mut conn, user_id, deck_id)?.is_none() {
        return Err(AppError::NotFound("Deck"));
    }

    DeckRepository::delete(&mut conn, deck_id)?;

    log::info!("User {} deleted deck {}", user_id, deck_id);
    Ok(Json(ApiResponse::ok("Deck deleted successfully")))
}
