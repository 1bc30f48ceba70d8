use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::{
    data::models::{
        ApiResponse, AppError, Card, CardDetail, CreateCardRequest, DeckRef, ReviewSummary,
        UpdateCardRequest,
    },
    data::repositories::{CardRepository, DeckRepository, ReviewRepository},
    db::DbPool,
    utils::CurrentUser,
};

/// How many past reviews the card view shows.
const RECENT_REVIEWS: i64 = 5;

pub async fn create_card(
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCardRequest>, AppError>,
) -> Result<(StatusCode, Json<Card>), AppError> {
    let text = payload.normalize()?;
    let mut conn = pool.get()?;

    if DeckRepository::find_owned(&mut conn, user_id, payload.deck_id)?.is_none() {
        return Err(AppError::NotFound("Deck"));
    }

    let card = CardRepository::create(&mut conn, payload.deck_id, &text, Utc::now().naive_utc())?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn view_card(
    Path(card_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<CardDetail>, AppError> {
    let mut conn = pool.get()?;

    let (card, deck) = CardRepository::find_owned(&mut conn, user_id, card_id)?
        .ok_or(AppError::NotFound("Card"))?;

    let reviews = ReviewRepository::recent_for_card(&mut conn, card_id, RECENT_REVIEWS)?
        .iter()
        .map(ReviewSummary::from)
        .collect();

    Ok(Json(CardDetail {
        card,
        deck: DeckRef::from(&deck),
        reviews,
    }))
}

pub async fn update_card(
    Path(card_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCardRequest>, AppError>,
) -> Result<Json<Card>, AppError> {
    let mut conn = pool.get()?;

    if CardRepository::find_owned(&mut conn, user_id, card_id)?.is_none() {
        return Err(AppError::NotFound("Card"));
    }

    let changes = payload.into_changes(Utc::now().naive_utc())?;
    Ok(Json(CardRepository::update(&mut conn, card_id, &changes)?))
}

pub async fn delete_card(
    Path(card_id): Path<i32>,
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse>, AppError> {
    let mut conn = pool.get()?;

    if CardRepository::find_owned(&mut conn, user_id, card_id)?.is_none() {
        return Err(AppError::NotFound("Card"));
    }

    CardRepository::delete(&mut conn, card_id)?;
    Ok(Json(ApiResponse::ok("Card deleted successfully")))
}
