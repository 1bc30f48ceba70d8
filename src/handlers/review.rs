use axum::extract::{Json, State};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::{
    data::models::{AppError, DueCard, ReviewRequest, ReviewResponse},
    db::DbPool,
    features::srs::SrsEngine,
    utils::CurrentUser,
};

/// The review queue as of now.
pub async fn due_cards(
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<DueCard>>, AppError> {
    let mut conn = pool.get()?;
    let due = SrsEngine::new(&mut conn).due_cards(user_id, Utc::now().naive_utc())?;
    Ok(Json(due))
}

pub async fn submit_review(
    State(pool): State<DbPool>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<ReviewRequest>, AppError>,
) -> Result<Json<ReviewResponse>, AppError> {
    let mut conn = pool.get()?;

    let scheduled = SrsEngine::new(&mut conn).record_review(
        user_id,
        payload.card_id,
        &payload.grade,
        Utc::now().naive_utc(),
    )?;

    Ok(Json(ReviewResponse {
        success: true,
        interval_days: scheduled.interval_days,
        next_due_at: scheduled.next_due_at,
    }))
}
