use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{AppError, DueCard, NewReviewRecord};
use crate::data::repositories::{CardRepository, ReviewRepository};
use crate::features::srs::{compute_next_review, due, Grade, InvalidGrade, ScheduledReview};

/// Review scheduling on top of a borrowed connection. Every call is scoped
/// to the `user_id` it is given.
pub struct SrsEngine<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SrsEngine<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        SrsEngine { conn }
    }

    /// Grades `card_id` at `now` and appends the resulting review record.
    ///
    /// Fails with `NotFound` when the card is missing or belongs to another
    /// user, and with `InvalidGrade` before anything is written when the
    /// grade is unusable.
    pub fn record_review<G>(
        &mut self,
        user_id: i32,
        card_id: i32,
        grade: G,
        now: NaiveDateTime,
    ) -> Result<ScheduledReview, AppError>
    where
        G: TryInto<Grade, Error = InvalidGrade>,
    {
        // IMMEDIATE takes the write lock up front so concurrent reviewers
        // queue on busy_timeout instead of failing on lock upgrade.
        self.conn.immediate_transaction::<_, AppError, _>(|conn| {
            if CardRepository::find_owned(conn, user_id, card_id)?.is_none() {
                return Err(AppError::NotFound("Card"));
            }

            let scheduled = compute_next_review(grade, now)?;

            ReviewRepository::append(
                conn,
                &NewReviewRecord {
                    card_id,
                    grade: i32::from(scheduled.grade.value()),
                    interval_days: scheduled.interval_days,
                    next_due_at: scheduled.next_due_at,
                    reviewed_at: now,
                },
            )?;

            log::debug!(
                "card {} graded {} by user {}: next review in {} day(s)",
                card_id,
                scheduled.grade.value(),
                user_id,
                scheduled.interval_days
            );
            Ok(scheduled)
        })
    }

    /// The user's review queue at `now`: unreviewed cards and cards whose
    /// latest review has come due, oldest card first.
    pub fn due_cards(&mut self, user_id: i32, now: NaiveDateTime) -> Result<Vec<DueCard>, AppError> {
        let history = CardRepository::history_for_user(self.conn, user_id)?;
        Ok(due::select_due_cards(history, now))
    }
}
