use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{NewReviewRecord, ReviewRecord};
use crate::schema::review_records;

/// Append-only access to review history.
pub struct ReviewRepository;

impl ReviewRepository {
    pub fn append(
        conn: &mut SqliteConnection,
        record: &NewReviewRecord,
    ) -> Result<ReviewRecord, diesel::result::Error> {
        diesel::insert_into(review_records::table)
            .values(record)
            .execute(conn)?;

        let review_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
            .get_result::<i32>(conn)?;

        review_records::table
            .find(review_id)
            .select(ReviewRecord::as_select())
            .first(conn)
    }

    /// Most recent first, `review_id` breaking ties.
    pub fn recent_for_card(
        conn: &mut SqliteConnection,
        card_id: i32,
        limit: i64,
    ) -> Result<Vec<ReviewRecord>, diesel::result::Error> {
        review_records::table
            .filter(review_records::card_id.eq(card_id))
            .order((review_records::reviewed_at.desc(), review_records::review_id.desc()))
            .limit(limit)
            .select(ReviewRecord::as_select())
            .load(conn)
    }
}

#[cfg(test)]
impl ReviewRepository {
    pub fn latest_for_card(
        conn: &mut SqliteConnection,
        card_id: i32,
    ) -> Result<Option<ReviewRecord>, diesel::result::Error> {
        Ok(Self::recent_for_card(conn, card_id, 1)?.into_iter().next())
    }

    pub fn count_for_card(
        conn: &mut SqliteConnection,
        card_id: i32,
    ) -> Result<i64, diesel::result::Error> {
        review_records::table
            .filter(review_records::card_id.eq(card_id))
            .count()
            .get_result(conn)
    }
}
