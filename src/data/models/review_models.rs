use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::models::{Card, DeckRef};
use crate::schema::review_records;

/// One graded review. Rows are only ever inserted; `review_id` increases
/// strictly and breaks ties between equal `reviewed_at` values.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = review_records, primary_key(review_id))]
#[diesel(belongs_to(Card, foreign_key = card_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRecord {
    pub review_id: i32,
    pub card_id: i32,
    pub grade: i32,
    pub interval_days: i32,
    pub next_due_at: NaiveDateTime,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = review_records)]
pub struct NewReviewRecord {
    pub card_id: i32,
    pub grade: i32,
    pub interval_days: i32,
    pub next_due_at: NaiveDateTime,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub grade: i32,
    pub reviewed_at: NaiveDateTime,
    pub next_due_at: NaiveDateTime,
}

impl From<&ReviewRecord> for ReviewSummary {
    fn from(record: &ReviewRecord) -> Self {
        Self {
            grade: record.grade,
            reviewed_at: record.reviewed_at,
            next_due_at: record.next_due_at,
        }
    }
}

/// A card with its deck and full review history, oldest review first.
#[derive(Debug, Clone)]
pub struct CardHistory {
    pub card: Card,
    pub deck: DeckRef,
    pub reviews: Vec<ReviewRecord>,
}

/// Entry of the review queue
#[derive(Debug, Serialize)]
pub struct DueCard {
    #[serde(flatten)]
    pub card: Card,
    pub deck: DeckRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_review: Option<ReviewSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub card_id: i32,
    // Kept raw so that non-integral or out-of-range grades surface as
    // InvalidGrade rather than a body parse failure.
    #[serde(default)]
    pub grade: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub interval_days: i32,
    pub next_due_at: NaiveDateTime,
}
