use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::models::{nullable_patch, AppError, Deck, DeckRef, ReviewSummary};
use crate::schema::cards;
use crate::utils::text::{optional_text, required_text};

/// A flashcard. Belongs to exactly one deck; front and back are never blank.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = cards, primary_key(card_id))]
#[diesel(belongs_to(Deck, foreign_key = deck_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    pub card_id: i32,
    pub deck_id: i32,
    pub front: String,
    pub back: String,
    pub hint: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = cards)]
pub struct NewCard<'a> {
    pub deck_id: i32,
    pub front: &'a str,
    pub back: &'a str,
    pub hint: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = cards)]
pub struct CardChanges {
    pub front: Option<String>,
    pub back: Option<String>,
    pub hint: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Card as listed inside a deck
#[derive(Debug, Serialize)]
pub struct CardWithLatest {
    #[serde(flatten)]
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_review: Option<ReviewSummary>,
}

/// Single card view: the card, its deck and its most recent reviews
/// (newest first).
#[derive(Debug, Serialize)]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    pub deck: DeckRef,
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub deck_id: i32,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    pub hint: Option<String>,
}

/// Validated card text, ready to insert.
#[derive(Debug, PartialEq)]
pub struct CardText {
    pub front: String,
    pub back: String,
    pub hint: Option<String>,
}

impl CreateCardRequest {
    pub fn normalize(&self) -> Result<CardText, AppError> {
        Ok(CardText {
            front: required_text("Front", &self.front)?,
            back: required_text("Back", &self.back)?,
            hint: optional_text(self.hint.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub hint: Option<Option<String>>,
}

impl UpdateCardRequest {
    pub fn into_changes(self, now: NaiveDateTime) -> Result<CardChanges, AppError> {
        Ok(CardChanges {
            front: self.front.map(|f| required_text("Front", &f)).transpose()?,
            back: self.back.map(|b| required_text("Back", &b)).transpose()?,
            hint: self.hint.map(|h| optional_text(h.as_deref())),
            updated_at: Some(now),
        })
    }
}
