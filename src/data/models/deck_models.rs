use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::models::{nullable_patch, AppError, CardWithLatest, User};
use crate::schema::decks;
use crate::utils::text::{optional_text, required_text};

/// A deck row, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = decks, primary_key(deck_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Deck {
    pub deck_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = decks)]
pub struct NewDeck<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update. `None` leaves a column alone, `Some(None)` clears the
/// description.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = decks)]
pub struct DeckChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Short reference to a deck, embedded in card payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckRef {
    pub deck_id: i32,
    pub title: String,
}

impl From<&Deck> for DeckRef {
    fn from(deck: &Deck) -> Self {
        Self {
            deck_id: deck.deck_id,
            title: deck.title.clone(),
        }
    }
}

/// Deck list entry
#[derive(Debug, Serialize)]
pub struct DeckSummary {
    #[serde(flatten)]
    pub deck: Deck,
    pub card_count: i64,
}

/// Deck detail with every card and its latest review
#[derive(Debug, Serialize)]
pub struct DeckWithCards {
    #[serde(flatten)]
    pub deck: Deck,
    pub card_count: usize,
    pub cards: Vec<CardWithLatest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

impl CreateDeckRequest {
    /// Trimmed `(title, description)`.
    pub fn normalize(self) -> Result<(String, Option<String>), AppError> {
        let title = required_text("Title", &self.title)?;
        Ok((title, optional_text(self.description.as_deref())))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeckRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub description: Option<Option<String>>,
}

impl UpdateDeckRequest {
    pub fn into_changes(self, now: NaiveDateTime) -> Result<DeckChanges, AppError> {
        let title = self
            .title
            .map(|t| required_text("Title", &t))
            .transpose()?;
        let description = self.description.map(|d| optional_text(d.as_deref()));

        Ok(DeckChanges {
            title,
            description,
            updated_at: Some(now),
        })
    }
}
