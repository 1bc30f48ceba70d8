//! Fixtures shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::CardText;
use crate::data::repositories::{CardRepository, DeckRepository, UserRepository};

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid fixture timestamp")
}

pub fn seed_user(conn: &mut SqliteConnection, email: &str) -> i32 {
    UserRepository::create_user(conn, email, "password123", 4)
        .expect("seed user")
        .user_id
}

pub fn seed_deck(conn: &mut SqliteConnection, user_id: i32, title: &str) -> i32 {
    DeckRepository::create(conn, user_id, title, None, at(2024, 1, 1, 0, 0, 0))
        .expect("seed deck")
        .deck_id
}

pub fn seed_card(
    conn: &mut SqliteConnection,
    deck_id: i32,
    front: &str,
    created_at: NaiveDateTime,
) -> i32 {
    let text = CardText {
        front: front.to_string(),
        back: format!("{} (back)", front),
        hint: None,
    };
    CardRepository::create(conn, deck_id, &text, created_at)
        .expect("seed card")
        .card_id
}

/// Bulk-inserts `count` cards into `deck_id`, all created 2024-01-01.
pub fn seed_many_cards(conn: &mut SqliteConnection, deck_id: i32, count: i32) {
    diesel::sql_query(
        "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?) \
         INSERT INTO cards (deck_id, front, back, created_at, updated_at) \
         SELECT ?, 'card ' || i, 'back ' || i, '2024-01-01 00:00:00', '2024-01-01 00:00:00' \
         FROM n",
    )
    .bind::<Integer, _>(count)
    .bind::<Integer, _>(deck_id)
    .execute(conn)
    .expect("seed many cards");
}
