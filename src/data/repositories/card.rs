use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{
    Card, CardChanges, CardHistory, CardText, Deck, DeckRef, NewCard, ReviewRecord,
};
use crate::schema::{cards, decks, review_records};

pub struct CardRepository;

impl CardRepository {
    /// A card together with its deck, only if the deck belongs to `user_id`.
    pub fn find_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        card_id: i32,
    ) -> Result<Option<(Card, Deck)>, diesel::result::Error> {
        cards::table
            .inner_join(decks::table)
            .filter(cards::card_id.eq(card_id))
            .filter(decks::user_id.eq(user_id))
            .select((Card::as_select(), Deck::as_select()))
            .first(conn)
            .optional()
    }

    pub fn create(
        conn: &mut SqliteConnection,
        deck_id: i32,
        text: &CardText,
        now: NaiveDateTime,
    ) -> Result<Card, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(cards::table)
                .values(&NewCard {
                    deck_id,
                    front: &text.front,
                    back: &text.back,
                    hint: text.hint.as_deref(),
                    created_at: now,
                    updated_at: now,
                })
                .execute(conn)?;

            let card_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            cards::table
                .find(card_id)
                .select(Card::as_select())
                .first(conn)
        })
    }

    pub fn update(
        conn: &mut SqliteConnection,
        card_id: i32,
        changes: &CardChanges,
    ) -> Result<Card, diesel::result::Error> {
        diesel::update(cards::table.find(card_id))
            .set(changes)
            .execute(conn)?;

        cards::table
            .find(card_id)
            .select(Card::as_select())
            .first(conn)
    }

    /// Deletes the card's review records, then the card.
    pub fn delete(conn: &mut SqliteConnection, card_id: i32) -> Result<(), diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(review_records::table.filter(review_records::card_id.eq(card_id)))
                .execute(conn)?;
            diesel::delete(cards::table.find(card_id)).execute(conn)?;
            Ok(())
        })
    }

    /// Every card in `user_id`'s decks with its full review history
    /// (oldest first). Cards come back in creation order.
    pub fn history_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<CardHistory>, diesel::result::Error> {
        let decks = decks::table
            .filter(decks::user_id.eq(user_id))
            .select(Deck::as_select())
            .load(conn)?;

        // No per-id IN lists: SQLite caps bound parameters at 32766
        let cards = cards::table
            .inner_join(decks::table)
            .filter(decks::user_id.eq(user_id))
            .order((cards::created_at.asc(), cards::card_id.asc()))
            .select(Card::as_select())
            .load(conn)?;

        let reviews = review_records::table
            .inner_join(cards::table.inner_join(decks::table))
            .filter(decks::user_id.eq(user_id))
            .order((review_records::reviewed_at.asc(), review_records::review_id.asc()))
            .select(ReviewRecord::as_select())
            .load(conn)?
            .grouped_by(&cards);

        let deck_refs: HashMap<i32, DeckRef> = decks
            .iter()
            .map(|deck| (deck.deck_id, DeckRef::from(deck)))
            .collect();

        Ok(cards
            .into_iter()
            .zip(reviews)
            .filter_map(|(card, reviews)| {
                let deck = deck_refs.get(&card.deck_id)?.clone();
                Some(CardHistory { card, deck, reviews })
            })
            .collect())
    }
}
