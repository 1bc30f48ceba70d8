use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{
    Card, CardWithLatest, Deck, DeckChanges, DeckSummary, DeckWithCards, NewDeck, ReviewRecord,
    ReviewSummary,
};
use crate::features::srs::latest_review;
use crate::schema::{cards, decks, review_records};

pub struct DeckRepository;

impl DeckRepository {
    /// The user's decks, most recently updated first, with card counts.
    pub fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Vec<DeckSummary>, diesel::result::Error> {
        let decks = decks::table
            .filter(decks::user_id.eq(user_id))
            .order((decks::updated_at.desc(), decks::deck_id.desc()))
            .select(Deck::as_select())
            .load(conn)?;

        let counts: HashMap<i32, i64> = cards::table
            .inner_join(decks::table)
            .filter(decks::user_id.eq(user_id))
            .group_by(cards::deck_id)
            .select((cards::deck_id, count(cards::card_id)))
            .load::<(i32, i64)>(conn)?
            .into_iter()
            .collect();

        Ok(decks
            .into_iter()
            .map(|deck| {
                let card_count = counts.get(&deck.deck_id).copied().unwrap_or(0);
                DeckSummary { deck, card_count }
            })
            .collect())
    }

    /// Looks a deck up by id, but only among `user_id`'s decks.
    pub fn find_owned(
        conn: &mut SqliteConnection,
        user_id: i32,
        deck_id: i32,
    ) -> Result<Option<Deck>, diesel::result::Error> {
        decks::table
            .filter(decks::deck_id.eq(deck_id))
            .filter(decks::user_id.eq(user_id))
            .select(Deck::as_select())
            .first(conn)
            .optional()
    }

    pub fn create(
        conn: &mut SqliteConnection,
        user_id: i32,
        title: &str,
        description: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Deck, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(decks::table)
                .values(&NewDeck {
                    user_id,
                    title,
                    description,
                    created_at: now,
                    updated_at: now,
                })
                .execute(conn)?;

            let deck_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            decks::table
                .find(deck_id)
                .select(Deck::as_select())
                .first(conn)
        })
    }

    pub fn update(
        conn: &mut SqliteConnection,
        deck_id: i32,
        changes: &DeckChanges,
    ) -> Result<Deck, diesel::result::Error> {
        diesel::update(decks::table.find(deck_id))
            .set(changes)
            .execute(conn)?;

        decks::table
            .find(deck_id)
            .select(Deck::as_select())
            .first(conn)
    }

    /// Removes the deck with its cards and their review history.
    pub fn delete(conn: &mut SqliteConnection, deck_id: i32) -> Result<(), diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let deck_cards = cards::table
                .filter(cards::deck_id.eq(deck_id))
                .select(cards::card_id);

            diesel::delete(review_records::table.filter(review_records::card_id.eq_any(deck_cards)))
                .execute(conn)?;
            diesel::delete(cards::table.filter(cards::deck_id.eq(deck_id))).execute(conn)?;
            diesel::delete(decks::table.find(deck_id)).execute(conn)?;
            Ok(())
        })
    }

    /// Every card of `deck` in creation order, each with its latest review.
    pub fn with_cards(
        conn: &mut SqliteConnection,
        deck: Deck,
    ) -> Result<DeckWithCards, diesel::result::Error> {
        let cards = Card::belonging_to(&deck)
            .order((cards::created_at.asc(), cards::card_id.asc()))
            .select(Card::as_select())
            .load(conn)?;

        let reviews = review_records::table
            .inner_join(cards::table)
            .filter(cards::deck_id.eq(deck.deck_id))
            .order((review_records::reviewed_at.asc(), review_records::review_id.asc()))
            .select(ReviewRecord::as_select())
            .load(conn)?
            .grouped_by(&cards);

        let cards: Vec<CardWithLatest> = cards
            .into_iter()
            .zip(reviews)
            .map(|(card, history)| CardWithLatest {
                latest_review: latest_review(&history).map(ReviewSummary::from),
                card,
            })
            .collect();

        Ok(DeckWithCards {
            deck,
            card_count: cards.len(),
            cards,
        })
    }
}
