use chrono::NaiveDateTime;

use crate::data::models::{CardHistory, DueCard, ReviewRecord, ReviewSummary};

/// The review that decides a card's schedule: greatest `reviewed_at`, then
/// greatest `review_id`.
pub fn latest_review(history: &[ReviewRecord]) -> Option<&ReviewRecord> {
    history
        .iter()
        .max_by_key(|review| (review.reviewed_at, review.review_id))
}

/// A card with no reviews is always due. Otherwise it is due once the
/// latest review's `next_due_at` has been reached (inclusive).
pub fn is_due(history: &[ReviewRecord], now: NaiveDateTime) -> bool {
    latest_review(history).is_none_or(|review| review.next_due_at <= now)
}

/// Filters `cards` down to the ones due at `now`, oldest card first.
/// The input is expected to be scoped to a single user already.
pub fn select_due_cards(cards: Vec<CardHistory>, now: NaiveDateTime) -> Vec<DueCard> {
    let mut due: Vec<DueCard> = cards
        .into_iter()
        .filter(|entry| is_due(&entry.reviews, now))
        .map(|entry| DueCard {
            latest_review: latest_review(&entry.reviews).map(ReviewSummary::from),
            card: entry.card,
            deck: entry.deck,
        })
        .collect();

    due.sort_by_key(|entry| (entry.card.created_at, entry.card.card_id));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Card, DeckRef};
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn card(card_id: i32, created_at: NaiveDateTime) -> Card {
        Card {
            card_id,
            deck_id: 1,
            front: format!("front {}", card_id),
            back: format!("back {}", card_id),
            hint: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn review(review_id: i32, reviewed_at: NaiveDateTime, interval_days: i32) -> ReviewRecord {
        ReviewRecord {
            review_id,
            card_id: 1,
            grade: 3,
            interval_days,
            next_due_at: reviewed_at + Duration::days(interval_days as i64),
            reviewed_at,
        }
    }

    fn history(card: Card, reviews: Vec<ReviewRecord>) -> CardHistory {
        CardHistory {
            card,
            deck: DeckRef {
                deck_id: 1,
                title: "Deck".into(),
            },
            reviews,
        }
    }

    #[test]
    fn unreviewed_card_is_always_due() {
        assert!(is_due(&[], t0()));
        assert!(is_due(&[], NaiveDateTime::MIN));
        assert!(is_due(&[], NaiveDateTime::MAX));
    }

    #[test]
    fn due_boundary_is_inclusive() {
        let reviews = [review(1, t0(), 7)];
        let due_at = t0() + Duration::days(7);

        assert!(!is_due(&reviews, t0() + Duration::seconds(1)));
        assert!(!is_due(&reviews, due_at - Duration::seconds(1)));
        assert!(is_due(&reviews, due_at));
        assert!(is_due(&reviews, due_at + Duration::days(30)));
    }

    #[test]
    fn only_the_latest_review_counts() {
        let t1 = t0();
        let t2 = t0() + Duration::hours(2);
        // Earlier review due after one day, later review due after four
        let reviews = [review(1, t1, 1), review(2, t2, 4)];

        let between = t1 + Duration::days(2);
        assert!(!is_due(&reviews, between));
        assert!(is_due(&reviews, t2 + Duration::days(4)));

        // Order of the slice does not matter
        let reversed = [review(2, t2, 4), review(1, t1, 1)];
        assert!(!is_due(&reversed, between));
    }

    #[test]
    fn equal_timestamps_fall_back_to_review_id() {
        let same = t0();
        let reviews = [review(7, same, 7), review(8, same, 1)];
        assert_eq!(latest_review(&reviews).map(|r| r.review_id), Some(8));
        assert!(is_due(&reviews, same + Duration::days(1)));
    }

    #[test]
    fn selection_filters_and_orders_by_creation() {
        let now = t0() + Duration::days(3);
        let cards = vec![
            history(card(3, t0()), vec![]),
            history(card(1, t0() + Duration::minutes(5)), vec![]),
            history(card(2, t0()), vec![review(1, t0(), 1)]),
            history(card(4, t0() - Duration::days(1)), vec![review(2, t0(), 7)]),
        ];

        let due = select_due_cards(cards, now);
        let ids: Vec<i32> = due.iter().map(|d| d.card.card_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        assert!(due[1].latest_review.is_none());
        assert_eq!(due[0].latest_review.as_ref().map(|r| r.grade), Some(3));
    }

    #[test]
    fn selection_is_stable_across_calls() {
        let build = || {
            (1..=20)
                .rev()
                .map(|id| history(card(id, t0()), vec![]))
                .collect::<Vec<_>>()
        };

        let first: Vec<i32> = select_due_cards(build(), t0()).iter().map(|d| d.card.card_id).collect();
        let second: Vec<i32> = select_due_cards(build(), t0()).iter().map(|d| d.card.card_id).collect();
        assert_eq!(first, second);
        assert_eq!(first, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn nothing_due_is_empty() {
        let cards = vec![history(card(1, t0()), vec![review(1, t0(), 7)])];
        assert!(select_due_cards(cards, t0()).is_empty());
    }
}
