// Kept in sync by hand with `db::SCHEMA_SQL`.

diesel::table! {
    users (user_id) {
        user_id -> Integer,
        email -> Text,
        password -> Text,
    }
}

diesel::table! {
    decks (deck_id) {
        deck_id -> Integer,
        user_id -> Integer,
        title -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    cards (card_id) {
        card_id -> Integer,
        deck_id -> Integer,
        front -> Text,
        back -> Text,
        hint -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    review_records (review_id) {
        review_id -> Integer,
        card_id -> Integer,
        grade -> Integer,
        interval_days -> Integer,
        next_due_at -> Timestamp,
        reviewed_at -> Timestamp,
    }
}

diesel::joinable!(decks -> users (user_id));
diesel::joinable!(cards -> decks (deck_id));
diesel::joinable!(review_records -> cards (card_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    decks,
    cards,
    review_records,
);
