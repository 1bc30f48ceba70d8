pub mod api_models;
pub mod auth_models;
pub mod card_models;
pub mod deck_models;
pub mod review_models;
pub mod user_models;

use serde::{Deserialize, Deserializer};

pub use api_models::{ApiResponse, AppError};
pub use auth_models::{LoginError, LoginForm, RegisterError, RegisterForm};
pub use card_models::{
    Card, CardChanges, CardDetail, CardText, CardWithLatest, CreateCardRequest, NewCard,
    UpdateCardRequest,
};
pub use deck_models::{
    CreateDeckRequest, Deck, DeckChanges, DeckRef, DeckSummary, DeckWithCards, NewDeck,
    UpdateDeckRequest,
};
pub use review_models::{
    CardHistory, DueCard, NewReviewRecord, ReviewRecord, ReviewRequest, ReviewResponse,
    ReviewSummary,
};
pub use user_models::{NewUser, User, UserInfo};

/// For PATCH bodies: a present field (even `null`) becomes `Some(..)`.
/// Pair with `#[serde(default)]` so a missing field stays `None`.
pub(crate) fn nullable_patch<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
