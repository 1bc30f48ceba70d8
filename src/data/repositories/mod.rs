pub mod card;
pub mod deck;
pub mod review;
pub mod user;

pub use card::CardRepository;
pub use deck::DeckRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
