pub mod session;
pub mod text;

pub use session::{clear_session, require_user_id, set_user_session, CurrentUser};
