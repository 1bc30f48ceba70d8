pub mod due;
pub mod engine;
pub mod scheduler;

pub use due::latest_review;
pub use engine::SrsEngine;
pub use scheduler::{compute_next_review, Grade, InvalidGrade, ScheduleError, ScheduledReview};
