use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Rejected review grade. Carries the offending input as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Grade must be an integer between 0 and 5, got {0}")]
pub struct InvalidGrade(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    InvalidGrade(#[from] InvalidGrade),
    #[error("Next review date is out of range")]
    OutOfRange,
}

/// A validated review grade in `0..=5`. Higher means better recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }

    /// Days until the next review. Fixed table, no state carried between
    /// reviews: 0 to 2 give one day, then 2, 4 and 7 days.
    pub fn interval_days(self) -> i32 {
        match self.0 {
            0..=2 => 1,
            3 => 2,
            4 => 4,
            5 => 7,
            _ => 1,
        }
    }
}

impl TryFrom<i64> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|g| *g <= Grade::MAX)
            .map(Grade)
            .ok_or_else(|| InvalidGrade(value.to_string()))
    }
}

impl TryFrom<i32> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Grade::try_from(i64::from(value))
    }
}

impl TryFrom<f64> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || !(0.0..=5.0).contains(&value) {
            return Err(InvalidGrade(value.to_string()));
        }
        Ok(Grade(value as u8))
    }
}

/// Grades arrive in request bodies either as JSON numbers or as numeric
/// strings (`"4"`). Anything else is rejected.
impl TryFrom<&Value> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Grade::try_from(i),
                None => n
                    .as_f64()
                    .ok_or_else(|| InvalidGrade(n.to_string()))
                    .and_then(Grade::try_from),
            },
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| InvalidGrade(format!("{:?}", s)))
                .and_then(Grade::try_from),
            other => Err(InvalidGrade(other.to_string())),
        }
    }
}

/// Outcome of scheduling one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledReview {
    pub grade: Grade,
    pub interval_days: i32,
    pub next_due_at: NaiveDateTime,
}

impl ScheduledReview {
    /// `None` when the due date would overflow the calendar.
    pub fn for_grade(grade: Grade, now: NaiveDateTime) -> Option<Self> {
        let interval_days = grade.interval_days();
        // Whole days; time-of-day is kept
        let next_due_at = now.checked_add_signed(Duration::days(i64::from(interval_days)))?;
        Some(Self {
            grade,
            interval_days,
            next_due_at,
        })
    }
}

/// Validates `grade` and computes the interval and next due date relative
/// to `now`. Pure: nothing is persisted here.
pub fn compute_next_review<G>(grade: G, now: NaiveDateTime) -> Result<ScheduledReview, ScheduleError>
where
    G: TryInto<Grade, Error = InvalidGrade>,
{
    let grade = grade.try_into()?;
    ScheduledReview::for_grade(grade, now).ok_or(ScheduleError::OutOfRange)
}
