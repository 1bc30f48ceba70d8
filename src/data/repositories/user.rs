use bcrypt::{hash, verify, BcryptError};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::data::models::{NewUser, RegisterError, User};
use crate::schema::users;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_id(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn verify_password(stored_hash: &str, input_password: &str) -> Result<bool, BcryptError> {
        verify(input_password, stored_hash)
    }

    /// Hashes `password` with `cost` and inserts the account.
    pub fn create_user(
        conn: &mut SqliteConnection,
        email: &str,
        password: &str,
        cost: u32,
    ) -> Result<User, RegisterError> {
        let hashed_password = hash(password, cost).map_err(RegisterError::HashingError)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(users::table)
                .values(&NewUser {
                    email,
                    password: &hashed_password,
                })
                .execute(conn)?;

            users::table
                .filter(users::email.eq(email))
                .select(User::as_select())
                .first(conn)
        })
        .map_err(|e| match e {
            // Lost a race with another registration for the same email
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                RegisterError::EmailTaken
            }
            other => RegisterError::DatabaseError(other),
        })
    }

    pub fn email_exists(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(users::table.filter(users::email.eq(email)))).get_result(conn)
    }
}
