use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::schema::users;

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users, primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub password: String, // bcrypt hash
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// What the API exposes about an account.
#[derive(Debug, Serialize, serde::Deserialize, PartialEq)]
pub struct UserInfo {
    pub user_id: i32,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
        }
    }
}
