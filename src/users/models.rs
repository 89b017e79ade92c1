use crate::db::schema::users;
use crate::types::{ApiError, Entity};
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

impl User {
    pub fn load_all(connection: &mut SqliteConnection) -> Result<Vec<User>, ApiError> {
        users::table
            .select(User::as_select())
            .order(users::username)
            .load(connection)
            .map_err(|e| e.into())
    }

    pub fn load_by_name(name: &str, connection: &mut SqliteConnection) -> Result<User, ApiError> {
        users::table
            .find(name)
            .select(User::as_select())
            .first(connection)
            .map_err(|e| ApiError::from(e).or_missing(Entity::User))
    }
}
