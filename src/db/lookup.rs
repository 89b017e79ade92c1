//! Existence checks against the reference columns filters and mutations
//! point at. Table and column come from `Reference`, never from the request;
//! only the value is bound.

use crate::db::schema::{articles, comments, topics, users};
use crate::db::Db;
use crate::types::{ApiError, Entity};
use diesel::dsl;
use diesel::prelude::*;
use diesel::select;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Topic(String),
    User(String),
    Article(i32),
    Comment(i32),
}

/// True when at least one row matches. Absence is not an error here.
pub fn exists(conn: &mut SqliteConnection, reference: &Reference) -> QueryResult<bool> {
    match reference {
        Reference::Topic(slug) => {
            select(dsl::exists(topics::table.filter(topics::slug.eq(slug)))).get_result(conn)
        }
        Reference::User(username) => {
            select(dsl::exists(users::table.filter(users::username.eq(username))))
                .get_result(conn)
        }
        Reference::Article(id) => {
            select(dsl::exists(articles::table.filter(articles::article_id.eq(*id))))
                .get_result(conn)
        }
        Reference::Comment(id) => {
            select(dsl::exists(comments::table.filter(comments::comment_id.eq(*id))))
                .get_result(conn)
        }
    }
}

impl Db {
    pub async fn exists(&self, reference: Reference) -> Result<bool, ApiError> {
        self.run(move |conn| Ok(exists(conn, &reference)?)).await
    }

    /// Fails with `NotFound(missing)` when nothing matches.
    pub async fn require(&self, reference: Reference, missing: Entity) -> Result<(), ApiError> {
        if self.exists(reference).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound(missing))
        }
    }

    pub async fn require_some(
        &self,
        reference: Option<Reference>,
        missing: Entity,
    ) -> Result<(), ApiError> {
        match reference {
            Some(reference) => self.require(reference, missing).await,
            None => Ok(()),
        }
    }
}
