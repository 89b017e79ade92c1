use crate::db::lookup::{exists, Reference};
use crate::db::schema::comments;
use crate::db::Db;
use crate::listing::{self, CommentListing, PageQuery};
use crate::types::{ApiError, ApiResult, Entity, Validate, VotePatch};
use crate::utils::{parse_id, serialize_date, string_field, vote_delta, vote_headroom};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::{delete as diesel_delete, insert_into, update as diesel_update};
use rocket::http::Status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::join;

#[derive(Debug, Serialize, PartialEq, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: i32,
    pub article_id: i32,
    pub body: String,
    pub votes: i64,
    pub author: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    article_id: i32,
    author: String,
    body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentSubmission {
    username: Option<Value>,
    body: Option<Value>,
}

impl Validate for CommentSubmission {
    type Valid = (String, String);

    /// Presence of both fields is checked before their types.
    fn validate(self) -> Result<(String, String), ApiError> {
        if self.username.is_none() {
            return Err(ApiError::MissingField("username"));
        }
        if self.body.is_none() {
            return Err(ApiError::MissingField("body"));
        }
        let username = string_field(self.username, ApiError::MissingField("username"))?;
        let body = string_field(self.body, ApiError::MissingField("body"))?;
        Ok((username, body))
    }
}

#[derive(Debug, Serialize)]
pub struct CommentContainer<T> {
    comment: T,
}

#[derive(Debug, Serialize)]
pub struct CommentsContainer<T> {
    comments: T,
}

#[get("/<article_id>/comments?<query..>")]
pub async fn list(
    db: Db,
    article_id: Result<i32, &str>,
    query: PageQuery,
) -> ApiResult<CommentsContainer<Vec<Comment>>> {
    let listing = CommentListing::parse(parse_id(article_id)?, query)?;
    let comments = listing::comments(&db, listing).await?;
    Ok(Json(CommentsContainer { comments }))
}

#[post("/<article_id>/comments", data = "<details>")]
pub async fn add(
    db: Db,
    article_id: Result<i32, &str>,
    details: Option<Json<CommentSubmission>>,
) -> Result<(Status, Json<CommentContainer<Comment>>), ApiError> {
    let article_id = parse_id(article_id)?;
    let details = details.ok_or(ApiError::BadRequest)?.into_inner();
    let (author, body) = details.validate()?;

    let (article, user) = join!(
        db.require(Reference::Article(article_id), Entity::Article),
        db.require(Reference::User(author.clone()), Entity::User)
    );
    article?;
    user?;

    let new_comment = NewComment {
        article_id,
        author,
        body,
    };
    let comment = db
        .run(move |conn| {
            Ok(insert_into(comments::table)
                .values(&new_comment)
                .returning(Comment::as_returning())
                .get_result(conn)?)
        })
        .await?;

    Ok((Status::Created, Json(CommentContainer { comment })))
}

#[delete("/<comment_id>")]
pub async fn delete(db: Db, comment_id: Result<i32, &str>) -> Result<Status, ApiError> {
    let comment_id = parse_id(comment_id)?;
    let removed = db
        .run(move |conn| Ok(diesel_delete(comments::table.find(comment_id)).execute(conn)?))
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound(Entity::Comment));
    }
    Ok(Status::NoContent)
}

#[patch("/<comment_id>", data = "<patch>")]
pub async fn vote(
    db: Db,
    comment_id: Result<i32, &str>,
    patch: Option<Json<VotePatch>>,
) -> ApiResult<CommentContainer<Comment>> {
    let comment_id = parse_id(comment_id)?;
    let delta = patch
        .and_then(|patch| patch.into_inner().inc_votes)
        .as_ref()
        .and_then(vote_delta)
        .ok_or(ApiError::InvalidVoteDelta)?;

    let comment = db
        .run(move |conn| {
            let (low, high) = vote_headroom(delta);
            let updated = diesel_update(
                comments::table
                    .find(comment_id)
                    .filter(comments::votes.between(low, high)),
            )
            .set(comments::votes.eq(comments::votes + delta))
            .returning(Comment::as_returning())
            .get_result(conn)
            .optional()?;
            match updated {
                Some(comment) => Ok(comment),
                None => {
                    if exists(conn, &Reference::Comment(comment_id))? {
                        Err(ApiError::InvalidVoteDelta)
                    } else {
                        Err(ApiError::NotFound(Entity::Comment))
                    }
                }
            }
        })
        .await?;

    Ok(Json(CommentContainer { comment }))
}
