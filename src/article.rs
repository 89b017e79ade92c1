use crate::db::lookup::{exists, Reference};
use crate::db::schema::articles;
use crate::db::Db;
use crate::listing::{self, ArticleListing, ArticlePage, ArticleQuery};
use crate::types::{ApiError, ApiResult, Entity, Validate, VotePatch};
use crate::utils::{parse_id, serialize_date, string_field, vote_delta, vote_headroom};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text, Timestamp};
use diesel::{delete as diesel_delete, insert_into, sql_query, update as diesel_update};
use rocket::http::Status;
use rocket::serde::json::{self, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::join;

pub static DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700";

static SELECT_ARTICLE: &str = "SELECT articles.article_id AS article_id,
       articles.title AS title,
       articles.topic AS topic,
       articles.author AS author,
       articles.body AS body,
       articles.created_at AS created_at,
       articles.votes AS votes,
       articles.article_img_url AS article_img_url,
       COUNT(comments.comment_id) AS comment_count
  FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id
 WHERE articles.article_id = ?
 GROUP BY articles.article_id";

#[derive(Debug, Serialize, QueryableByName)]
pub struct ArticleDetail {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Text)]
    pub body: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = BigInt)]
    pub votes: i64,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl ArticleDetail {
    pub fn load(id: i32, connection: &mut SqliteConnection) -> Result<ArticleDetail, ApiError> {
        sql_query(SELECT_ARTICLE)
            .bind::<Integer, _>(id)
            .get_result::<ArticleDetail>(connection)
            .map_err(|e| ApiError::from(e).or_missing(Entity::Article))
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    article: ArticleDetail,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticle {
    title: String,
    topic: String,
    author: String,
    body: String,
    article_img_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ArticleSubmission {
    author: Option<Value>,
    title: Option<Value>,
    body: Option<Value>,
    topic: Option<Value>,
    article_img_url: Option<Value>,
}

impl Validate for ArticleSubmission {
    type Valid = NewArticle;

    fn validate(self) -> Result<NewArticle, ApiError> {
        let required = [&self.author, &self.title, &self.body, &self.topic];
        if required.iter().any(|field| field.is_none()) {
            return Err(ApiError::MissingRequiredFields);
        }

        let article_img_url = match self.article_img_url {
            None => DEFAULT_IMAGE_URL.to_owned(),
            Some(Value::String(url)) => url,
            Some(_) => return Err(ApiError::BadRequest),
        };

        Ok(NewArticle {
            author: string_field(self.author, ApiError::MissingRequiredFields)?,
            title: string_field(self.title, ApiError::MissingRequiredFields)?,
            body: string_field(self.body, ApiError::MissingRequiredFields)?,
            topic: string_field(self.topic, ApiError::MissingRequiredFields)?,
            article_img_url,
        })
    }
}

#[get("/?<query..>")]
pub async fn list(db: Db, query: ArticleQuery) -> ApiResult<ArticlePage> {
    let listing = ArticleListing::parse(query)?;
    Ok(Json(listing::articles(&db, listing).await?))
}

#[get("/<article_id>")]
pub async fn get(db: Db, article_id: Result<i32, &str>) -> ApiResult<ArticleResponse> {
    let article_id = parse_id(article_id)?;
    let article = db
        .run(move |conn| ArticleDetail::load(article_id, conn))
        .await?;
    Ok(Json(ArticleResponse { article }))
}

/// A body without `inc_votes`, or no body at all, leaves the article as it is.
#[patch("/<article_id>", data = "<patch>")]
pub async fn vote(
    db: Db,
    article_id: Result<i32, &str>,
    patch: Result<Json<VotePatch>, json::Error<'_>>,
) -> ApiResult<ArticleResponse> {
    let article_id = parse_id(article_id)?;
    let patch = match patch {
        Ok(patch) => patch.into_inner(),
        Err(json::Error::Parse(raw, _)) if raw.trim().is_empty() => VotePatch { inc_votes: None },
        Err(_) => return Err(ApiError::BadRequest),
    };
    let delta = match patch.inc_votes {
        None => None,
        Some(value) => Some(vote_delta(&value).ok_or(ApiError::BadRequest)?),
    };

    let article = db
        .run(move |conn| {
            if let Some(delta) = delta {
                let (low, high) = vote_headroom(delta);
                let updated = diesel_update(
                    articles::table
                        .find(article_id)
                        .filter(articles::votes.between(low, high)),
                )
                .set(articles::votes.eq(articles::votes + delta))
                .execute(conn)?;
                if updated == 0 {
                    return if exists(conn, &Reference::Article(article_id))? {
                        Err(ApiError::BadRequest)
                    } else {
                        Err(ApiError::NotFound(Entity::Article))
                    };
                }
            }
            ArticleDetail::load(article_id, conn)
        })
        .await?;

    Ok(Json(ArticleResponse { article }))
}

#[post("/", data = "<create>")]
pub async fn create(
    db: Db,
    create: Option<Json<ArticleSubmission>>,
) -> Result<(Status, Json<ArticleResponse>), ApiError> {
    let new_article = create.ok_or(ApiError::BadRequest)?.into_inner().validate()?;

    let (author, topic) = join!(
        db.require(Reference::User(new_article.author.clone()), Entity::Resource),
        db.require(Reference::Topic(new_article.topic.clone()), Entity::Resource)
    );
    author?;
    topic?;

    let article = db
        .run(move |conn| {
            let article_id = insert_into(articles::table)
                .values(&new_article)
                .returning(articles::article_id)
                .get_result::<i32>(conn)?;
            ArticleDetail::load(article_id, conn)
        })
        .await?;

    Ok((Status::Created, Json(ArticleResponse { article })))
}

#[delete("/<article_id>")]
pub async fn delete(db: Db, article_id: Result<i32, &str>) -> Result<Status, ApiError> {
    let article_id = parse_id(article_id)?;
    let removed = db
        .run(move |conn| Ok(diesel_delete(articles::table.find(article_id)).execute(conn)?))
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound(Entity::Article));
    }
    Ok(Status::NoContent)
}
