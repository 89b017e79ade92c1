//! Listing queries for articles and comments.
//!
//! Raw query-string values are checked against fixed greenlists, then turned
//! into a list of predicates and rendered into one statement with `?`
//! placeholders. Identifiers only ever come from the enums below; every value
//! from the request is a bind.

use crate::comment::Comment;
use crate::db::lookup::Reference;
use crate::db::Db;
use crate::types::{ApiError, Entity};
use crate::utils::serialize_date;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text, Timestamp};
use diesel::sqlite::Sqlite;
use serde::Serialize;
use tokio::{join, try_join};

pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Author,
    Title,
    ArticleId,
    Topic,
    CreatedAt,
    Votes,
    ImageUrl,
    CommentCount,
}

impl SortBy {
    pub fn parse(raw: &str) -> Option<SortBy> {
        let sort_by = match raw {
            "author" => SortBy::Author,
            "title" => SortBy::Title,
            "article_id" => SortBy::ArticleId,
            "topic" => SortBy::Topic,
            "created_at" => SortBy::CreatedAt,
            "votes" => SortBy::Votes,
            "article_img_url" | "image_url" => SortBy::ImageUrl,
            "comment_count" => SortBy::CommentCount,
            _ => return None,
        };
        Some(sort_by)
    }

    fn column(self) -> &'static str {
        match self {
            SortBy::Author => "articles.author",
            SortBy::Title => "articles.title",
            SortBy::ArticleId => "articles.article_id",
            SortBy::Topic => "articles.topic",
            SortBy::CreatedAt => "articles.created_at",
            SortBy::Votes => "articles.votes",
            SortBy::ImageUrl => "articles.article_img_url",
            // aggregate alias from the select list
            SortBy::CommentCount => "comment_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn parse(raw: &str) -> Option<Order> {
        match raw {
            "asc" => Some(Order::Asc),
            "desc" => Some(Order::Desc),
            _ => None,
        }
    }

    /// Newest first by default; every other column reads ascending.
    pub fn default_for(sort_by: SortBy) -> Order {
        match sort_by {
            SortBy::CreatedAt => Order::Desc,
            _ => Order::Asc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    offset: i64,
}

impl Page {
    /// Both values must be positive integers when present.
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Page, ApiError> {
        let limit = positive(limit, DEFAULT_LIMIT)?;
        let number = positive(page, 1)?;
        let offset = (number - 1)
            .checked_mul(limit)
            .ok_or(ApiError::InvalidPagination)?;
        Ok(Page { limit, offset })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Page {
        Page {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn positive(raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::InvalidPagination),
        },
    }
}

/// A value handed to the driver alongside the statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ArticleAuthor,
    ArticleTopic,
    CommentArticleId,
}

impl Column {
    fn qualified(self) -> &'static str {
        match self {
            Column::ArticleAuthor => "articles.author",
            Column::ArticleTopic => "articles.topic",
            Column::CommentArticleId => "comments.article_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub op: Operator,
    pub value: Bound,
}

impl Predicate {
    pub fn eq(column: Column, value: Bound) -> Predicate {
        Predicate {
            column,
            op: Operator::Eq,
            value,
        }
    }
}

/// Statement text plus its binds, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSql {
    pub sql: String,
    pub binds: Vec<Bound>,
}

impl RenderedSql {
    fn new(sql: &str) -> RenderedSql {
        RenderedSql {
            sql: sql.to_owned(),
            binds: Vec::new(),
        }
    }

    fn push_where(&mut self, predicates: &[Predicate]) {
        for (i, predicate) in predicates.iter().enumerate() {
            self.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            self.sql.push_str(predicate.column.qualified());
            self.sql.push(' ');
            self.sql.push_str(predicate.op.as_str());
            self.sql.push_str(" ?");
            self.binds.push(predicate.value.clone());
        }
    }

    fn push_window(&mut self, page: Page) {
        self.sql.push_str(" LIMIT ? OFFSET ?");
        self.binds.push(Bound::Int(page.limit));
        self.binds.push(Bound::Int(page.offset()));
    }

    pub fn into_query(self) -> BoxedSqlQuery<'static, Sqlite, SqlQuery> {
        let query: BoxedSqlQuery<'static, Sqlite, SqlQuery> = sql_query(self.sql).into_boxed();
        self.binds
            .into_iter()
            .fold(query, |query, bind| match bind {
                Bound::Text(value) => query.bind::<Text, _>(value),
                Bound::Int(value) => query.bind::<BigInt, _>(value),
            })
    }
}

static SELECT_ARTICLES: &str = "SELECT articles.author AS author, \
     articles.title AS title, \
     articles.article_id AS article_id, \
     articles.topic AS topic, \
     articles.created_at AS created_at, \
     articles.votes AS votes, \
     articles.article_img_url AS article_img_url, \
     COUNT(comments.comment_id) AS comment_count \
     FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id";

static COUNT_ARTICLES: &str = "SELECT COUNT(*) AS total_count FROM articles";

static SELECT_COMMENTS: &str = "SELECT comments.comment_id AS comment_id, \
     comments.votes AS votes, \
     comments.created_at AS created_at, \
     comments.author AS author, \
     comments.body AS body, \
     comments.article_id AS article_id \
     FROM comments";

#[derive(Debug, Default, FromForm)]
pub struct ArticleQuery {
    pub author: Option<String>,
    pub topic: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub p: Option<String>,
}

#[derive(Debug, Default, FromForm)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub p: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleListing {
    pub author: Option<String>,
    pub topic: Option<String>,
    pub sort_by: SortBy,
    pub order: Order,
    pub page: Page,
}

impl ArticleListing {
    /// Checks sort_by, then order, then pagination. Filter values are only
    /// checked against storage later.
    pub fn parse(query: ArticleQuery) -> Result<ArticleListing, ApiError> {
        let sort_by = match query.sort_by.as_deref() {
            None => SortBy::CreatedAt,
            Some(raw) => SortBy::parse(raw).ok_or(ApiError::InvalidQueryParameter("sort_by"))?,
        };
        let order = match query.order.as_deref() {
            None => Order::default_for(sort_by),
            Some(raw) => Order::parse(raw).ok_or(ApiError::InvalidQueryParameter("order"))?,
        };
        let page = Page::parse(query.limit.as_deref(), query.p.as_deref())?;
        Ok(ArticleListing {
            author: query.author.filter(|a| !a.is_empty()),
            topic: query.topic.filter(|t| !t.is_empty()),
            sort_by,
            order,
            page,
        })
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(author) = &self.author {
            predicates.push(Predicate::eq(
                Column::ArticleAuthor,
                Bound::Text(author.clone()),
            ));
        }
        if let Some(topic) = &self.topic {
            predicates.push(Predicate::eq(
                Column::ArticleTopic,
                Bound::Text(topic.clone()),
            ));
        }
        predicates
    }

    pub fn select(&self) -> RenderedSql {
        let mut rendered = RenderedSql::new(SELECT_ARTICLES);
        rendered.push_where(&self.predicates());
        rendered.sql.push_str(" GROUP BY articles.article_id ORDER BY ");
        rendered.sql.push_str(self.sort_by.column());
        rendered.sql.push(' ');
        rendered.sql.push_str(self.order.keyword());
        rendered.push_window(self.page);
        rendered
    }

    /// Same predicates as `select`, no window.
    pub fn count(&self) -> RenderedSql {
        let mut rendered = RenderedSql::new(COUNT_ARTICLES);
        rendered.push_where(&self.predicates());
        rendered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentListing {
    pub article_id: i32,
    pub page: Page,
}

impl CommentListing {
    pub fn parse(article_id: i32, query: PageQuery) -> Result<CommentListing, ApiError> {
        let page = Page::parse(query.limit.as_deref(), query.p.as_deref())?;
        Ok(CommentListing { article_id, page })
    }

    pub fn select(&self) -> RenderedSql {
        let mut rendered = RenderedSql::new(SELECT_COMMENTS);
        rendered.push_where(&[Predicate::eq(
            Column::CommentArticleId,
            Bound::Int(i64::from(self.article_id)),
        )]);
        rendered.sql.push_str(" ORDER BY comments.created_at DESC");
        rendered.push_window(self.page);
        rendered
    }
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct ArticleSummary {
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub topic: String,
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

#[derive(Debug, QueryableByName)]
struct Total {
    #[diesel(sql_type = BigInt)]
    total_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleSummary>,
    pub total_count: i64,
}

/// Runs an article listing. Filter values are existence-checked first so an
/// unknown author or topic is a 404 rather than an empty page.
pub async fn articles(db: &Db, listing: ArticleListing) -> Result<ArticlePage, ApiError> {
    let author = listing.author.clone().map(Reference::User);
    let topic = listing.topic.clone().map(Reference::Topic);
    let (author, topic) = join!(
        db.require_some(author, Entity::Username),
        db.require_some(topic, Entity::Slug)
    );
    author?;
    topic?;

    let select = listing.select();
    let count = listing.count();
    log::debug!("article listing: {} {:?}", select.sql, select.binds);

    let (articles, total) = try_join!(
        db.run(move |conn| Ok(select.into_query().load::<ArticleSummary>(conn)?)),
        db.run(move |conn| Ok(count.into_query().get_result::<Total>(conn)?)),
    )?;
    Ok(ArticlePage {
        articles,
        total_count: total.total_count,
    })
}

pub async fn comments(db: &Db, listing: CommentListing) -> Result<Vec<Comment>, ApiError> {
    db.require(Reference::Article(listing.article_id), Entity::ArticleId)
        .await?;
    let select = listing.select();
    log::debug!("comment listing: {} {:?}", select.sql, select.binds);
    db.run(move |conn| Ok(select.into_query().load::<Comment>(conn)?))
        .await
}
