use crate::utils::try_respond;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tokio::task::JoinError;

/// Turns a loosely typed request payload into its checked form before any
/// storage call is made.
pub trait Validate
where
    Self: Sized,
{
    type Valid;
    fn validate(self) -> Result<Self::Valid, ApiError>;
}

/// Body of a vote PATCH. `inc_votes` stays untyped so a missing value and a
/// non-numeric one can be told apart.
#[derive(Debug, Deserialize)]
pub struct VotePatch {
    pub inc_votes: Option<Value>,
}

/// What a 404 names. Listing filters report the filter column (`username`,
/// `slug`, `article_id`), mutations report the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Article,
    ArticleId,
    Comment,
    Username,
    Slug,
    User,
    Resource,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Entity::Article => "article",
            Entity::ArticleId => "article_id",
            Entity::Comment => "comment",
            Entity::Username => "username",
            Entity::Slug => "slug",
            Entity::User => "user",
            Entity::Resource => "resource",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum ApiError {
    InvalidQueryParameter(&'static str),
    InvalidPagination,
    MissingField(&'static str),
    MissingRequiredFields,
    InvalidVoteDelta,
    BadRequest,
    NotFound(Entity),
    Diesel(DieselError),
    Internal,
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<::r2d2::Error> for ApiError {
    fn from(err: ::r2d2::Error) -> ApiError {
        log::error!("connection pool exhausted: {}", err);
        ApiError::Internal
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> ApiError {
        log::error!("storage task failed: {}", err);
        ApiError::Internal
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    /// Replaces a Diesel `NotFound` with the entity the caller was looking for.
    pub fn or_missing(self, entity: Entity) -> ApiError {
        match self {
            ApiError::Diesel(DieselError::NotFound) => ApiError::NotFound(entity),
            other => other,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidQueryParameter(_)
            | ApiError::InvalidPagination
            | ApiError::MissingField(_)
            | ApiError::MissingRequiredFields
            | ApiError::InvalidVoteDelta
            | ApiError::BadRequest => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Diesel(error) => match error {
                DieselError::NotFound => Status::NotFound,
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    Status::NotFound
                }
                DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _)
                | DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
                    Status::BadRequest
                }
                _ => Status::InternalServerError,
            },
            ApiError::Internal => Status::InternalServerError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidQueryParameter(field) => format!("invalid {} query", field),
            ApiError::InvalidPagination => "invalid limit or page query".into(),
            ApiError::MissingField(name) => format!("missing {}", name),
            ApiError::MissingRequiredFields => "missing required fields".into(),
            ApiError::InvalidVoteDelta => "invalid inc_votes value".into(),
            ApiError::BadRequest => "bad request".into(),
            ApiError::NotFound(entity) => format!("{} not found", entity),
            ApiError::Diesel(_) => {
                let status = self.status();
                if status == Status::NotFound {
                    format!("{} not found", Entity::Resource)
                } else if status == Status::BadRequest {
                    "bad request".into()
                } else {
                    "server error".into()
                }
            }
            ApiError::Internal => "server error".into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            log::error!("{} {}: {:?}", req.method(), req.uri(), self);
        }
        let body = json!({ "msg": self.message() });
        try_respond(req, &body, status)
    }
}
