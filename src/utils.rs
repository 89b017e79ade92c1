use crate::types::ApiError;
use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::content::RawJson;
use rocket::response::{self, Responder, Response};
use serde::Serializer;
use serde_json::{self, Value};

pub fn try_respond<'r>(
    req: &'r Request<'_>,
    json: &Value,
    status: Status,
) -> response::Result<'static> {
    let as_json = serde_json::to_string(json);
    match as_json {
        Ok(json) => RawJson(json)
            .respond_to(req)
            .and_then(|resp| Response::build_from(resp).status(status).ok()),

        Err(_) => Err(Status::InternalServerError),
    }
}

/// Storage timestamps carry no zone; they are written as UTC.
pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = Utc
        .from_utc_datetime(date)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

pub fn parse_id(raw: Result<i32, &str>) -> Result<i32, ApiError> {
    raw.map_err(|_| ApiError::BadRequest)
}

/// Reads a required string out of a JSON body field.
pub fn string_field(value: Option<Value>, missing: ApiError) -> Result<String, ApiError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ApiError::BadRequest),
        None => Err(missing),
    }
}

/// `inc_votes` must be a whole number that fits the votes column.
pub fn vote_delta(value: &Value) -> Option<i64> {
    value.as_i64()
}

/// Range the current `votes` must lie in for `votes + delta` to stay in
/// range. Updates filter on it so an overflowing vote matches no row.
pub fn vote_headroom(delta: i64) -> (i64, i64) {
    if delta >= 0 {
        (i64::MIN, i64::MAX - delta)
    } else {
        (i64::MIN - delta, i64::MAX)
    }
}
