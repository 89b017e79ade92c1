use crate::db::schema::topics;
use crate::db::Db;
use crate::types::ApiResult;
use diesel::prelude::*;
use rocket::serde::json::Json;
use serde::Serialize;

#[derive(Debug, Serialize, Queryable, Selectable)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub slug: String,
    pub description: String,
    pub img_url: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    topics: Vec<Topic>,
}

#[get("/")]
pub async fn list(db: Db) -> ApiResult<TopicsResponse> {
    let topics = db
        .run(|conn| {
            Ok(topics::table
                .select(Topic::as_select())
                .order(topics::slug)
                .load(conn)?)
        })
        .await?;
    Ok(Json(TopicsResponse { topics }))
}
