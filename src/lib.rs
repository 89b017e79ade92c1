#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate serde_json;

pub mod article;
pub mod comment;
pub mod config;
pub mod db;
pub mod listing;
pub mod topic;
pub mod types;
pub mod users;
mod utils;

use rocket::{Build, Rocket};
use serde_json::Value;

#[catch(400)]
fn bad_request() -> Value {
    json!({ "msg": "bad request" })
}

#[catch(404)]
fn not_found() -> Value {
    json!({ "msg": "path not found" })
}

#[catch(422)]
fn unprocessable() -> Value {
    json!({ "msg": "bad request" })
}

#[catch(500)]
fn server_error() -> Value {
    json!({ "msg": "server error" })
}

/// Assembles the application around an already built pool.
pub fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount("/api/topics", routes![topic::list])
        .mount("/api/users", routes![users::list, users::get])
        .mount(
            "/api/articles",
            routes![
                article::list,
                article::get,
                article::vote,
                article::create,
                article::delete,
                comment::list,
                comment::add
            ],
        )
        .mount("/api/comments", routes![comment::delete, comment::vote])
        .register("/", catchers![bad_request, not_found, unprocessable, server_error])
}
