mod common;

use common::client;
use rocket::http::Status;
use serde_json::Value;

#[test]
fn lists_topics() {
    let client = client();
    let response = client.get("/api/topics").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().unwrap();
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    for topic in topics {
        assert!(topic["slug"].is_string());
        assert!(topic["description"].is_string());
    }
}

#[test]
fn lists_users() {
    let client = client();
    let response = client.get("/api/users").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().unwrap();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 4);
    for user in users {
        assert!(user["username"].is_string());
        assert!(user["name"].is_string());
        assert!(user["avatar_url"].is_string());
    }
}

#[test]
fn fetches_a_user_by_name() {
    let client = client();
    let response = client.get("/api/users/lurker").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["user"]["name"], "do_nothing");

    let response = client.get("/api/users/nobody").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().unwrap();
    assert_eq!(body["msg"], "user not found");
}
