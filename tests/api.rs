//! End-to-end behaviour of the user and post endpoints over an in-memory store.

mod common;

use std::sync::Arc;

use bson::oid::ObjectId;
use postbox::models::{NewUser, PostView, UserView};

use common::{app, get, json, post, MemoryStore};

#[tokio::test]
async fn created_user_reads_back_without_password() {
    let (router, _) = app();

    let res = post(&router, "/users", r#"{"name":"ada","email":"ada@example.com","password":"pw","posts":[]}"#).await;
    assert_eq!(res.status_code(), 201);
    let id = json(&res)["id"].as_str().unwrap().to_owned();
    assert_eq!(res.header("location"), Some(format!("/users/{id}").as_str()));

    let res = get(&router, &format!("/users/{id}")).await;
    assert_eq!(res.status_code(), 200);
    let user: UserView = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(user, UserView {
        id,
        name: "ada".into(),
        email: "ada@example.com".into(),
        posts: vec![],
    });
    assert!(json(&res).get("password").is_none());
}

#[tokio::test]
async fn created_post_reads_back() {
    let (router, _) = app();

    let res = post(&router, "/posts/", r#"{"caption":"hello","url":"http://x/1.png","timestamp":"yesterday"}"#).await;
    assert_eq!(res.status_code(), 201);
    let id = json(&res)["id"].as_str().unwrap().to_owned();

    let res = get(&router, &format!("/posts/{id}")).await;
    assert_eq!(res.status_code(), 200);
    let post: PostView = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(post.id, id);
    assert_eq!(post.caption, "hello");
    assert_eq!(post.timestamp, "yesterday");
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_404() {
    let (router, _) = app();
    let missing = ObjectId::new().to_hex();

    for path in [
        format!("/users/{missing}"),
        format!("/posts/{missing}"),
        format!("/posts/users/{missing}"),
        "/users/abc123".to_owned(),
        "/posts/zzz".to_owned(),
    ] {
        let res = get(&router, &path).await;
        assert_eq!(res.status_code(), 404, "{path}");
        assert_eq!(json(&res)["error"], "not found");
    }
}

#[tokio::test]
async fn malformed_bodies_are_400() {
    let (router, store) = app();

    for (path, body) in [
        ("/users", "{not json"),
        ("/users", ""),
        ("/posts", "[1,2,3]"),
        ("/users", r#"{"name":"bob","posts":["not-an-id"]}"#),
    ] {
        let res = post(&router, path, body).await;
        assert_eq!(res.status_code(), 400, "{path} {body}");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn user_posts_come_back_as_array_in_list_order() {
    let (router, _) = app();

    let mut ids = Vec::new();
    for caption in ["first", "second", "third"] {
        let res = post(&router, "/posts", &format!(r#"{{"caption":"{caption}"}}"#)).await;
        ids.push(json(&res)["id"].as_str().unwrap().to_owned());
    }
    // Reverse order plus a repeat, to prove order follows the list.
    let listed = vec![ids[2].clone(), ids[0].clone(), ids[2].clone()];
    let body = serde_json::json!({ "name": "ada", "posts": listed }).to_string();
    let user_id = json(&post(&router, "/users", &body).await)["id"].as_str().unwrap().to_owned();

    let res = get(&router, &format!("/posts/users/{user_id}")).await;
    assert_eq!(res.status_code(), 200);
    let posts: Vec<PostView> = serde_json::from_slice(res.body()).unwrap();
    let captions: Vec<_> = posts.iter().map(|p| p.caption.as_str()).collect();
    assert_eq!(captions, ["third", "first", "third"]);
}

#[tokio::test]
async fn user_without_posts_gets_empty_array() {
    let (router, _) = app();
    let user_id = json(&post(&router, "/users", r#"{"name":"solo"}"#).await)["id"]
        .as_str().unwrap().to_owned();

    let res = get(&router, &format!("/posts/users/{user_id}")).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"[]");
}

#[tokio::test]
async fn dangling_post_reference_fails_whole_response() {
    let (router, store) = app();
    let real = json(&post(&router, "/posts", r#"{"caption":"kept"}"#).await)["id"]
        .as_str().unwrap().to_owned();

    let mut user = NewUser { name: "ada".into(), ..Default::default() }.into_user().unwrap();
    user.posts = vec![real, ObjectId::new().to_hex()];
    let user_id = user.id.to_hex();
    store.put_user(user);

    let res = get(&router, &format!("/posts/users/{user_id}")).await;
    assert_eq!(res.status_code(), 500);
    assert_eq!(json(&res)["error"], "internal server error");
}

#[tokio::test]
async fn corrupt_stored_reference_is_500() {
    let (router, store) = app();
    let mut user = NewUser::default().into_user().unwrap();
    user.posts = vec!["garbage".into()];
    let user_id = user.id.to_hex();
    store.put_user(user);

    let res = get(&router, &format!("/posts/users/{user_id}")).await;
    assert_eq!(res.status_code(), 500);
}

#[tokio::test]
async fn nested_route_is_not_shadowed_by_single_post_route() {
    let (router, store) = app();

    // A user id is not a post id, so the single-post handler would 404 here.
    let user_id = json(&post(&router, "/users", r#"{"name":"x"}"#).await)["id"]
        .as_str().unwrap().to_owned();
    let before = store.calls();

    let res = get(&router, &format!("/posts/users/{user_id}")).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"[]");
    // find_user + find_posts
    assert_eq!(store.calls() - before, 2);
}

#[tokio::test]
async fn unmatched_paths_are_404_without_store_access() {
    let (router, store) = app();

    for (method, path) in [("GET", "/unknown"), ("DELETE", "/users/abc"), ("GET", "/users"), ("PUT", "/posts")] {
        let res = router.respond(postbox::Request::new(method, path, Vec::new())).await;
        assert_eq!(res.status_code(), 404, "{method} {path}");
        assert_eq!(res.body(), b"not found");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let (router, _) = app();
    let router = Arc::new(router);

    let a = tokio::spawn({
        let router = Arc::clone(&router);
        async move { post(&router, "/users", r#"{"name":"a"}"#).await }
    });
    let b = tokio::spawn({
        let router = Arc::clone(&router);
        async move { post(&router, "/users", r#"{"name":"b"}"#).await }
    });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let id_a = json(&a)["id"].as_str().unwrap().to_owned();
    let id_b = json(&b)["id"].as_str().unwrap().to_owned();
    assert_ne!(id_a, id_b);

    assert_eq!(json(&get(&router, &format!("/users/{id_a}")).await)["name"], "a");
    assert_eq!(json(&get(&router, &format!("/users/{id_b}")).await)["name"], "b");
}

#[tokio::test]
async fn store_outage_is_500_and_not_ready() {
    let store = Arc::new(MemoryStore::unreachable());
    let router = postbox::api::routes(store);

    let res = get(&router, &format!("/users/{}", ObjectId::new().to_hex())).await;
    assert_eq!(res.status_code(), 500);

    assert_eq!(get(&router, "/readyz").await.status_code(), 503);
    assert_eq!(get(&router, "/healthz").await.body(), b"ok");
}
