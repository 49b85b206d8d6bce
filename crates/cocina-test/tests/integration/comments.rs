use salvo::http::StatusCode;
use serde_json::json;

use cocina_test::db::db::enums::{Language, Role};

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn comments_are_listed_oldest_first() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let id = app.create_recipe(&token, &recipe_body("Atole", true)).await;
    let path = format!("/api/comments/{id}");

    for content in ["  first  ", "second"] {
        let body = TestRequest::post(&path)
            .bearer(&token)
            .json(&json!({ "content": content }))
            .send(&app.service)
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        assert_eq!(body["message"], "Comment added successfully");
        assert_eq!(body["comment"]["recipeId"], id);
    }

    let body = TestRequest::get(&path)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let comments = body["comments"].as_array().expect("comments array");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "first");
    assert_eq!(comments[1]["content"], "second");
    assert_eq!(comments[0]["author"]["email"], "abuela@example.com");

    let recipe = TestRequest::get(&format!("/api/recipes/{id}"))
        .send(&app.service)
        .await
        .json();
    assert_eq!(recipe["recipe"]["commentsCount"], 2);
}

#[test_log::test(tokio::test)]
async fn comment_content_is_bounded() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let id = app.create_recipe(&token, &recipe_body("Atole", true)).await;
    let path = format!("/api/comments/{id}");

    for content in ["   ".to_string(), "a".repeat(1001)] {
        TestRequest::post(&path)
            .bearer(&token)
            .json(&json!({ "content": content }))
            .send(&app.service)
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_field_error("body", "content");
    }

    TestRequest::post("/api/comments/9999")
        .bearer(&token)
        .json(&json!({ "content": "hola" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Recipe not found");
}

#[test_log::test(tokio::test)]
async fn private_recipe_comments_follow_recipe_access() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, other_token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;
    let id = app
        .create_recipe(&owner_token, &recipe_body("Secret mole", false))
        .await;
    let path = format!("/api/comments/{id}");

    TestRequest::get(&path)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    TestRequest::post(&path)
        .bearer(&other_token)
        .json(&json!({ "content": "Let me in" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Access denied");
    TestRequest::get(&path)
        .bearer(&owner_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn only_author_or_admin_edit_and_delete() {
    let app = TestApp::new();
    let (_, author_token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;
    let (_, editor_token) = app
        .signed_in("tia@example.com", Role::Editor, Language::En)
        .await;
    let (_, admin_token) = app
        .signed_in("abuela@example.com", Role::Admin, Language::En)
        .await;
    let recipe_id = app
        .create_recipe(&editor_token, &recipe_body("Pan dulce", true))
        .await;

    let comment = TestRequest::post(&format!("/api/comments/{recipe_id}"))
        .bearer(&author_token)
        .json(&json!({ "content": "So good" }))
        .send(&app.service)
        .await
        .json();
    let comment_id = comment["comment"]["id"].as_i64().expect("comment id");
    let path = format!("/api/comments/{comment_id}");

    TestRequest::put(&path)
        .bearer(&editor_token)
        .json(&json!({ "content": "Edited by someone else" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let body = TestRequest::put(&path)
        .bearer(&author_token)
        .json(&json!({ "content": "So very good" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Comment updated successfully");
    assert_eq!(body["comment"]["content"], "So very good");

    TestRequest::delete(&path)
        .bearer(&admin_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    TestRequest::delete(&path)
        .bearer(&admin_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Comment not found");
}
