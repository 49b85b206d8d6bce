use salvo::http::StatusCode;

use cocina_test::db::db::enums::{Language, Role};

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn favorite_lifecycle() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (fan, fan_token) = app
        .signed_in("nieta@example.com", Role::Viewer, Language::Es)
        .await;
    let first = app
        .create_recipe(&owner_token, &recipe_body("Sopa", true))
        .await;
    let second = app
        .create_recipe(&owner_token, &recipe_body("Flan", true))
        .await;

    for id in [first, second] {
        let body = TestRequest::post(&format!("/api/favorites/{id}"))
            .bearer(&fan_token)
            .send(&app.service)
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        assert_eq!(body["message"], "Recipe added to favorites");
        assert_eq!(body["favorite"]["userId"], fan.id);
        assert_eq!(body["favorite"]["recipeId"], id);
    }

    TestRequest::post(&format!("/api/favorites/{first}"))
        .bearer(&fan_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Recipe already in favorites");

    let body = TestRequest::get("/api/favorites")
        .bearer(&fan_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let recipes = body["recipes"].as_array().expect("recipes array");
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["id"], second);
    assert_eq!(recipes[0]["favoritesCount"], 1);

    TestRequest::delete(&format!("/api/favorites/{first}"))
        .bearer(&fan_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    TestRequest::delete(&format!("/api/favorites/{first}"))
        .bearer(&fan_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Favorite not found");
}

#[test_log::test(tokio::test)]
async fn favorites_require_auth_and_read_access() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, other_token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;
    let hidden = app
        .create_recipe(&owner_token, &recipe_body("Hidden", false))
        .await;

    TestRequest::get("/api/favorites")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    TestRequest::post(&format!("/api/favorites/{hidden}"))
        .bearer(&other_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    TestRequest::post("/api/favorites/4242")
        .bearer(&other_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Recipe not found");
}
