//! Recipe listing, lookup, authoring and deletion.

use salvo::http::StatusCode;
use serde_json::json;

use cocina_test::db::db::enums::{Language, Role};

use super::helpers::*;

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["recipes"]
        .as_array()
        .expect("recipes array")
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test_log::test(tokio::test)]
async fn public_list_hides_private_and_paginates() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    for title in ["Pozole", "Tamales", "Mole"] {
        app.create_recipe(&token, &recipe_body(title, true)).await;
    }
    app.create_recipe(&token, &recipe_body("Secret salsa", false))
        .await;

    let body = TestRequest::get("/api/recipes?limit=2")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(titles(&body), vec!["Mole", "Tamales"]);
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 })
    );

    let body = TestRequest::get("/api/recipes?limit=2&page=2")
        .bearer(&token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(titles(&body), vec!["Pozole"]);
}

#[test_log::test(tokio::test)]
async fn list_rejects_bad_query_values() {
    let app = TestApp::new();
    for (query, param) in [
        ("page=0", "page"),
        ("page=abc", "page"),
        ("limit=51", "limit"),
        ("language=fr", "language"),
    ] {
        TestRequest::get(&format!("/api/recipes?{query}"))
            .send(&app.service)
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_field_error("query", param);
    }
}

#[test_log::test(tokio::test)]
async fn search_category_and_tag_filters() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let mut soup = recipe_body("Chicken soup", true);
    soup["tags"] = json!(["comfort"]);
    soup["categories"] = json!(["soups"]);
    app.create_recipe(&token, &soup).await;
    let mut cake = recipe_body("Tres leches cake", true);
    cake["categories"] = json!(["desserts"]);
    app.create_recipe(&token, &cake).await;

    let body = TestRequest::get("/api/recipes?search=SOUP")
        .send(&app.service)
        .await
        .json();
    assert_eq!(titles(&body), vec!["Chicken soup"]);

    let body = TestRequest::get("/api/recipes?category=desserts")
        .send(&app.service)
        .await
        .json();
    assert_eq!(titles(&body), vec!["Tres leches cake"]);

    let body = TestRequest::get("/api/recipes?tag=comfort")
        .send(&app.service)
        .await
        .json();
    assert_eq!(titles(&body), vec!["Chicken soup"]);
}

#[test_log::test(tokio::test)]
async fn projection_follows_language_preference() {
    let app = TestApp::new();
    let (_, en_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, es_token) = app
        .signed_in("nieta@example.com", Role::Viewer, Language::Es)
        .await;
    let mut body = recipe_body("Rice", true);
    body["titleEs"] = json!("Arroz");
    body["ingredientsEs"] = json!(["1 taza de arroz"]);
    let id = app.create_recipe(&en_token, &body).await;
    let path = format!("/api/recipes/{id}");

    let en = TestRequest::get(&path).send(&app.service).await.json();
    assert_eq!(en["recipe"]["title"], "Rice");
    assert_eq!(en["recipe"]["author"]["email"], "abuela@example.com");

    let es = TestRequest::get(&path)
        .bearer(&es_token)
        .send(&app.service)
        .await
        .json();
    assert_eq!(es["recipe"]["title"], "Arroz");
    assert_eq!(es["recipe"]["ingredients"], json!(["1 taza de arroz"]));
    assert_eq!(es["recipe"]["instructions"], "Mix and cook.");

    let listed = TestRequest::get("/api/recipes?language=es")
        .bearer(&en_token)
        .send(&app.service)
        .await
        .json();
    assert_eq!(titles(&listed), vec!["Arroz"]);
}

#[test_log::test(tokio::test)]
async fn private_recipe_visibility() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, viewer_token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;
    let (_, editor_token) = app
        .signed_in("tia@example.com", Role::Editor, Language::En)
        .await;
    let id = app
        .create_recipe(&owner_token, &recipe_body("Family secret", false))
        .await;
    let path = format!("/api/recipes/{id}");

    TestRequest::get(&path)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Access denied");
    TestRequest::get(&path)
        .bearer(&viewer_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    TestRequest::get(&path)
        .bearer(&editor_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    let mine = TestRequest::get("/api/recipes/my")
        .bearer(&owner_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(titles(&mine), vec!["Family secret"]);

    TestRequest::get("/api/recipes/my")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn create_validates_required_fields() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;

    TestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&json!({ "titleEn": "  ", "ingredientsEn": [], "servings": 0, "prepTime": -1 }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_field_error("body", "titleEn")
        .assert_field_error("body", "ingredientsEn")
        .assert_field_error("body", "instructionsEn")
        .assert_field_error("body", "servings")
        .assert_field_error("body", "prepTime");

    TestRequest::post("/api/recipes")
        .json(&recipe_body("Anonymous", true))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let created = TestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&json!({
            "titleEn": " Flan ",
            "ingredientsEn": ["eggs", "milk"],
            "instructionsEn": "Bake.",
            "tags": ["sweet", "sweet"],
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(created["message"], "Recipe created successfully");
    assert_eq!(created["recipe"]["title"], "Flan");
    assert_eq!(created["recipe"]["isPublic"], true);
    assert_eq!(created["recipe"]["tags"], json!(["sweet"]));
    assert_eq!(created["recipe"]["commentsCount"], 0);
}

#[test_log::test(tokio::test)]
async fn update_is_partial_and_role_gated() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, viewer_token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;
    let (_, editor_token) = app
        .signed_in("tia@example.com", Role::Editor, Language::En)
        .await;
    let mut body = recipe_body("Enchiladas", true);
    body["servings"] = json!(4);
    let id = app.create_recipe(&owner_token, &body).await;
    let path = format!("/api/recipes/{id}");

    TestRequest::put(&path)
        .bearer(&viewer_token)
        .json(&json!({ "titleEn": "Mine now" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = TestRequest::put(&path)
        .bearer(&editor_token)
        .json(&json!({ "titleEn": "Green enchiladas", "servings": null }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["message"], "Recipe updated successfully");
    assert_eq!(updated["recipe"]["title"], "Green enchiladas");
    assert_eq!(updated["recipe"]["ingredients"], json!(["1 cup masa"]));
    assert!(updated["recipe"]["servings"].is_null());

    TestRequest::put(&path)
        .bearer(&owner_token)
        .json(&json!({ "ingredientsEn": [] }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_field_error("body", "ingredientsEn");

    TestRequest::put("/api/recipes/9999")
        .bearer(&owner_token)
        .json(&json!({ "titleEn": "Ghost" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Recipe not found");
}

#[test_log::test(tokio::test)]
async fn delete_cascades_and_releases_media() {
    let app = TestApp::new();
    let (_, owner_token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;
    let (_, editor_token) = app
        .signed_in("tia@example.com", Role::Editor, Language::En)
        .await;
    let id = app
        .create_recipe(&owner_token, &recipe_body("Churros", true))
        .await;

    TestRequest::post(&format!("/api/comments/{id}"))
        .bearer(&editor_token)
        .json(&json!({ "content": "Delicious" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);
    TestRequest::post(&format!("/api/favorites/{id}"))
        .bearer(&editor_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);
    TestRequest::post(&format!("/api/upload/{id}"))
        .bearer(&owner_token)
        .multipart(
            &[],
            Some(&FilePart {
                file_name: "churros.jpg",
                content_type: "image/jpeg",
                bytes: b"jpeg",
            }),
        )
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);

    TestRequest::delete(&format!("/api/recipes/{id}"))
        .bearer(&editor_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::delete(&format!("/api/recipes/{id}"))
        .bearer(&owner_token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::get(&format!("/api/recipes/{id}"))
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Recipe not found");
    assert_eq!(app.store.favorite_count().await, 0);
    assert_eq!(
        *app.media.destroyed.lock().unwrap(),
        vec!["family-recipes/1".to_string()]
    );
}

#[test_log::test(tokio::test)]
async fn non_numeric_id_is_a_params_error() {
    let app = TestApp::new();
    for path in ["/api/recipes/abc", "/api/recipes/0", "/api/recipes/-3"] {
        TestRequest::get(path)
            .send(&app.service)
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_field_error("params", "id");
    }
}
