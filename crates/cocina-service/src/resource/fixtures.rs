//! Shared setup for orchestrator tests.

use cocina_core::config::AuthConfig;
use cocina_db::db::enums::{Language, Role};
use cocina_db::model::recipe::{Recipe, RecipeContent};
use cocina_db::model::user::{NewUser, User};
use cocina_db::store::Store;
use cocina_db::store::memory::MemoryStore;

use crate::auth::password::hash_password;
use crate::auth::token::SessionKeys;

pub const PASSWORD: &str = "correct horse";

pub fn keys() -> SessionKeys {
    SessionKeys::new("test-secret", 7)
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        session_ttl_days: 7,
        invite_ttl_days: 7,
        frontend_url: "http://localhost:5173".to_string(),
        bootstrap_admin: None,
    }
}

pub async fn user(store: &MemoryStore, email: &str, role: Role, language: Language) -> User {
    store
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            name: None,
            role,
            language_pref: language,
            invited_by_id: None,
        })
        .await
        .unwrap()
}

pub fn content(title: &str, is_public: bool) -> RecipeContent {
    RecipeContent {
        title_en: title.to_string(),
        title_es: None,
        ingredients_en: vec!["corn".to_string()],
        ingredients_es: None,
        instructions_en: "Cook it".to_string(),
        instructions_es: None,
        prep_time: None,
        cook_time: None,
        servings: None,
        tags: vec![],
        categories: vec![],
        is_public,
    }
}

pub async fn recipe(store: &MemoryStore, author: &User, title: &str, is_public: bool) -> Recipe {
    store
        .create_recipe(author.id, content(title, is_public))
        .await
        .unwrap()
}
