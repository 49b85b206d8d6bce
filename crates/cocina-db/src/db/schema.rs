// Column layout mirrors migrations/; regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    users (id) {
        id -> Int4,
        email -> Text,
        password_hash -> Text,
        name -> Nullable<Text>,
        role -> Text,
        language_pref -> Text,
        is_active -> Bool,
        invite_token -> Nullable<Text>,
        invite_expires_at -> Nullable<Timestamptz>,
        invited_by_id -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int4,
        author_id -> Int4,
        title_en -> Text,
        title_es -> Nullable<Text>,
        ingredients_en -> Array<Text>,
        ingredients_es -> Nullable<Array<Text>>,
        instructions_en -> Text,
        instructions_es -> Nullable<Text>,
        prep_time -> Nullable<Int4>,
        cook_time -> Nullable<Int4>,
        servings -> Nullable<Int4>,
        tags -> Array<Text>,
        categories -> Array<Text>,
        is_public -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        recipe_id -> Int4,
        author_id -> Int4,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    favorites (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    media (id) {
        id -> Int4,
        recipe_id -> Int4,
        url -> Text,
        media_type -> Text,
        public_id -> Nullable<Text>,
        alt_text -> Nullable<Text>,
        position -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(comments -> recipes (recipe_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(media -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(users, recipes, comments, favorites, media);
