diesel::table! {
    users (id) {
        id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        name -> Text,
    }
}

diesel::table! {
    feeds (id) {
        id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        name -> Text,
        url -> Text,
        user_id -> Text,
        last_fetched_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    feed_follows (id) {
        id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Text,
        feed_id -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        title -> Text,
        url -> Text,
        description -> Nullable<Text>,
        published_at -> Timestamp,
        feed_id -> Text,
    }
}

diesel::joinable!(feeds -> users (user_id));
diesel::joinable!(feed_follows -> users (user_id));
diesel::joinable!(feed_follows -> feeds (feed_id));
diesel::joinable!(posts -> feeds (feed_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    feeds,
    feed_follows,
    posts,
);
