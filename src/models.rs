use {
    crate::schema::*,
    chrono::NaiveDateTime,
};

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id:         String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name:       String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id:         &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name:       &'a str,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feeds)]
pub struct Feed {
    pub id:              String,
    pub created_at:      NaiveDateTime,
    pub updated_at:      NaiveDateTime,
    pub name:            String,
    pub url:             String,
    pub user_id:         String,
    pub last_fetched_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = feeds)]
pub struct NewFeed<'a> {
    pub id:         &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub name:       &'a str,
    pub url:        &'a str,
    pub user_id:    &'a str,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feed_follows)]
pub struct FeedFollow {
    pub id:         String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id:    String,
    pub feed_id:    String,
}

#[derive(Insertable)]
#[diesel(table_name = feed_follows)]
pub struct NewFeedFollow<'a> {
    pub id:         &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id:    &'a str,
    pub feed_id:    &'a str,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id:           String,
    pub created_at:   NaiveDateTime,
    pub updated_at:   NaiveDateTime,
    pub title:        String,
    pub url:          String,
    pub description:  Option<String>,
    pub published_at: NaiveDateTime,
    pub feed_id:      String,
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    pub id:           &'a str,
    pub created_at:   NaiveDateTime,
    pub updated_at:   NaiveDateTime,
    pub title:        &'a str,
    pub url:          &'a str,
    pub description:  Option<&'a str>,
    pub published_at: NaiveDateTime,
    pub feed_id:      &'a str,
}
