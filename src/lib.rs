#[macro_use]
extern crate diesel;

pub mod config;
pub mod fetch;
pub mod models;
pub mod schema;
pub mod scrape;

use {
    chrono::{DateTime, Utc},
    diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness},
    thiserror::Error,
    uuid::Uuid,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub struct Database {
    conn: diesel::sqlite::SqliteConnection,
}

#[derive(Debug, Error)]
pub enum OpenDatabaseError {
    #[error(transparent)]
    Connection(#[from] diesel::result::ConnectionError),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("running database migrations: {0}")]
    Migration(String),
}

impl Database {
    pub fn open(database_url: &str) -> Result<Database, OpenDatabaseError> {
        use diesel::prelude::*;
        let mut conn = SqliteConnection::establish(database_url)?;

        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;

        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| OpenDatabaseError::Migration(e.to_string()))?;

        Ok(Database { conn })
    }

    pub fn open_in_memory() -> Result<Database, OpenDatabaseError> {
        Self::open(":memory:")
    }
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("user {0} already exists")]
    NameTaken(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl Database {
    pub fn create_user(&mut self, name: &str) -> Result<models::User, CreateUserError> {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let user = models::NewUser { id: &id, created_at: now, updated_at: now, name };

        use diesel::{prelude::*, result::{DatabaseErrorKind, Error}};
        diesel::insert_into(schema::users::table)
            .values(&user)
            .get_result(&mut self.conn)
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
                    => CreateUserError::NameTaken(name.to_owned()),
                e   => e.into(),
            })
    }

    pub fn user_by_name(&mut self, name: &str)
        -> Result<Option<models::User>, diesel::result::Error>
    {
        use {diesel::prelude::*, schema::users::dsl};
        dsl::users.filter(dsl::name.eq(name))
            .first(&mut self.conn)
            .optional()
    }

    pub fn users(&mut self) -> Result<Vec<models::User>, diesel::result::Error> {
        use {diesel::prelude::*, schema::users::dsl};
        dsl::users.order(dsl::name.asc())
            .load(&mut self.conn)
    }

    /// Deletes every user; feeds, follows, and posts go with them through
    /// the cascading foreign keys.
    pub fn delete_all_users(&mut self) -> Result<usize, diesel::result::Error> {
        use diesel::prelude::*;
        diesel::delete(schema::users::table).execute(&mut self.conn)
    }
}

#[derive(Debug, Error)]
pub enum CreateFeedError {
    #[error("a feed with url {0} already exists")]
    UrlTaken(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl Database {
    pub fn create_feed(&mut self, name: &str, url: &str, user_id: &str)
        -> Result<models::Feed, CreateFeedError>
    {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let feed = models::NewFeed { id: &id, created_at: now, updated_at: now, name, url, user_id };

        use diesel::{prelude::*, result::{DatabaseErrorKind, Error}};
        diesel::insert_into(schema::feeds::table)
            .values(&feed)
            .get_result(&mut self.conn)
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
                    => CreateFeedError::UrlTaken(url.to_owned()),
                e   => e.into(),
            })
    }

    pub fn feed_by_url(&mut self, url: &str)
        -> Result<Option<models::Feed>, diesel::result::Error>
    {
        use {diesel::prelude::*, schema::feeds::dsl};
        dsl::feeds.filter(dsl::url.eq(url))
            .first(&mut self.conn)
            .optional()
    }

    pub fn feeds_with_owners(&mut self)
        -> Result<Vec<(models::Feed, String)>, diesel::result::Error>
    {
        use diesel::prelude::*;
        schema::feeds::table
            .inner_join(schema::users::table)
            .order(schema::feeds::created_at.asc())
            .select((schema::feeds::all_columns, schema::users::name))
            .load(&mut self.conn)
    }

    /// The feed whose `last_fetched_at` is oldest. SQLite sorts NULLs first
    /// in ascending order, so never-fetched feeds take priority; ties fall
    /// back to creation order.
    pub fn next_feed_to_fetch(&mut self)
        -> Result<Option<models::Feed>, diesel::result::Error>
    {
        use {diesel::prelude::*, schema::feeds::dsl};
        dsl::feeds
            .order((dsl::last_fetched_at.asc(), dsl::created_at.asc(), dsl::id.asc()))
            .first(&mut self.conn)
            .optional()
    }
}

#[derive(Debug, Error)]
pub enum MarkFeedFetchedError {
    #[error("no feed with id {0}")]
    NoSuchFeed(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl Database {
    pub fn mark_feed_fetched(&mut self, feed_id: &str, when: DateTime<Utc>)
        -> Result<(), MarkFeedFetchedError>
    {
        use {diesel::prelude::*, schema::feeds::dsl};
        let n = diesel::update(dsl::feeds.filter(dsl::id.eq(feed_id)))
            .set((
                dsl::last_fetched_at.eq(Some(when.naive_utc())),
                dsl::updated_at.eq(when.naive_utc()),
            ))
            .execute(&mut self.conn)?;
        if n == 0 {
            return Err(MarkFeedFetchedError::NoSuchFeed(feed_id.to_owned()));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CreateFollowError {
    #[error("already following that feed")]
    AlreadyFollowing,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug, Error)]
pub enum UnfollowError {
    #[error("not following that feed")]
    NotFollowing,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl Database {
    pub fn create_follow(&mut self, user_id: &str, feed_id: &str)
        -> Result<models::FeedFollow, CreateFollowError>
    {
        let now = Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();
        let follow = models::NewFeedFollow { id: &id, created_at: now, updated_at: now, user_id, feed_id };

        use diesel::{prelude::*, result::{DatabaseErrorKind, Error}};
        diesel::insert_into(schema::feed_follows::table)
            .values(&follow)
            .get_result(&mut self.conn)
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
                    => CreateFollowError::AlreadyFollowing,
                e   => e.into(),
            })
    }

    pub fn followed_feed_names(&mut self, user_id: &str)
        -> Result<Vec<String>, diesel::result::Error>
    {
        use diesel::prelude::*;
        schema::feed_follows::table
            .inner_join(schema::feeds::table)
            .filter(schema::feed_follows::user_id.eq(user_id))
            .order(schema::feeds::name.asc())
            .select(schema::feeds::name)
            .load(&mut self.conn)
    }

    pub fn delete_follow(&mut self, user_id: &str, feed_id: &str)
        -> Result<(), UnfollowError>
    {
        use {diesel::prelude::*, schema::feed_follows::dsl};
        let n = diesel::delete(
                dsl::feed_follows
                    .filter(dsl::user_id.eq(user_id))
                    .filter(dsl::feed_id.eq(feed_id)))
            .execute(&mut self.conn)?;
        if n == 0 {
            return Err(UnfollowError::NotFollowing);
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CreatePostError {
    #[error("post already exists")]
    AlreadyExists,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl Database {
    pub fn create_post(&mut self, post: &models::NewPost<'_>)
        -> Result<models::Post, CreatePostError>
    {
        use diesel::{prelude::*, result::{DatabaseErrorKind, Error}};
        diesel::insert_into(schema::posts::table)
            .values(post)
            .get_result(&mut self.conn)
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
                    => CreatePostError::AlreadyExists,
                e   => e.into(),
            })
    }

    pub fn posts_for_feed(&mut self, feed_id: &str)
        -> Result<Vec<models::Post>, diesel::result::Error>
    {
        use {diesel::prelude::*, schema::posts::dsl};
        dsl::posts.filter(dsl::feed_id.eq(feed_id))
            .order(dsl::published_at.desc())
            .load(&mut self.conn)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::models::NewPost,
        chrono::{TimeZone, Utc},
    };

    fn post_for<'a>(feed_id: &'a str, id: &'a str, url: &'a str, title: &'a str) -> NewPost<'a> {
        let now = Utc::now().naive_utc();
        NewPost {
            id,
            created_at: now,
            updated_at: now,
            title,
            url,
            description: Some("a post"),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap().naive_utc(),
            feed_id,
        }
    }

    #[test]
    fn create_user_and_look_up() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        assert_eq!(user.name, "ada");

        let found = db.user_by_name("ada").unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(db.user_by_name("grace").unwrap().is_none());
    }

    #[test]
    fn duplicate_user_name_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();

        db.create_user("ada").unwrap();
        match db.create_user("ada") {
            Err(CreateUserError::NameTaken(name)) => assert_eq!(name, "ada"),
            other => panic!("expected NameTaken, got {:?}", other.map(|u| u.name)),
        }
    }

    #[test]
    fn users_are_listed_by_name() {
        let mut db = Database::open_in_memory().unwrap();

        db.create_user("grace").unwrap();
        db.create_user("ada").unwrap();

        let names: Vec<_> = db.users().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["ada", "grace"]);
    }

    #[test]
    fn delete_all_users_cascades_to_feeds_and_posts() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let feed = db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();
        db.create_follow(&user.id, &feed.id).unwrap();
        db.create_post(&post_for(&feed.id, "p1", "https://example.com/1", "one")).unwrap();

        assert_eq!(db.delete_all_users().unwrap(), 1);

        assert!(db.users().unwrap().is_empty());
        assert!(db.feeds_with_owners().unwrap().is_empty());
        assert!(db.next_feed_to_fetch().unwrap().is_none());
        assert!(db.posts_for_feed(&feed.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_feed_url_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();
        match db.create_feed("mirror", "https://example.com/rss", &user.id) {
            Err(CreateFeedError::UrlTaken(url)) => assert_eq!(url, "https://example.com/rss"),
            other => panic!("expected UrlTaken, got {:?}", other.map(|f| f.name)),
        }
    }

    #[test]
    fn feeds_are_listed_with_owner_names() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();

        let listed = db.feeds_with_owners().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0.name, "blog");
        assert_eq!(listed[0].1, "ada");
    }

    #[test]
    fn never_fetched_feeds_are_selected_before_fetched_ones() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let first = db.create_feed("first", "https://one.example/rss", &user.id).unwrap();
        let second = db.create_feed("second", "https://two.example/rss", &user.id).unwrap();

        db.mark_feed_fetched(&first.id, Utc::now()).unwrap();

        let next = db.next_feed_to_fetch().unwrap().unwrap();
        assert_eq!(next.id, second.id);
    }

    #[test]
    fn oldest_fetched_feed_is_selected_once_all_have_been_fetched() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let first = db.create_feed("first", "https://one.example/rss", &user.id).unwrap();
        let second = db.create_feed("second", "https://two.example/rss", &user.id).unwrap();

        db.mark_feed_fetched(&first.id, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).unwrap();
        db.mark_feed_fetched(&second.id, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()).unwrap();

        let next = db.next_feed_to_fetch().unwrap().unwrap();
        assert_eq!(next.id, first.id);
    }

    #[test]
    fn mark_feed_fetched_sets_the_timestamp() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let feed = db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();
        assert!(feed.last_fetched_at.is_none());

        let when = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        db.mark_feed_fetched(&feed.id, when).unwrap();

        let marked = db.next_feed_to_fetch().unwrap().unwrap();
        assert_eq!(marked.last_fetched_at, Some(when.naive_utc()));
    }

    #[test]
    fn mark_feed_fetched_reports_unknown_feeds() {
        let mut db = Database::open_in_memory().unwrap();

        match db.mark_feed_fetched("nope", Utc::now()) {
            Err(MarkFeedFetchedError::NoSuchFeed(id)) => assert_eq!(id, "nope"),
            other => panic!("expected NoSuchFeed, got {:?}", other),
        }
    }

    #[test]
    fn follow_and_unfollow() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let feed = db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();

        db.create_follow(&user.id, &feed.id).unwrap();
        assert_eq!(db.followed_feed_names(&user.id).unwrap(), ["blog"]);

        match db.create_follow(&user.id, &feed.id) {
            Err(CreateFollowError::AlreadyFollowing) => {}
            other => panic!("expected AlreadyFollowing, got {:?}", other.map(|f| f.id)),
        }

        db.delete_follow(&user.id, &feed.id).unwrap();
        assert!(db.followed_feed_names(&user.id).unwrap().is_empty());

        match db.delete_follow(&user.id, &feed.id) {
            Err(UnfollowError::NotFollowing) => {}
            other => panic!("expected NotFollowing, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_post_url_within_a_feed_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let feed = db.create_feed("blog", "https://example.com/rss", &user.id).unwrap();

        db.create_post(&post_for(&feed.id, "p1", "https://example.com/1", "one")).unwrap();
        match db.create_post(&post_for(&feed.id, "p2", "https://example.com/1", "one again")) {
            Err(CreatePostError::AlreadyExists) => {}
            other => panic!("expected AlreadyExists, got {:?}", other.map(|p| p.id)),
        }

        assert_eq!(db.posts_for_feed(&feed.id).unwrap().len(), 1);
    }

    #[test]
    fn same_post_url_on_two_feeds_is_two_rows() {
        let mut db = Database::open_in_memory().unwrap();

        let user = db.create_user("ada").unwrap();
        let one = db.create_feed("one", "https://one.example/rss", &user.id).unwrap();
        let two = db.create_feed("two", "https://two.example/rss", &user.id).unwrap();

        db.create_post(&post_for(&one.id, "p1", "https://example.com/shared", "shared")).unwrap();
        db.create_post(&post_for(&two.id, "p2", "https://example.com/shared", "shared")).unwrap();

        assert_eq!(db.posts_for_feed(&one.id).unwrap().len(), 1);
        assert_eq!(db.posts_for_feed(&two.id).unwrap().len(), 1);
    }
}
