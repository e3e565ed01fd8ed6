use {
    crate::Anyhow,
    gleaner::{models::User, Database},
    url::Url,
};

pub(crate)
async fn addfeed(db: &mut Database, user: &User, name: &str, url: &Url) -> Anyhow<()> {
    let feed = db.create_feed(name, url.as_str(), &user.id)?;
    db.create_follow(&user.id, &feed.id)?;
    eprintln!("Added {} ({}); {} now follows it", feed.name, feed.url, user.name);
    Ok(())
}
