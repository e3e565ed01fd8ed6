use {
    crate::Anyhow,
    anyhow::anyhow,
    gleaner::{models::User, Database},
    url::Url,
};

pub(crate)
async fn unfollow(db: &mut Database, user: &User, url: &Url) -> Anyhow<()> {
    let feed = db.feed_by_url(url.as_str())?
        .ok_or_else(|| anyhow!("no feed with url {url}"))?;
    db.delete_follow(&user.id, &feed.id)?;
    eprintln!("{} no longer follows {}", user.name, feed.name);
    Ok(())
}
