use {
    crate::Anyhow,
    gleaner::{models::User, Database},
};

pub(crate)
async fn following(db: &mut Database, user: &User) -> Anyhow<()> {
    let names = db.followed_feed_names(&user.id)?;
    if names.is_empty() {
        eprintln!("Not following any feeds. You can follow one with `gleaner follow`.");
    }
    else {
        for name in names {
            println!("{}", name);
        }
    }

    Ok(())
}
