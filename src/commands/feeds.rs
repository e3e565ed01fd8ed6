use {
    crate::Anyhow,
    gleaner::Database,
};

pub(crate)
async fn feeds(db: &mut Database) -> Anyhow<()> {
    let results = db.feeds_with_owners()?;
    if results.is_empty() {
        eprintln!("No feeds. You can add one with `gleaner addfeed`.");
    }
    else {
        for (feed, owner) in results {
            println!("{:24} {:16} {}", feed.name, owner, feed.url);
        }
    }

    Ok(())
}
