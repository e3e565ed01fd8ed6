use {
    crate::Anyhow,
    gleaner::{fetch::Fetcher, scrape, Database},
    tokio::time::MissedTickBehavior,
};

pub(crate)
async fn agg(db: &mut Database, interval: &str) -> Anyhow<()> {
    let period = scrape::parse_duration(interval)?;
    let fetcher = Fetcher::new()?;

    eprintln!("Collecting feeds every {interval}; press ctrl-c to stop");

    // The first tick fires immediately; an overrunning pass skips missed
    // ticks rather than queueing them.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match scrape::scrape_once(db, &fetcher).await {
                    Ok(outcome) => {
                        println!("Feed: {}", outcome.channel_title);
                        for post in &outcome.new_posts {
                            println!("  collected {}", post.title);
                        }
                        if outcome.skipped > 0 {
                            tracing::debug!(
                                feed = %outcome.feed.name,
                                skipped = outcome.skipped,
                                "skipped posts collected earlier"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!("collection pass failed: {:#}", anyhow::Error::from(e));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Stopping");
                return Ok(());
            }
        }
    }
}
