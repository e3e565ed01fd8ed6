mod commands;
mod options;

use {
    crate::options::{Command, Options},
    anyhow::anyhow,
    gleaner::{config::Config, models, Database},
};

pub(crate) use anyhow::Result as Anyhow;

/// Resolves the logged-in user once so that handlers which need one get it
/// handed to them instead of each re-reading the config.
fn require_user(db: &mut Database, config: &Config) -> Anyhow<models::User> {
    let name = config
        .current_user_name
        .as_deref()
        .ok_or_else(|| anyhow!("not logged in; run `gleaner login <name>` first"))?;
    db.user_by_name(name)?
        .ok_or_else(|| anyhow!("user {name} does not exist"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Anyhow<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::load();

    let config_path = match &opts.config_path {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;
    let mut db = Database::open(&config.db_url)?;

    match &opts.command {
        Command::Register { name } => commands::register(&mut db, &mut config, &config_path, name).await?,
        Command::Login { name } => commands::login(&mut db, &mut config, &config_path, name).await?,
        Command::Reset => commands::reset(&mut db).await?,
        Command::Users => commands::users(&mut db, &config).await?,
        Command::Agg { interval } => commands::agg(&mut db, interval).await?,
        Command::Addfeed { name, url } => {
            let user = require_user(&mut db, &config)?;
            commands::addfeed(&mut db, &user, name, url).await?
        }
        Command::Feeds => commands::feeds(&mut db).await?,
        Command::Follow { url } => {
            let user = require_user(&mut db, &config)?;
            commands::follow(&mut db, &user, url).await?
        }
        Command::Following => {
            let user = require_user(&mut db, &config)?;
            commands::following(&mut db, &user).await?
        }
        Command::Unfollow { url } => {
            let user = require_user(&mut db, &config)?;
            commands::unfollow(&mut db, &user, url).await?
        }
    }

    Ok(())
}
