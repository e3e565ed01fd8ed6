use {
    clap::{Parser, Subcommand},
    std::path::PathBuf,
    url::Url,
};

#[derive(Parser)]
#[command(about, version)]
pub struct Options {
    /// Path to the config file (defaults to ~/.gleaner.json)
    #[arg(long, env = "GLEANER_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Options {
    pub fn load() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and log in as it
    Register {
        /// A name for the account
        name: String,
    },

    /// Log in as an existing user
    Login {
        /// The user to log in as
        name: String,
    },

    /// Delete every user, along with all feeds and posts
    Reset,

    /// List users
    Users,

    /// Collect posts from followed feeds, forever
    Agg {
        /// How long to wait between collection passes, e.g. "1m" or "30s"
        interval: String,
    },

    /// Add a feed and follow it
    Addfeed {
        /// A name for the feed
        name: String,

        /// The feed's RSS link
        url: Url,
    },

    /// List feeds
    Feeds,

    /// Follow a feed someone has already added
    Follow {
        /// The feed's RSS link
        url: Url,
    },

    /// List the feeds you follow
    Following,

    /// Stop following a feed
    Unfollow {
        /// The feed's RSS link
        url: Url,
    },
}
