use {
    crate::Anyhow,
    gleaner::{config::Config, Database},
};

pub(crate)
async fn users(db: &mut Database, config: &Config) -> Anyhow<()> {
    let users = db.users()?;
    if users.is_empty() {
        eprintln!("No users. You can create one with `gleaner register`.");
        return Ok(());
    }

    for user in users {
        if Some(user.name.as_str()) == config.current_user_name.as_deref() {
            println!("* {} (current)", user.name);
        }
        else {
            println!("* {}", user.name);
        }
    }

    Ok(())
}
