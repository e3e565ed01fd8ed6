use {
    crate::Anyhow,
    anyhow::anyhow,
    gleaner::{config::Config, Database},
    std::path::Path,
};

pub(crate)
async fn login(db: &mut Database, config: &mut Config, config_path: &Path, name: &str)
    -> Anyhow<()>
{
    let user = db.user_by_name(name)?
        .ok_or_else(|| anyhow!("user {name} does not exist"))?;
    config.set_user(&user.name, config_path)?;
    eprintln!("Logged in as {}", user.name);
    Ok(())
}
