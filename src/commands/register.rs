use {
    crate::Anyhow,
    gleaner::{config::Config, Database},
    std::path::Path,
};

pub(crate)
async fn register(db: &mut Database, config: &mut Config, config_path: &Path, name: &str)
    -> Anyhow<()>
{
    let user = db.create_user(name)?;
    config.set_user(&user.name, config_path)?;
    eprintln!("Registered {} and logged in", user.name);
    Ok(())
}
