use {
    crate::Anyhow,
    gleaner::Database,
};

pub(crate)
async fn reset(db: &mut Database) -> Anyhow<()> {
    let n = db.delete_all_users()?;
    eprintln!("Deleted {} user(s) and everything they owned", n);
    Ok(())
}
