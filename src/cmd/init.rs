use crate::data::AppSettings;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    run_in_dir(&dir)?;
    println!("Config initialized in {}", dir.display());
    Ok(())
}

/// Writes a default config.yaml into `dir`, keeping any settings already there.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    let settings = AppSettings::load_from(dir)?;
    settings.save_to(dir)?;
    info!(dir = %dir.display(), "config written");
    Ok(())
}
