use crate::error::*;

pub fn generate_config() -> Result<(), CliError> {
    let path = threadwatch::config::generate_default_config()?;

    eprintln!("Configuration file: {}", path.display());

    Ok(())
}
