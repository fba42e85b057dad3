use crate::config::schema::Config;
use crate::error::{Error, Result};

pub fn validate_config(config: &Config) -> Result<()> {
    if config.output.line_separator.is_empty() {
        return Err(Error::Validation(
            "output.line_separator cannot be empty".to_owned(),
        ));
    }

    if let Some(path) = &config.source.path {
        if path.trim().is_empty() {
            return Err(Error::Validation(
                "source.path cannot be blank when set".to_owned(),
            ));
        }
    }

    if let Some(path) = &config.source.hostgroups_path {
        if path.trim().is_empty() {
            return Err(Error::Validation(
                "source.hostgroups_path cannot be blank when set".to_owned(),
            ));
        }
    }

    Ok(())
}
