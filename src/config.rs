// Config store: a single file whose content is the PocketBase collection
// URL. There is no schema; the file is written verbatim and read back
// trimmed.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{CmdimError, Result};

/// File name of the config file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".cmdim";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CMDIM_CONFIG";

/// Handle on the config file. Holds only the path; every call hits disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at `<home>/.cmdim`, falling back to the current directory when
    /// no home directory is known.
    pub fn from_home() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(dir.join(CONFIG_FILE_NAME))
    }

    /// Store at an explicit path (used for `--config` / `CMDIM_CONFIG`).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `url` verbatim, mode 0600 on Unix.
    pub fn set(&self, url: &str) -> Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(url.as_bytes())?;
        log::debug!(path:? = self.path; "config written");
        Ok(())
    }

    /// Read the stored URL, trimmed. Fails with `NotConfigured` when the
    /// file does not exist.
    pub fn get(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(data.trim().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CmdimError::NotConfigured {
                path: self.path.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`ConfigStore::get`] but also rejects an empty URL.
    pub fn instance_url(&self) -> Result<String> {
        let url = self.get()?;
        if url.is_empty() {
            return Err(CmdimError::NotConfigured {
                path: self.path.clone(),
            });
        }
        Ok(url)
    }
}
