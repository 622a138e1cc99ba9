use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: Reminders,
    #[serde(default)]
    pub calendar: Calendar,
    #[serde(default)]
    pub upcoming: Upcoming,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Reminders {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Reminders {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Calendar {
    /// Minimum spacing between two calendar recomputes for different inputs.
    #[serde(default = "default_cooldown_ms")]
    pub recompute_cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    250
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            recompute_cooldown_ms: default_cooldown_ms(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Upcoming {
    #[serde(default = "default_upcoming_limit")]
    pub limit: usize,
}

fn default_upcoming_limit() -> usize {
    crate::core::next_dose::UPCOMING_LIMIT
}

impl Default for Upcoming {
    fn default() -> Self {
        Self {
            limit: default_upcoming_limit(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        write_private(&Self::path(), &contents)
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("DOSELINE_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".doseline")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    pub fn session_path() -> PathBuf {
        Self::data_dir().join("session.toml")
    }
}

/// Write `contents` to `path`, readable only by the owner.
pub(crate) fn write_private(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
        }
    }

    #[cfg(unix)]
    {
        use std::fs::{self, OpenOptions};
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true).mode(0o600);
        let mut file = options.open(path)?;

        file.write_all(contents.as_bytes())?;

        // Existing files keep their old mode on open; tighten it after the write.
        let mut perms = file.metadata()?.permissions();
        if perms.mode() & 0o777 != 0o600 {
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }
    }
    #[cfg(not(unix))]
    {
        std::fs::write(path, contents)?;
    }

    Ok(())
}
