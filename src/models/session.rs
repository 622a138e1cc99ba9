use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::store::SessionProvider;
use crate::models::config::{Config, write_private};

/// Per-user session state kept beside the config: the credential handed to
/// the record store and the single undo slot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_log_id: Option<String>,
}

impl SessionState {
    pub fn load() -> anyhow::Result<Self> {
        let path = Config::session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        write_private(&Config::session_path(), &contents)
    }

    /// Issue a credential if none exists yet. Returns true when one was created.
    pub fn ensure_credential(&mut self) -> bool {
        if self.credential.as_deref().is_some_and(|c| !c.is_empty()) {
            return false;
        }
        self.credential = Some(Uuid::new_v4().to_string());
        true
    }
}

impl SessionProvider for SessionState {
    fn credential(&self) -> Option<String> {
        self.credential.clone().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_credential_is_idempotent() {
        let mut s = SessionState::default();
        assert!(s.credential().is_none());
        assert!(s.ensure_credential());
        let first = s.credential().unwrap();
        assert!(!s.ensure_credential());
        assert_eq!(s.credential().unwrap(), first);
    }

    #[test]
    fn empty_credential_counts_as_signed_out() {
        let s = SessionState {
            credential: Some(String::new()),
            last_log_id: None,
        };
        assert!(s.credential().is_none());
    }
}
