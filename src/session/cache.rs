use std::fs;
use std::path::PathBuf;

use super::error::SessionError;
use super::Session;

pub fn get_config_dir() -> Result<PathBuf, SessionError> {
    let config_dir = if let Ok(custom_dir) = std::env::var("GOALTRACK_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| SessionError::NoHome)?;
        PathBuf::from(home).join(".config").join("goaltrack").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// The persisted current session. A missing, unreadable, or expired cache
/// file all read back as "signed out" - the next sign-in overwrites it.
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn open_default() -> Result<Self, SessionError> {
        Ok(Self {
            path: get_config_dir()?.join("session.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("discarding unreadable session cache: {}", e);
                return Ok(None);
            }
        };

        if session.is_expired() {
            tracing::debug!("cached session has expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn session(expires_in_secs: i64) -> Session {
        Session {
            access_token: "tok".to_string(),
            refresh_token: None,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            user: Identity {
                id: Uuid::new_v4(),
                email: "u@example.com".to_string(),
            },
        }
    }

    #[test]
    fn missing_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::at(dir.path().join("session.json"));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::at(dir.path().join("session.json"));

        let saved = session(3600);
        cache.save(&saved).unwrap();

        let loaded = cache.load().unwrap().expect("session should load");
        assert_eq!(loaded.access_token, saved.access_token);
        assert_eq!(loaded.user, saved.user);
    }

    #[test]
    fn expired_session_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::at(dir.path().join("session.json"));

        cache.save(&session(-60)).unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn garbage_cache_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not a session").unwrap();

        let cache = SessionCache::at(path);
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::at(dir.path().join("session.json"));

        cache.save(&session(3600)).unwrap();
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());

        // Clearing an already-clear cache is fine
        cache.clear().unwrap();
    }
}
