//! Environment configuration.

use std::env;

/// Build mode gating console verbosity and fallback detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    #[must_use]
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub mode: RunMode,
    pub diag_dir: Option<String>,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            mode: run_mode_from_env("VITRINE_ENV"),
            diag_dir: env_string_opt("VITRINE_DIAG_DIR"),
            debug: env_flag("VITRINE_DEBUG"),
        }
    }

    #[must_use]
    pub fn development() -> Self {
        Self {
            mode: RunMode::Development,
            diag_dir: None,
            debug: false,
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            mode: RunMode::Production,
            diag_dir: None,
            debug: false,
        }
    }
}

fn run_mode_from_env(key: &str) -> RunMode {
    match env::var(key) {
        Ok(value) if value.eq_ignore_ascii_case("production") => RunMode::Production,
        _ => RunMode::Development,
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EnvConfig, RunMode};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn defaults_to_development() {
        let _lock = env_lock();
        let _g1 = set_env_guard("VITRINE_ENV", None);
        let _g2 = set_env_guard("VITRINE_DIAG_DIR", None);
        let _g3 = set_env_guard("VITRINE_DEBUG", None);

        let config = EnvConfig::from_env();
        assert_eq!(config.mode, RunMode::Development);
        assert!(config.diag_dir.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn production_env_selects_production_mode() {
        let _lock = env_lock();
        let _g1 = set_env_guard("VITRINE_ENV", Some("production"));
        let config = EnvConfig::from_env();
        assert_eq!(config.mode, RunMode::Production);
        assert!(!config.mode.is_development());
    }

    #[test]
    fn unknown_env_value_stays_development() {
        let _lock = env_lock();
        let _g1 = set_env_guard("VITRINE_ENV", Some("staging"));
        let config = EnvConfig::from_env();
        assert_eq!(config.mode, RunMode::Development);
    }

    #[test]
    fn diag_dir_and_debug_flag_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard("VITRINE_DIAG_DIR", Some("/tmp/vitrine-diag"));
        let _g2 = set_env_guard("VITRINE_DEBUG", Some("1"));

        let config = EnvConfig::from_env();
        assert_eq!(config.diag_dir.as_deref(), Some("/tmp/vitrine-diag"));
        assert!(config.debug);
    }

    #[test]
    fn empty_diag_dir_is_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("VITRINE_DIAG_DIR", Some("   "));
        let config = EnvConfig::from_env();
        assert!(config.diag_dir.is_none());
    }
}
