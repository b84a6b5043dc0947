//! Utility functions for configuration and environment handling.

use std::env;

/// Error type for environment variable parsing.
pub type EnvError = Box<dyn std::error::Error + Send + Sync>;

/// Read an environment variable, returning `None` when it is unset.
fn env_var(name: &str) -> Result<Option<String>, EnvError> {
    match env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{name}: {e}").into()),
    }
}

/// Parse an environment variable as an optional boolean.
///
/// Valid values (case-insensitive): "true", "1", "false", "0".
/// Returns an error for any other value to prevent misconfiguration.
///
/// # Errors
///
/// Returns an error if the environment variable is set to an invalid value,
/// or if the value contains invalid Unicode.
pub fn env_opt_bool(name: &str) -> Result<Option<bool>, EnvError> {
    let Some(value) = env_var(name)? else {
        return Ok(None);
    };

    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(format!(
            "{name}: invalid value '{value}' (expected 'true', 'false', '1', or '0')"
        )
        .into()),
    }
}

/// Parse an environment variable as a u32, with a default value.
///
/// # Errors
///
/// Returns an error if the environment variable is set to an invalid value,
/// or if the value contains invalid Unicode.
pub fn env_u32(name: &str, default: u32) -> Result<u32, EnvError> {
    match env_var(name)? {
        Some(value) => value.parse().map_err(|e| format!("{name}: {e}").into()),
        None => Ok(default),
    }
}

/// Read an environment variable as a string, with a default value.
///
/// # Errors
///
/// Returns an error if the value contains invalid Unicode.
pub fn env_string(name: &str, default: &str) -> Result<String, EnvError> {
    Ok(env_var(name)?.unwrap_or_else(|| default.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_var<F, R>(name: &str, value: Option<&str>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap();

        let original = env::var(name).ok();

        // SAFETY: We hold ENV_MUTEX to ensure single-threaded access to env vars in tests
        unsafe {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }

        let result = f();

        // SAFETY: We hold ENV_MUTEX to ensure single-threaded access to env vars in tests
        unsafe {
            match original {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }

        result
    }

    #[test]
    fn test_env_opt_bool_values() {
        let cases = [
            ("true", true),
            ("TRUE", true),
            ("1", true),
            ("False", false),
            ("0", false),
        ];

        for (raw, expected) in cases {
            with_env_var("TEST_OPT_BOOL", Some(raw), || {
                assert_eq!(env_opt_bool("TEST_OPT_BOOL").unwrap(), Some(expected));
            });
        }
    }

    #[test]
    fn test_env_opt_bool_unset() {
        with_env_var("TEST_OPT_BOOL_UNSET", None, || {
            assert_eq!(env_opt_bool("TEST_OPT_BOOL_UNSET").unwrap(), None);
        });
    }

    #[test]
    fn test_env_opt_bool_invalid_value() {
        with_env_var("TEST_OPT_BOOL", Some("yes"), || {
            let err = env_opt_bool("TEST_OPT_BOOL").unwrap_err();
            assert!(err.to_string().contains("invalid value 'yes'"));
            assert!(err.to_string().contains("TEST_OPT_BOOL"));
        });
    }

    #[test]
    fn test_env_u32() {
        with_env_var("TEST_U32", Some("64"), || {
            assert_eq!(env_u32("TEST_U32", 20).unwrap(), 64);
        });

        with_env_var("TEST_U32", None, || {
            assert_eq!(env_u32("TEST_U32", 20).unwrap(), 20);
        });

        with_env_var("TEST_U32", Some("-3"), || {
            let err = env_u32("TEST_U32", 20).unwrap_err();
            assert!(err.to_string().starts_with("TEST_U32: "));
        });
    }

    #[test]
    fn test_env_string() {
        with_env_var("TEST_STRING", Some("Back soon"), || {
            assert_eq!(env_string("TEST_STRING", "default").unwrap(), "Back soon");
        });

        with_env_var("TEST_STRING", None, || {
            assert_eq!(env_string("TEST_STRING", "default").unwrap(), "default");
        });
    }
}
