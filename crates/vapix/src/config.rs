//! Flag-aware configuration: layers `GlobalOpts` over the profile loaded
//! by `vapix-config` and produces a `vapix_core::CameraConfig`.

use std::time::Duration;

use secrecy::SecretString;

use vapix_config::{Config, Defaults, Profile};
use vapix_core::{CameraConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the camera configuration from the config file, the active
/// profile, and CLI overrides.
pub fn build_camera_config(global: &GlobalOpts) -> Result<CameraConfig, CliError> {
    let cfg = vapix_config::load_config()?;
    resolve(global, &cfg)
}

/// Flags (and their `VAPIX_*` env equivalents) win over the profile; the
/// profile wins over `[defaults]`.
///
/// Without a matching profile, `--endpoint` alone is enough.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<CameraConfig, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let profile = match cfg.profile(profile_name) {
        Ok(profile) => Some(profile),
        // An explicitly requested profile must exist.
        Err(err) if global.profile.is_some() => return Err(err.into()),
        Err(_) => None,
    };

    let Some(profile) = profile else {
        let endpoint = global.endpoint.as_deref().ok_or_else(|| CliError::NoConfig {
            path: vapix_config::config_path().display().to_string(),
        })?;
        return from_flags(global, endpoint, profile_name, &cfg.defaults);
    };

    let endpoint = global.endpoint.as_deref().unwrap_or(&profile.endpoint);
    let endpoint = vapix_config::parse_endpoint(endpoint)?;

    let username = match &global.username {
        Some(user) => user.clone(),
        None => vapix_config::resolve_username_with(profile, profile_name, no_env)?,
    };
    let password = match &global.password {
        Some(pw) => SecretString::from(pw.clone()),
        None => vapix_config::resolve_password(profile, profile_name)?,
    };

    let mut config = CameraConfig::new(endpoint, username, password);
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        vapix_config::tls_for(profile, &cfg.defaults)
    };
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );
    config.cache = cfg.defaults.cache_limits();
    Ok(config)
}

fn from_flags(
    global: &GlobalOpts,
    endpoint: &str,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CameraConfig, CliError> {
    let endpoint = vapix_config::parse_endpoint(endpoint)?;

    // Clap has already folded VAPIX_USERNAME / VAPIX_PASSWORD into the
    // flags; the keyring is the only fallback left.
    let adhoc = Profile {
        username: global.username.clone(),
        password: global.password.clone(),
        ..Profile::default()
    };
    let username = vapix_config::resolve_username_with(&adhoc, profile_name, no_env)?;
    let password = vapix_config::resolve_password_with(&adhoc, profile_name, no_env)?;

    let mut config = CameraConfig::new(endpoint, username, password);
    if global.insecure || defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(defaults.timeout));
    config.cache = defaults.cache_limits();
    Ok(config)
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use secrecy::ExposeSecret;

    use crate::cli::OutputFormat;

    use super::*;

    fn global() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            endpoint: None,
            username: None,
            password: None,
            output: OutputFormat::Plain,
            verbose: 0,
            insecure: false,
            timeout: None,
        }
    }

    fn config_with_gate() -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some("gate".into());
        cfg.defaults.timeout = 12;
        cfg.profiles.insert(
            "gate".into(),
            Profile {
                endpoint: "http://10.0.0.5/axis-cgi".into(),
                username: Some("root".into()),
                password: Some("secret".into()),
                timeout: Some(20),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn profile_values_are_used() {
        let config = resolve(&global(), &config_with_gate()).unwrap();

        assert_eq!(config.endpoint.as_str(), "http://10.0.0.5/axis-cgi");
        assert_eq!(config.username, "root");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn flags_override_profile() {
        let mut opts = global();
        opts.endpoint = Some("https://10.0.0.6/axis-cgi".into());
        opts.username = Some("viewer".into());
        opts.password = Some("flag-pw".into());
        opts.insecure = true;
        opts.timeout = Some(3);

        let config = resolve(&opts, &config_with_gate()).unwrap();

        assert_eq!(config.endpoint.as_str(), "https://10.0.0.6/axis-cgi");
        assert_eq!(config.username, "viewer");
        assert_eq!(config.password.expose_secret(), "flag-pw");
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let mut opts = global();
        opts.profile = Some("lobby".into());

        let err = resolve(&opts, &config_with_gate()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "lobby"));
    }

    #[test]
    fn flags_alone_are_enough_without_a_profile() {
        let mut opts = global();
        opts.endpoint = Some("http://cam.local/axis-cgi".into());
        opts.username = Some("root".into());
        opts.password = Some("pw".into());

        let config = resolve(&opts, &Config::default()).unwrap();
        assert_eq!(config.endpoint.host_str(), Some("cam.local"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn no_profile_and_no_endpoint_asks_for_config() {
        let err = resolve(&global(), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
