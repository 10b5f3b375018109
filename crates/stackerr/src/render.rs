//! Rendering configuration and the shared rendering surface.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Controls what the verbose and structured renderings expose.
///
/// Traces are always captured; this only decides whether they are shown.
/// The configuration is passed to each render call, so threads rendering
/// with different settings never observe each other's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Include captured stack traces in verbose and structured output.
    pub include_trace: bool,
}

impl RenderConfig {
    /// Environment variable read by [`RenderConfig::from_env`].
    pub const ENV_VAR: &'static str = "STACKERR_TRACE";

    /// Message chain only.
    pub fn minimal() -> Self {
        Self {
            include_trace: false,
        }
    }

    /// Message chain plus stack traces.
    pub fn verbose() -> Self {
        Self {
            include_trace: true,
        }
    }

    pub fn with_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }

    /// Read the configuration from `STACKERR_TRACE`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(Self::ENV_VAR).ok().as_deref())
    }

    /// Interpret a `STACKERR_TRACE` value. `1`, `true`, `yes` and `on`
    /// enable traces; anything else, or no value, disables them.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let include_trace = match value.map(str::trim) {
            None | Some("") => false,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    tracing::debug!("ignoring unrecognized {} value '{}'", Self::ENV_VAR, other);
                    false
                }
            },
        };
        Self { include_trace }
    }
}

/// Which rendering [`Render::render_as`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RenderFormat {
    /// The message chain, `outer. middle. inner`.
    #[default]
    Plain,
    /// The message chain followed by one `func(file:line)` line per frame.
    Verbose,
    /// The structured form as a JSON document.
    Json,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Shared rendering surface of [`Error`](crate::Error),
/// [`BatchError`](crate::BatchError) and [`Cause`](crate::Cause).
///
/// Rendering never fails: missing causes and empty traces produce shorter,
/// still valid output.
pub trait Render {
    /// Write the message chain.
    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Write the message chain, then the trace if `config` asks for it.
    fn write_verbose(&self, f: &mut fmt::Formatter<'_>, config: &RenderConfig) -> fmt::Result;

    /// Build the structured form.
    fn to_json(&self, config: &RenderConfig) -> serde_json::Value;

    /// A display adapter: `{}` is plain, `{:+}` verbose under `config`.
    fn render(&self, config: &RenderConfig) -> Rendered<'_, Self> {
        Rendered {
            value: self,
            config: *config,
        }
    }

    /// A serializable view of the structured form under `config`.
    fn json(&self, config: &RenderConfig) -> Json<'_, Self> {
        Json {
            value: self,
            config: *config,
        }
    }

    fn render_as(&self, format: RenderFormat, config: &RenderConfig) -> String {
        match format {
            RenderFormat::Plain => self.render(config).to_string(),
            RenderFormat::Verbose => format!("{:+}", self.render(config)),
            RenderFormat::Json => self.to_json(config).to_string(),
        }
    }
}

/// Display adapter returned by [`Render::render`].
pub struct Rendered<'a, T: ?Sized> {
    value: &'a T,
    config: RenderConfig,
}

impl<T: Render + ?Sized> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.sign_plus() {
            self.value.write_verbose(f, &self.config)
        } else {
            self.value.write_plain(f)
        }
    }
}

/// Serializable view returned by [`Render::json`].
pub struct Json<'a, T: ?Sized> {
    value: &'a T,
    config: RenderConfig,
}

impl<T: Render + ?Sized> Serialize for Json<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.to_json(&self.config).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::str::FromStr;

    #[test]
    fn test_default_hides_trace() {
        assert!(!RenderConfig::default().include_trace);
        assert_eq!(RenderConfig::default(), RenderConfig::minimal());
        assert!(RenderConfig::minimal().with_trace(true).include_trace);
    }

    #[test]
    fn test_env_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(RenderConfig::from_env_value(Some(value)).include_trace, "{value}");
        }
        for value in ["", "0", "false", "off", "maybe"] {
            assert!(!RenderConfig::from_env_value(Some(value)).include_trace, "{value}");
        }
        assert!(!RenderConfig::from_env_value(None).include_trace);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe { std::env::set_var(RenderConfig::ENV_VAR, "true") };
        assert!(RenderConfig::from_env().include_trace);

        unsafe { std::env::remove_var(RenderConfig::ENV_VAR) };
        assert!(!RenderConfig::from_env().include_trace);
    }

    #[test]
    fn test_config_deserialize() {
        let config: RenderConfig = serde_json::from_str(r#"{"include_trace":true}"#).unwrap();
        assert!(config.include_trace);

        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.include_trace);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(RenderFormat::Verbose.to_string(), "verbose");
        assert_eq!(RenderFormat::Json.as_str(), "json");
        assert_eq!(RenderFormat::from_str("JSON").unwrap(), RenderFormat::Json);
        assert!(RenderFormat::from_str("xml").is_err());
    }
}
