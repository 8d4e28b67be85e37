//! Loader for workspace configuration with file + environment overlays.
//!
//! Produces [`quarry_common::QuarryConfig`] directly, so there is exactly
//! one configuration model in the workspace. Sources are merged in order:
//! optional config file, then `QUARRY`-prefixed environment variables
//! (`__` separates nesting, e.g. `QUARRY_BROWSER__HEADLESS=false`), and
//! `${VAR}` placeholders inside string values are expanded afterwards.
use config::{Config, ConfigError, Environment, File};
use quarry_common::QuarryConfig;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct QuarryConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for QuarryConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuarryConfigLoader {
    /// Start with the defaults: `QUARRY_` env overrides only. With no other
    /// sources, [`load`](Self::load) yields `QuarryConfig::default()`.
    ///
    /// ```
    /// use quarry_config::QuarryConfigLoader;
    ///
    /// let config = QuarryConfigLoader::new()
    ///     .with_yaml_str("browser:\n  headless: false")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert!(!config.browser.headless);
    /// assert_eq!(config.docs.library, "polars");
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("QUARRY").separator("__"));
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    /// Missing files are tolerated so deployments can rely purely on
    /// environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into the
    /// strongly typed workspace configuration.
    ///
    /// ```
    /// use quarry_config::QuarryConfigLoader;
    ///
    /// unsafe { std::env::set_var("QUARRY_TEST_DRIVER", "http://driver:4444"); }
    ///
    /// let config = QuarryConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   webdriver_url: "${QUARRY_TEST_DRIVER}"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.browser.webdriver_url, "http://driver:4444");
    ///
    /// unsafe { std::env::remove_var("QUARRY_TEST_DRIVER"); }
    /// ```
    pub fn load(self) -> Result<QuarryConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Merge to a JSON tree first so `${VAR}` expansion can walk every
        // string, then materialise the typed config.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use temp_env;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!([
                "hello-$CITY",
                { "loc": "${CITY}-${STATE}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                // BAR references BAZ; FOO references BAR, so two hops.
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles_and_leaves_value_reasonable() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            // Only termination matters here; the depth cap guarantees it.
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }
}
