//! Layered policy configuration loading. An optional file provides the
//! base document; `W3RT_POLICY__...`
//! environment variables override individual fields on top of it. Passing
//! no file and no overrides yields the all-permissive default
//! [`w3rt_policy::PolicyConfig`].

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Yaml};
use w3rt_policy::PolicyConfig;

pub fn load_policy(path: Option<&Path>) -> Result<PolicyConfig> {
    let mut figment = Figment::from(Serialized::defaults(PolicyConfig::default()));

    if let Some(path) = path {
        figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Json::file(path)),
        };
    }

    figment
        .merge(Env::prefixed("W3RT_POLICY__").split("__"))
        .extract()
        .context("loading policy configuration")
}
