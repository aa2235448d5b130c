//! Document loading: sniff `.yml`/`.yaml` vs everything else (JSON) by
//! file extension.

use std::path::Path;

use anyhow::{Context, Result};

pub fn load_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yml" | "yaml") => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {} as YAML", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("parsing {} as JSON", path.display())),
    }
}
