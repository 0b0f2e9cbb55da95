use std::collections::BTreeMap;
use std::path::Path;

/// Loads a `.manifold.env` file (shell-style `KEY=value` format).
///
/// Values are available via `${env:VAR}` interpolation in `Manifold.toml`,
/// typically for machine-specific repository paths.
pub fn load_env_file(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content =
        std::fs::read_to_string(path).map_err(manifold_util::errors::ManifoldError::Io)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value)) = trimmed.split_once('=') {
            let value = value.trim().trim_matches('"');
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    Ok(map)
}

/// Interpolate `${env:VAR}` references in a string.
///
/// Looks up values first from `env_overrides` (populated from
/// `.manifold.env`), then from the process environment. Unknown variables
/// expand to the empty string.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${env:") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let key = &rest[start + 6..start + len];
        let value = env_overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
            .unwrap_or_else(|| {
                tracing::debug!("${{env:{key}}} is not set, expanding to an empty string");
                String::new()
            });
        result.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}
