//! Loading of case configuration files.
//!
//! A YAML file is optional: without one the built-in defaults are used.
//! File contents support `${VAR}` and `${VAR:-default}` substitution, and
//! `CASE_*` environment variables override the result.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::CaseConfig;

/// Load, override and validate the configuration.
pub fn load_case_config(path: Option<&Path>) -> Result<CaseConfig> {
    let mut config = match path {
        Some(path) => parse_case_config(path)?,
        None => CaseConfig::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Parse a YAML configuration file with environment variable substitution.
pub fn parse_case_config(path: &Path) -> Result<CaseConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read case config from {:?}", path))?;

    let expanded = expand_env_vars(&content)?;

    serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse case config from {:?}", path))
}

/// Expand `${VAR}` and `${VAR:-default}` in YAML content.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next();

        let mut var_expr = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => var_expr.push(c),
                None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
            }
        }
        result.push_str(&resolve_var_expr(&var_expr)?);
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr)),
    }
}
