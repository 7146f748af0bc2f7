//! Config show/get/set/validate/init command.

use crate::ui::{self, prompts};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use notifi_core::config::{NotifiEnvironment, WalletIdentity};
use notifi_core::{NotifiConfig, WalletBlockchain};

/// Config subcommand.
#[derive(Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print one value by dotted path.
    Get {
        /// Dotted key, e.g. `http.timeoutSecs`.
        key: String,
    },
    /// Set one value by dotted path.
    Set {
        /// Dotted key.
        key: String,
        /// New value, parsed as JSON when possible.
        value: String,
    },
    /// Check the configuration file.
    Validate,
    /// Create the configuration interactively.
    Init,
}

/// Run the config command.
pub async fn run_config(action: ConfigAction) -> Result<()> {
    let path = NotifiConfig::default_path();
    match action {
        ConfigAction::Show => show_config(),
        ConfigAction::Get { key } => get_config_value(&key),
        ConfigAction::Set { key, value } => set_config_value(&path, &key, &value),
        ConfigAction::Validate => validate_config(&path),
        ConfigAction::Init => init_config(&path),
    }
}

fn show_config() -> Result<()> {
    let config = NotifiConfig::load_default()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn get_config_value(key: &str) -> Result<()> {
    let value = serde_json::to_value(NotifiConfig::load_default()?)?;
    let Some(current) = lookup(&value, key) else {
        ui::error(&format!("Key not found: {key}"));
        return Ok(());
    };

    match current {
        Value::String(s) => println!("{s}"),
        Value::Null => println!("null"),
        Value::Object(_) | Value::Array(_) => println!("{}", serde_json::to_string_pretty(current)?),
        other => println!("{other}"),
    }
    Ok(())
}

fn set_config_value(path: &Path, key: &str, raw: &str) -> Result<()> {
    let mut value: Value = if path.exists() {
        json5::from_str(&std::fs::read_to_string(path)?)?
    } else {
        Value::Object(Map::new())
    };

    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        anyhow::bail!("Invalid key: {key}");
    }
    set_nested_value(&mut value, &parts, parse_value(raw));

    // Reject values that would leave an unloadable file behind.
    let config: NotifiConfig =
        serde_json::from_value(value).with_context(|| format!("Invalid value for {key}"))?;
    config.validate()?;
    config.save(path)?;

    ui::success(&format!("Set {key} = {raw}"));
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    ui::header("Validating Configuration");

    if !path.exists() {
        ui::error(&format!("Config file not found: {}", path.display()));
        ui::info("Run 'notifi config init' to create one");
        return Ok(());
    }

    match NotifiConfig::load(path) {
        Ok(config) => {
            ui::success("Configuration is valid");
            if config.wallet.is_none() {
                ui::warning("No wallet configured; only tenant commands are available");
            }
        }
        Err(e) => ui::error(&e.to_string()),
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    ui::header("Notifi Setup");

    if path.exists() && !prompts::confirm("A configuration already exists. Overwrite it?")? {
        ui::info("Init cancelled");
        return Ok(());
    }

    let environments = [
        NotifiEnvironment::Production,
        NotifiEnvironment::Staging,
        NotifiEnvironment::Development,
        NotifiEnvironment::Local,
    ];
    let env = prompts::choose("Environment", &environments)?;
    let tenant_id = prompts::input("Tenant ID")?;

    let wallet_blockchain = prompts::choose("Wallet blockchain", &WalletBlockchain::WALLETS)?;
    let public_key = prompts::input("Wallet public key")?;
    let wallet = if wallet_blockchain.requires_account_address() {
        WalletIdentity::PublicKeyAndAddress {
            wallet_blockchain,
            authentication_key: public_key,
            account_address: prompts::input("Account address")?,
        }
    } else {
        WalletIdentity::PublicKey {
            wallet_blockchain,
            wallet_public_key: public_key,
        }
    };

    let config = NotifiConfig {
        env,
        tenant_id,
        wallet: Some(wallet),
        ..NotifiConfig::default()
    };
    config.validate()?;
    config.save(path)?;

    ui::success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

/// Value at a dotted path; array segments are indices.
fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |current, part| match current {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// JSON when it parses, otherwise a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Set a value, creating intermediate objects and replacing non-objects.
fn set_nested_value(root: &mut Value, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *root = value;
        return;
    };
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    if let Value::Object(map) = root {
        let child = map.entry((*first).to_string()).or_insert(Value::Null);
        set_nested_value(child, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_and_indexed() {
        let value = json!({ "http": { "timeoutSecs": 30 }, "list": ["a", "b"] });
        assert_eq!(lookup(&value, "http.timeoutSecs"), Some(&json!(30)));
        assert_eq!(lookup(&value, "list.1"), Some(&json!("b")));
        assert_eq!(lookup(&value, "http.missing"), None);
    }

    #[test]
    fn test_set_nested_creates_parents() {
        let mut value = json!({ "env": "Production", "http": 5 });
        set_nested_value(&mut value, &["http", "timeoutSecs"], parse_value("10"));
        set_nested_value(&mut value, &["tenantId"], parse_value("acme"));

        assert_eq!(
            value,
            json!({ "env": "Production", "http": { "timeoutSecs": 10 }, "tenantId": "acme" })
        );
    }

    #[test]
    fn test_set_value_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifi.json");

        assert!(set_config_value(&path, "http.timeoutSecs", "0").is_err());
        assert!(!path.exists());

        set_config_value(&path, "env", "\"Staging\"").unwrap();
        let saved = NotifiConfig::load(&path).unwrap();
        assert_eq!(saved.env, NotifiEnvironment::Staging);
    }
}
