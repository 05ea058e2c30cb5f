use anyhow::Context;
use std::env;
use std::path::PathBuf;

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = env::var_os("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home))
}

/// `$NETMCP_HOME/config`, else `$XDG_CONFIG_HOME/netmcp`, else
/// `~/.config/netmcp`. Never created; the config file is optional.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Some(base) = env::var_os("NETMCP_HOME").map(PathBuf::from) {
        return Ok(base.join("config"));
    }

    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Ok(xdg.join("netmcp"));
    }

    Ok(home_dir()?.join(".config").join("netmcp"))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
