use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub fn tempo_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tempo"))
}

pub fn ensure_tempo_home() -> Result<PathBuf> {
    let dir = tempo_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where the task store keeps its key files, separate from the profile.
pub fn store_dir() -> Result<PathBuf> {
    Ok(ensure_tempo_home()?.join("store"))
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_tempo_home()?.join("profile.json"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    /// IANA timezone used to resolve "today" for the daily review.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            created_at_utc: None,
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(Profile::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}
