use std::fmt;
use std::str::FromStr;

use crate::store::{KeyValueStore, StoreResult};

pub const THEME_KEY: &str = "gwaTheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme `{other}` (expected light or dark)")),
        }
    }
}

/// Stored preference, or light when nothing usable is stored. Read errors
/// are returned.
pub async fn try_load<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<Theme> {
    let raw = store.get(THEME_KEY).await?;
    Ok(raw.and_then(|raw| raw.parse().ok()).unwrap_or_default())
}

/// Like [`try_load`], but a failed read also falls back to light.
pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
    match try_load(store).await {
        Ok(theme) => theme,
        Err(err) => {
            tracing::warn!(error = %err, "could not read theme preference");
            Theme::default()
        }
    }
}

pub async fn save<S: KeyValueStore + ?Sized>(store: &S, theme: Theme) -> StoreResult<()> {
    store.set(THEME_KEY, theme.as_str()).await
}

pub async fn toggle<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<Theme> {
    let next = try_load(store).await?.toggled();
    save(store, next).await?;
    Ok(next)
}
