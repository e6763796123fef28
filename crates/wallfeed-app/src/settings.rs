//! Theme preference and its persistence.
//!
//! The dark-mode flag is read once when [`ThemeService`] starts and written
//! back only when it changes. Storage is behind [`SettingsStore`] so tests and
//! the CLI pick their own backing.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SettingsError;

/// Persistent key-value settings.
pub trait SettingsStore: Send + Sync {
    /// Saved dark-mode flag, or `None` if nothing was saved.
    fn load_dark_mode(&self) -> Result<Option<bool>, SettingsError>;

    /// Persist the dark-mode flag.
    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn load_dark_mode(&self) -> Result<Option<bool>, SettingsError> {
        (**self).load_dark_mode()
    }

    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError> {
        (**self).save_dark_mode(dark)
    }
}

/// In-memory settings.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    dark_mode: Option<bool>,
    writes: usize,
}

impl MemorySettings {
    /// Empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with `dark` already saved.
    pub fn with_dark_mode(dark: bool) -> Self {
        Self { inner: Mutex::new(MemoryInner { dark_mode: Some(dark), writes: 0 }) }
    }

    /// Number of `save_dark_mode` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).writes
    }
}

impl SettingsStore for MemorySettings {
    fn load_dark_mode(&self) -> Result<Option<bool>, SettingsError> {
        Ok(self.inner.lock().unwrap_or_else(PoisonError::into_inner).dark_mode)
    }

    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.dark_mode = Some(dark);
        inner.writes += 1;
        Ok(())
    }
}

/// On-disk settings document. Unknown keys survive a rewrite.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Settings kept in a JSON object on disk.
///
/// Keys other than `dark_mode` are preserved on write. A missing file reads
/// as "nothing saved".
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    /// Settings backed by the file at `path`. The file is created on first
    /// write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<SettingsDocument, SettingsError> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SettingsDocument::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileSettings {
    fn load_dark_mode(&self) -> Result<Option<bool>, SettingsError> {
        Ok(self.read_document()?.dark_mode)
    }

    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError> {
        // An unreadable document is replaced rather than blocking the write.
        let mut document = self.read_document().unwrap_or_default();
        document.dark_mode = Some(dark);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&document)?)?;
        Ok(())
    }
}

/// Rendered color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
}

impl Theme {
    /// Theme for a dark-mode flag.
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

/// Dark-mode preference.
#[derive(Debug)]
pub struct ThemeService<S> {
    store: S,
    dark: bool,
}

impl<S: SettingsStore> ThemeService<S> {
    /// Load the saved preference, falling back to `system_prefers_dark` when
    /// nothing is saved or the store cannot be read.
    pub fn init(store: S, system_prefers_dark: bool) -> Self {
        let dark = match store.load_dark_mode() {
            Ok(Some(saved)) => saved,
            Ok(None) => system_prefers_dark,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read theme preference, using system default");
                system_prefers_dark
            },
        };

        tracing::debug!(dark, "theme initialized");
        Self { store, dark }
    }

    /// Current flag.
    pub fn is_dark_mode(&self) -> bool {
        self.dark
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(self.dark)
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Set the flag, persisting only if it changed.
    ///
    /// Returns whether the value changed. On a write failure the in-memory
    /// value is left unchanged.
    pub fn set_dark_mode(&mut self, dark: bool) -> Result<bool, SettingsError> {
        if dark == self.dark {
            return Ok(false);
        }

        self.store.save_dark_mode(dark)?;
        self.dark = dark;
        tracing::info!(dark, "theme changed");
        Ok(true)
    }

    /// Flip the flag and persist it. Returns the new theme.
    pub fn toggle(&mut self) -> Result<Theme, SettingsError> {
        self.set_dark_mode(!self.dark)?;
        Ok(self.theme())
    }
}
