//! Persistence gateway - a flat key/value snapshot of the pet.
//!
//! The engine writes the snapshot after every mutating action and decay tick
//! and reads it once at start-up. Stores are pluggable through
//! [`KeyValueStore`]: [`MemoryStore`] for tests and embedding, [`FileStore`]
//! for a JSON or bincode file on disk.
//!
//! Loading never fails. A float that is absent *or stored as exactly zero*
//! falls back to its default, so a need that was genuinely saved at 0.0
//! comes back at its default on the next launch. Callers rely on this
//! fallback; keep it.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blobpet_logic::achievements::{Achievement, AchievementSet};
use blobpet_logic::needs::{clamp_unit, DEFAULT_ENERGY, DEFAULT_HAPPINESS, DEFAULT_HUNGER};
use serde::{Deserialize, Serialize};

use crate::state::PetState;

pub const KEY_HUNGER: &str = "BlobHunger";
pub const KEY_ENERGY: &str = "BlobEnergy";
pub const KEY_HAPPINESS: &str = "BlobHappiness";
pub const KEY_SCALE: &str = "BlobScale";
pub const KEY_TOTAL_FEEDINGS: &str = "TotalFeedings";
pub const KEY_TOTAL_BOUNCES: &str = "TotalBounces";
pub const KEY_ACHIEVEMENTS: &str = "Achievements";

const DEFAULT_SCALE: f32 = 1.0;

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    Float(f64),
    Int(i64),
    Strings(Vec<String>),
}

/// Minimal key/value storage the engine persists through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&StoredValue>;
    fn set(&mut self, key: &str, value: StoredValue);
    /// Make pending writes durable.
    fn flush(&mut self) -> Result<(), PersistError> {
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// On-disk encoding for [`FileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Bincode,
}

impl FileFormat {
    /// Pick a format from a file extension; anything but `.bin` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => FileFormat::Bincode,
            _ => FileFormat::Json,
        }
    }
}

/// File-backed store. The whole map is rewritten on every flush.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: FileFormat,
    values: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Open a store at `path`. A missing file gives an empty store; a file
    /// that can't be decoded is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>, format: FileFormat) -> Result<Self, PersistError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => match decode(&bytes, format) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring unreadable save file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            format,
            values,
        })
    }
}

fn decode(bytes: &[u8], format: FileFormat) -> Result<BTreeMap<String, StoredValue>, PersistError> {
    Ok(match format {
        FileFormat::Json => serde_json::from_slice(bytes)?,
        FileFormat::Bincode => bincode::deserialize(bytes)?,
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        let bytes = match self.format {
            FileFormat::Json => serde_json::to_vec_pretty(&self.values)?,
            FileFormat::Bincode => bincode::serialize(&self.values)?,
        };
        // Write beside the target then rename, so a crash never leaves half a file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// The persisted subset of [`PetState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub hunger: f32,
    pub energy: f32,
    pub happiness: f32,
    pub scale: f32,
    pub total_feedings: u32,
    pub total_bounces: u32,
    pub achievements: Vec<String>,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            hunger: DEFAULT_HUNGER,
            energy: DEFAULT_ENERGY,
            happiness: DEFAULT_HAPPINESS,
            scale: DEFAULT_SCALE,
            total_feedings: 0,
            total_bounces: 0,
            achievements: Vec::new(),
        }
    }
}

impl PersistedSnapshot {
    pub fn from_state(state: &PetState) -> Self {
        Self {
            hunger: state.needs.hunger,
            energy: state.needs.energy,
            happiness: state.needs.happiness,
            scale: state.scale,
            total_feedings: state.counters.total_feedings,
            total_bounces: state.counters.total_bounces,
            achievements: state.achievements.titles(),
        }
    }

    /// Read a snapshot, falling back to defaults for anything missing,
    /// zero, or malformed.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            hunger: clamp_unit(read_float(store, KEY_HUNGER, DEFAULT_HUNGER)),
            energy: clamp_unit(read_float(store, KEY_ENERGY, DEFAULT_ENERGY)),
            happiness: clamp_unit(read_float(store, KEY_HAPPINESS, DEFAULT_HAPPINESS)),
            scale: read_scale(store),
            total_feedings: read_count(store, KEY_TOTAL_FEEDINGS),
            total_bounces: read_count(store, KEY_TOTAL_BOUNCES),
            achievements: read_strings(store, KEY_ACHIEVEMENTS),
        }
    }

    /// Write every key and flush the store.
    pub fn write(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
        store.set(KEY_HUNGER, StoredValue::Float(self.hunger as f64));
        store.set(KEY_ENERGY, StoredValue::Float(self.energy as f64));
        store.set(KEY_HAPPINESS, StoredValue::Float(self.happiness as f64));
        store.set(KEY_SCALE, StoredValue::Float(self.scale as f64));
        store.set(KEY_TOTAL_FEEDINGS, StoredValue::Int(self.total_feedings as i64));
        store.set(KEY_TOTAL_BOUNCES, StoredValue::Int(self.total_bounces as i64));
        store.set(KEY_ACHIEVEMENTS, StoredValue::Strings(self.achievements.clone()));
        store.flush()
    }

    /// Resolve stored titles into an achievement set, dropping unknown ones.
    pub fn achievement_set(&self) -> AchievementSet {
        let mut set = AchievementSet::new();
        for title in &self.achievements {
            match Achievement::from_title(title) {
                Some(a) => {
                    set.insert(a);
                }
                None => log::warn!("Ignoring unknown achievement '{}' in save data", title),
            }
        }
        set
    }
}

fn read_float(store: &dyn KeyValueStore, key: &str, default: f32) -> f32 {
    match store.get(key) {
        Some(StoredValue::Float(v)) if *v != 0.0 && v.is_finite() => *v as f32,
        Some(StoredValue::Float(_)) | None => default,
        Some(other) => {
            log::warn!("Expected a float for {}, found {:?}; using default", key, other);
            default
        }
    }
}

fn read_scale(store: &dyn KeyValueStore) -> f32 {
    let scale = read_float(store, KEY_SCALE, DEFAULT_SCALE);
    if scale > 0.0 {
        scale
    } else {
        log::warn!("Stored scale {} is not positive; using default", scale);
        DEFAULT_SCALE
    }
}

fn read_count(store: &dyn KeyValueStore, key: &str) -> u32 {
    match store.get(key) {
        Some(StoredValue::Int(v)) => u32::try_from(*v).unwrap_or_else(|_| {
            log::warn!("Count {} out of range ({}); using 0", key, v);
            0
        }),
        None => 0,
        Some(other) => {
            log::warn!("Expected an integer for {}, found {:?}; using 0", key, other);
            0
        }
    }
}

fn read_strings(store: &dyn KeyValueStore, key: &str) -> Vec<String> {
    match store.get(key) {
        Some(StoredValue::Strings(v)) => v.clone(),
        None => Vec::new(),
        Some(other) => {
            log::warn!("Expected a string list for {}, found {:?}; ignoring", key, other);
            Vec::new()
        }
    }
}

/// Errors that can occur while reading or writing a store
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Bincode(Box<bincode::ErrorKind>),
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

impl From<Box<bincode::ErrorKind>> for PersistError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        PersistError::Bincode(e)
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "IO error: {}", e),
            PersistError::Json(e) => write!(f, "JSON error: {}", e),
            PersistError::Bincode(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {}
