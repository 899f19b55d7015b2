// JSON result store.
//
// The latest upload per source is authoritative; `put` fully replaces
// that source's prior series. Writes are atomic (write .tmp then
// rename) so a failed request never corrupts previously stored results.
// Concurrent processes racing on the same data directory are
// last-writer-wins — an external-storage concern, not an engine one.

use std::fs;
use std::path::{Path, PathBuf};

use settlebook_engine::{DailyRecord, SeriesSet, ShopRecord, SourceId};

/// Persisted results, keyed by source. Injected into consumers instead
/// of being reached for as ambient global state.
pub trait ResultStore {
    fn get(&self, source: SourceId) -> Result<Vec<DailyRecord>, String>;
    fn put(&self, source: SourceId, series: &[DailyRecord]) -> Result<(), String>;
    fn get_shops(&self) -> Result<Vec<ShopRecord>, String>;
    fn put_shops(&self, shops: &[ShopRecord]) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
}

/// Load every source's stored series for merging.
pub fn load_series_set(store: &dyn ResultStore) -> Result<SeriesSet, String> {
    Ok(SeriesSet {
        fixed_fee: store.get(SourceId::FixedFee)?,
        cycle_a: store.get(SourceId::CycleA)?,
        cycle_b: store.get(SourceId::CycleB)?,
        offline: store.get(SourceId::Offline)?,
    })
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

const SHOP_STATS_FILE: &str = "shop-stats.json";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn series_path(&self, source: SourceId) -> PathBuf {
        self.dir.join(format!("{source}-daily.json"))
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        serde_json::from_str(&content).map_err(|e| format!("corrupt {}: {e}", path.display()))
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("cannot create {}: {e}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization error: {e}"))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| format!("cannot write {}: {e}", tmp.display()))?;
        fs::rename(&tmp, path)
            .map_err(|e| format!("cannot replace {}: {e}", path.display()))
    }
}

impl ResultStore for FileStore {
    fn get(&self, source: SourceId) -> Result<Vec<DailyRecord>, String> {
        Self::read_json(&self.series_path(source))
    }

    fn put(&self, source: SourceId, series: &[DailyRecord]) -> Result<(), String> {
        self.write_json(&self.series_path(source), &series)
    }

    fn get_shops(&self) -> Result<Vec<ShopRecord>, String> {
        Self::read_json(&self.dir.join(SHOP_STATS_FILE))
    }

    fn put_shops(&self, shops: &[ShopRecord]) -> Result<(), String> {
        self.write_json(&self.dir.join(SHOP_STATS_FILE), &shops)
    }

    /// Reset every result file to an empty array.
    fn clear(&self) -> Result<(), String> {
        for source in SourceId::ALL {
            self.put(source, &[])?;
        }
        self.put_shops(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
