use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use stockroom_inventory::Item;
use stockroom_orders::Order;

use super::r#trait::{Storage, StorageError};
use super::snapshot::Snapshot;

/// JSON snapshot file storage.
///
/// The whole state lives in one JSON document. Every save rewrites it through
/// a sibling temp file and an atomic rename, so a crash mid-write leaves the
/// previous snapshot in place. The in-memory copy is only replaced once the
/// rename succeeded.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    cache: RwLock<Snapshot>,
}

impl JsonFileStorage {
    /// Open (or lazily create) the snapshot at `path`.
    ///
    /// A missing file loads as empty; the file is only created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let snapshot = read_snapshot(&path)?;
        tracing::debug!(
            path = %path.display(),
            items = snapshot.items.len(),
            orders = snapshot.orders.len(),
            "opened json storage"
        );
        Ok(Self {
            path,
            cache: RwLock::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_with(
        &self,
        change: impl FnOnce(&mut Snapshot) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;

        let mut staged = cache.clone();
        change(&mut staged)?;
        write_snapshot(&self.path, &staged)?;
        *cache = staged;
        Ok(())
    }

    fn read_cache(&self) -> Result<std::sync::RwLockReadGuard<'_, Snapshot>, StorageError> {
        self.cache
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }
}

impl Storage for JsonFileStorage {
    fn save_item(&self, item: &Item) -> Result<(), StorageError> {
        self.write_with(|snapshot| snapshot.put_item(item))
    }

    fn save_order(&self, order: &Order, touched: &[Item]) -> Result<(), StorageError> {
        self.write_with(|snapshot| {
            for item in touched {
                snapshot.put_item(item)?;
            }
            snapshot.put_order(order);
            Ok(())
        })
    }

    fn load_items(&self) -> Result<Vec<Item>, StorageError> {
        Ok(self.read_cache()?.items())
    }

    fn load_orders(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.read_cache()?.orders.clone())
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, StorageError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Snapshot::default()),
        Err(e) => return Err(e.into()),
    };
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
    snapshot.check_format()?;
    Ok(snapshot)
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    {
        let mut writer = BufWriter::new(fs::File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "snapshot written");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "stockroom".into());
    name.push(".tmp");
    path.with_file_name(name)
}
