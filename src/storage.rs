use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::Context;

/// Named-slot string storage. Each slot holds one serialized blob.
pub trait SlotStorage: Send + Sync {
    fn get_item(&self, slot: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, slot: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, slot: &str) -> anyhow::Result<()>;
}

/// Process-scoped slots; gone when the process exits.
#[derive(Default)]
pub struct MemorySlots {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemorySlots {
    fn get_item(&self, slot: &str) -> anyhow::Result<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow::anyhow!("memory slots lock poisoned"))?;
        Ok(items.get(slot).cloned())
    }

    fn set_item(&self, slot: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow::anyhow!("memory slots lock poisoned"))?;
        items.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, slot: &str) -> anyhow::Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow::anyhow!("memory slots lock poisoned"))?;
        items.remove(slot);
        Ok(())
    }
}

/// One `<slot>.json` file per slot under a directory.
#[derive(Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

impl SlotStorage for FileSlots {
    fn get_item(&self, slot: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(slot);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read slot {}", path.display())),
        }
    }

    fn set_item(&self, slot: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(slot);
        // Readers see either the old blob or the new one, never a partial write.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("write slot {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replace slot {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, slot: &str) -> anyhow::Result<()> {
        let path = self.path_for(slot);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove slot {}", path.display())),
        }
    }
}
