use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use rust_embed::RustEmbed;

/// Embed the asset root into the binary at compile time.
/// Every immediate sub-directory is one resource group.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct BundledAssets;

/// A single file resolved from an asset tree
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    /// Quoted entity tag, stable for identical content
    pub etag: String,
    /// Modification time in seconds since the Unix epoch, when known
    pub last_modified: Option<u64>,
}

/// Read-only mapping from `group/relative/path` keys to file contents.
///
/// Implementations are shared between concurrently handled requests
/// and must never change after construction.
pub trait AssetTree: Send + Sync + 'static {
    /// Look up a single file by its full key
    fn get(&self, key: &str) -> Option<Asset>;

    /// Every key in the tree
    fn keys(&self) -> Box<dyn Iterator<Item = Cow<'static, str>> + '_>;
}

/// Asset tree backed by a `rust-embed` folder
pub struct EmbeddedTree<E> {
    _embed: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedTree<E> {
    pub fn new() -> Self {
        Self {
            _embed: PhantomData,
        }
    }
}

impl<E: RustEmbed> Default for EmbeddedTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed + 'static> AssetTree for EmbeddedTree<E> {
    fn get(&self, key: &str) -> Option<Asset> {
        let file = E::get(key)?;
        let etag = quoted_hex(&file.metadata.sha256_hash()[..16]);

        Some(Asset {
            last_modified: file.metadata.last_modified(),
            data: file.data,
            etag,
        })
    }

    fn keys(&self) -> Box<dyn Iterator<Item = Cow<'static, str>> + '_> {
        Box::new(E::iter())
    }
}

/// Asset tree held in memory, for content produced by the host at startup
#[derive(Debug, Default, Clone)]
pub struct MemoryTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file under `key`, builder style
    pub fn with_file(mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.files.insert(key.into(), data.into());
        self
    }
}

impl AssetTree for MemoryTree {
    fn get(&self, key: &str) -> Option<Asset> {
        let data = self.files.get(key)?;

        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let etag = quoted_hex(&hasher.finish().to_be_bytes());

        Some(Asset {
            data: Cow::Owned(data.clone()),
            etag,
            last_modified: None,
        })
    }

    fn keys(&self) -> Box<dyn Iterator<Item = Cow<'static, str>> + '_> {
        Box::new(self.files.keys().map(|key| Cow::Owned(key.clone())))
    }
}

fn quoted_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('"');
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out.push('"');
    out
}
