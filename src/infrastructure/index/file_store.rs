//! Directory-backed snapshot persistence.
//!
//! `vectors.bin` layout, little endian: magic `RAGV`, u32 format version,
//! u32 dimension, u64 row count, then `rows * dimension` f32 values.
//! `meta.json` holds the passage records as one JSON array in row order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::{Buf, BufMut, BytesMut};
use tracing::{debug, info};

use crate::domain::index::{IndexSnapshot, Passage, SnapshotStore};
use crate::domain::DomainError;

pub const VECTORS_FILE: &str = "vectors.bin";
pub const META_FILE: &str = "meta.json";

const MAGIC: &[u8; 4] = b"RAGV";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a snapshot has been written here. Says nothing about its validity.
    pub fn exists(&self) -> bool {
        self.vectors_path().is_file() || self.meta_path().is_file()
    }

    fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }
}

fn encode_vectors(snapshot: &IndexSnapshot) -> BytesMut {
    let dimension = snapshot.dimension();
    let rows = snapshot.len();
    let mut buf = BytesMut::with_capacity(HEADER_LEN + rows * dimension * 4);

    buf.put_slice(MAGIC);
    buf.put_u32_le(FORMAT_VERSION);
    buf.put_u32_le(dimension as u32);
    buf.put_u64_le(rows as u64);

    for passage in snapshot.passages() {
        for value in &passage.embedding {
            buf.put_f32_le(*value);
        }
    }

    buf
}

fn decode_vectors(mut data: &[u8]) -> Result<(usize, Vec<Vec<f32>>), DomainError> {
    if data.len() < HEADER_LEN {
        return Err(DomainError::corrupt_index("Vector file is shorter than its header"));
    }

    if &data[..4] != MAGIC {
        return Err(DomainError::corrupt_index("Vector file has an unknown signature"));
    }
    data.advance(4);

    let version = data.get_u32_le();
    if version != FORMAT_VERSION {
        return Err(DomainError::corrupt_index(format!(
            "Unsupported vector file version {}",
            version
        )));
    }

    let dimension = data.get_u32_le() as usize;
    let rows = data.get_u64_le() as usize;

    let expected = rows
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| DomainError::corrupt_index("Vector file header overflows"))?;

    if data.remaining() != expected {
        return Err(DomainError::corrupt_index(format!(
            "Vector file holds {} bytes of data, header announces {}",
            data.remaining(),
            expected
        )));
    }

    let mut vectors = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut row = Vec::with_capacity(dimension);
        for _ in 0..dimension {
            row.push(data.get_f32_le());
        }
        vectors.push(row);
    }

    Ok((dimension, vectors))
}

async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to replace {}: {}", path.display(), e)))
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn persist(&self, snapshot: &IndexSnapshot) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let meta = serde_json::to_vec(snapshot.passages())
            .map_err(|e| DomainError::storage(format!("Failed to encode metadata: {}", e)))?;
        let vectors = encode_vectors(snapshot);

        write_atomically(&self.vectors_path(), &vectors).await?;
        write_atomically(&self.meta_path(), &meta).await?;

        info!(
            dir = %self.dir.display(),
            passages = snapshot.len(),
            dimension = snapshot.dimension(),
            "Index snapshot persisted"
        );

        Ok(())
    }

    async fn load(&self) -> Result<IndexSnapshot, DomainError> {
        let vector_bytes = tokio::fs::read(self.vectors_path()).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to read {}: {}",
                self.vectors_path().display(),
                e
            ))
        })?;
        let meta_bytes = tokio::fs::read(self.meta_path()).await.map_err(|e| {
            DomainError::storage(format!("Failed to read {}: {}", self.meta_path().display(), e))
        })?;

        let (dimension, vectors) = decode_vectors(&vector_bytes)?;
        let passages: Vec<Passage> = serde_json::from_slice(&meta_bytes)
            .map_err(|e| DomainError::corrupt_index(format!("Unreadable metadata: {}", e)))?;

        debug!(rows = vectors.len(), records = passages.len(), "Validating index snapshot");

        let snapshot = IndexSnapshot::from_parts(dimension, vectors, passages)?;

        info!(
            dir = %self.dir.display(),
            passages = snapshot.len(),
            dimension = snapshot.dimension(),
            "Index snapshot loaded"
        );

        Ok(snapshot)
    }
}
