use crate::search::SearchEngine;
use domain::models::{ChunkMetadata, DocumentChunk, ScoredChunk};
use domain::ports::EmbeddingClient;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use shared::error::RagError;
use shared::types::Result;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Resolve `DATABASE_URL` to a SQLite file path. Accepts `sqlite://path`,
/// `sqlite:path` or a bare path. In-memory databases are rejected: every
/// open would see a fresh empty store.
pub fn sqlite_path(database_url: &str) -> Result<String> {
    let url = database_url.trim();
    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if url.contains("://") {
        return Err(RagError::config(format!(
            "unsupported DATABASE_URL '{url}': only sqlite databases are supported"
        )));
    } else {
        url
    };
    if path.is_empty() {
        return Err(RagError::config("DATABASE_URL has an empty path"));
    }
    if path == ":memory:" || path.starts_with("file::memory:") {
        return Err(RagError::config(format!(
            "DATABASE_URL '{url}' is an in-memory database; use a file path"
        )));
    }
    Ok(path.to_string())
}

/// A persistent collection of embedded chunks for one embedding space.
pub struct VectorStore {
    conn: Mutex<Connection>,
    collection: String,
    collection_id: i64,
    embedder: Box<dyn EmbeddingClient>,
}

impl VectorStore {
    /// Open (creating if needed) the database and the named collection.
    pub fn open(
        database_url: &str,
        collection: &str,
        embedder: Box<dyn EmbeddingClient>,
    ) -> Result<Self> {
        let path = sqlite_path(database_url)?;
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RagError::upstream(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let conn = Connection::open(&path)?;
        Self::setup_db(&conn)?;
        conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection],
        )?;
        let collection_id: i64 = conn.query_row(
            "SELECT id FROM collections WHERE name = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
            collection_id,
            embedder,
        })
    }

    fn setup_db(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            CREATE TABLE IF NOT EXISTS collections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                dimensions INTEGER
            );
            CREATE TABLE IF NOT EXISTS embeddings (
                id TEXT PRIMARY KEY,
                collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
                document TEXT NOT NULL,
                embedding BLOB NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}'
            );
            CREATE INDEX IF NOT EXISTS idx_embeddings_collection ON embeddings(collection_id);
        ",
        )
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RagError::upstream("vector store connection poisoned"))
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }


    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM embeddings WHERE collection_id = ?1",
            params![self.collection_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Dimensionality fixed by the first write, `None` while empty.
    pub fn dimensions(&self) -> Result<Option<usize>> {
        let conn = self.conn()?;
        Self::collection_dimensions(&conn, self.collection_id)
    }

    fn collection_dimensions(conn: &Connection, collection_id: i64) -> Result<Option<usize>> {
        let dims: Option<i64> = conn
            .query_row(
                "SELECT dimensions FROM collections WHERE id = ?1",
                params![collection_id],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        Ok(dims.map(|d| d as usize))
    }

    fn check_dimensions(&self, expected: Option<usize>, actual: usize) -> Result<()> {
        match expected {
            Some(expected) if expected != actual => Err(RagError::config(format!(
                "collection '{}' holds {expected}-dimensional vectors but the embedder produced {actual}",
                self.collection
            ))),
            _ => Ok(()),
        }
    }

    /// Embed all chunks in one batch and write them in one transaction.
    /// Returns the number of chunks written.
    pub async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RagError::upstream(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        let dims = vectors[0].len();
        if let Some(v) = vectors.iter().find(|v| v.len() != dims) {
            return Err(RagError::upstream(format!(
                "embedder returned mixed dimensions ({dims} and {})",
                v.len()
            )));
        }

        let conn = self.conn()?;
        self.check_dimensions(Self::collection_dimensions(&conn, self.collection_id)?, dims)?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE collections SET dimensions = ?1 WHERE id = ?2 AND dimensions IS NULL",
            params![dims as i64, self.collection_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO embeddings (id, collection_id, document, embedding, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (chunk, vector) in chunks.iter().zip(&vectors) {
                let vector_bytes = serde_json::to_vec(vector)?;
                let metadata = serde_json::to_string(&chunk.metadata)?;
                stmt.execute(params![
                    chunk.stable_id(),
                    self.collection_id,
                    chunk.text,
                    vector_bytes,
                    metadata
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(collection = %self.collection, written = chunks.len(), "Chunks stored");
        Ok(chunks.len())
    }

    /// The `k` chunks closest to `query` by cosine distance, nearest first.
    pub async fn similarity_search_with_score(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_vector = self.embedder.embed_query(query).await?;

        let conn = self.conn()?;
        let Some(dims) = Self::collection_dimensions(&conn, self.collection_id)? else {
            return Ok(Vec::new());
        };
        self.check_dimensions(Some(dims), query_vector.len())?;

        let mut stmt = conn.prepare(
            "SELECT document, embedding, metadata FROM embeddings
             WHERE collection_id = ?1 ORDER BY rowid",
        )?;
        let mut rows = stmt.query(params![self.collection_id])?;
        let mut chunks = Vec::new();
        let mut vectors = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            let vector_bytes: Vec<u8> = row.get(1)?;
            let metadata: String = row.get(2)?;
            vectors.push(serde_json::from_slice::<Vec<f32>>(&vector_bytes)?);
            chunks.push(DocumentChunk {
                text,
                metadata: serde_json::from_str::<ChunkMetadata>(&metadata)?,
            });
        }

        let ranked = SearchEngine::nearest(&query_vector, vectors.iter().map(Vec::as_slice), k);
        Ok(ranked
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: chunks[i].clone(),
                score,
            })
            .collect())
    }
}
