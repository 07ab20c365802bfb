//! Scribe Storage Layer
//!
//! Implements the Scribe collaborator traits over a SQLite database shaped
//! like the host repository's field tables.
//!
//! # Architecture
//!
//! - `TermResolver`: external URI (or authority link) to taxonomy term id
//! - `HierarchyQueries`: the membership walk query and the pending-parts
//!   anti-join, both with `IN (:name[])` list expansion
//! - `EntityStore`: full node loads, including the attached service file
//!
//! The seeding methods (`insert_term`, `insert_node`, `insert_media`) exist
//! for fixtures and local test databases.
//!
//! # Examples
//!
//! ```no_run
//! use scribe_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for queries
//! ```

#![warn(missing_docs)]

mod params;

pub use params::BoundQuery;

use rusqlite::{params, Connection, OptionalExtension};
use scribe_domain::traits::{EntityStore, HierarchyQueries, MemberQuery, PendingQuery, TermResolver};
use scribe_domain::{Node, NodeId, NodeRow, ServiceFile, TermId, Vocabulary};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A list parameter was bound with no values
    #[error("Empty list bound to :{0}[]")]
    EmptyList(String),

    /// Malformed query template
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// A node to be inserted by the seeding API
#[derive(Debug, Clone, Default)]
pub struct NewNode {
    /// Title
    pub title: String,

    /// Content type; empty means `islandora_object`
    pub bundle: String,

    /// Model term
    pub model: Option<TermId>,

    /// Parent containers
    pub member_of: Vec<NodeId>,
}

impl NewNode {
    /// An `islandora_object` node with the given title and model
    pub fn object(title: impl Into<String>, model: TermId) -> Self {
        Self {
            title: title.into(),
            bundle: DEFAULT_BUNDLE.to_string(),
            model: Some(model),
            member_of: Vec::new(),
        }
    }

    /// Add a parent container
    pub fn member_of(mut self, parent: NodeId) -> Self {
        self.member_of.push(parent);
        self
    }
}

/// Search criteria for picking nodes by title
#[derive(Debug, Clone, Default)]
pub struct NodeSearch {
    /// Case-insensitive title fragment
    pub title_contains: Option<String>,

    /// Restrict to one content type
    pub bundle: Option<String>,

    /// Restrict to nodes with one of these models
    pub models: Vec<TermId>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Content type repository objects are stored under
pub const DEFAULT_BUNDLE: &str = "islandora_object";

/// Most ids bound to one `IN (:name[])` list
///
/// SQLite caps host parameters per statement (32766 by default), so longer
/// id lists are queried in chunks of this size.
pub const MAX_LIST_PARAMS: usize = 10_000;

const MEMBER_NODES_SQL: &str = "
SELECT DISTINCT n.nid
FROM node n
JOIN node__field_member_of me ON me.entity_id = n.nid
JOIN node__field_model mo ON mo.entity_id = n.nid
WHERE me.field_member_of_target_id IN (:parents[])
  AND mo.field_model_target_id IN (:terms[])
ORDER BY n.nid";

const PENDING_PARTS_SQL: &str = "
SELECT DISTINCT n.nid
FROM node n
JOIN node__field_member_of me ON me.entity_id = n.nid
JOIN node__field_model mo ON mo.entity_id = n.nid
WHERE me.field_member_of_target_id IN (:containers[])
  AND mo.field_model_target_id = :part_model
  AND n.nid NOT IN (
      SELECT mmo.field_media_of_target_id
      FROM media__field_media_use mmu
      JOIN media__field_media_of mmo ON mmo.entity_id = mmu.entity_id
      WHERE mmu.field_media_use_target_id = :excluded_use
  )
ORDER BY n.nid";

/// SQLite-based implementation of the Scribe collaborator traits
///
/// # Thread Safety
///
/// SQLite connections are not `Sync`. Share a store between batch units
/// behind a `Mutex`, or give each thread its own `SqliteStore`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use scribe_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("repository.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Run a single-column id query
    fn fetch_ids(&self, query: &BoundQuery) -> Result<Vec<NodeId>, StoreError> {
        tracing::trace!(sql = query.sql(), "Running id query");

        let mut stmt = self.conn.prepare(query.sql())?;
        let params = query.named_params();
        let ids = stmt
            .query_map(params.as_slice(), |row| row.get::<_, i64>(0))?
            .map(|nid| nid.map(|nid| NodeId::new(nid as u64)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Insert a taxonomy term, optionally tagged with an external URI
    pub fn insert_term(
        &mut self,
        vocabulary: &str,
        name: &str,
        external_uri: Option<&str>,
    ) -> Result<TermId, StoreError> {
        self.conn.execute(
            "INSERT INTO taxonomy_term_field_data (vid, name) VALUES (?1, ?2)",
            params![vocabulary, name],
        )?;
        let tid = self.conn.last_insert_rowid();

        if let Some(uri) = external_uri {
            self.conn.execute(
                "INSERT INTO taxonomy_term__field_external_uri (entity_id, field_external_uri_uri)
                 VALUES (?1, ?2)",
                params![tid, uri],
            )?;
        }

        Ok(TermId::new(tid as u64))
    }

    /// Attach an authority link URI to an existing term
    pub fn add_authority_link(&mut self, term: TermId, uri: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO taxonomy_term__field_authority_link (entity_id, field_authority_link_uri)
             VALUES (?1, ?2)",
            params![sql_id(term.value())?, uri],
        )?;
        Ok(())
    }

    /// Insert a node with its model and membership fields
    pub fn insert_node(&mut self, node: &NewNode) -> Result<NodeId, StoreError> {
        let bundle = if node.bundle.is_empty() {
            DEFAULT_BUNDLE
        } else {
            node.bundle.as_str()
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO node (uuid, type, title) VALUES (?1, ?2, ?3)",
            params![uuid::Uuid::now_v7().to_string(), bundle, &node.title],
        )?;
        let nid = tx.last_insert_rowid();

        if let Some(model) = node.model {
            tx.execute(
                "INSERT INTO node__field_model (entity_id, field_model_target_id) VALUES (?1, ?2)",
                params![nid, sql_id(model.value())?],
            )?;
        }

        for (delta, parent) in node.member_of.iter().enumerate() {
            tx.execute(
                "INSERT INTO node__field_member_of (entity_id, delta, field_member_of_target_id)
                 VALUES (?1, ?2, ?3)",
                params![nid, delta as i64, sql_id(parent.value())?],
            )?;
        }
        tx.commit()?;

        Ok(NodeId::new(nid as u64))
    }

    /// Insert a media entity attached to a node with the given uses
    pub fn insert_media(
        &mut self,
        media_of: NodeId,
        bundle: &str,
        file_uri: &str,
        mime_type: &str,
        uses: &[TermId],
    ) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO media (bundle, file_uri, filemime) VALUES (?1, ?2, ?3)",
            params![bundle, file_uri, mime_type],
        )?;
        let mid = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO media__field_media_of (entity_id, field_media_of_target_id) VALUES (?1, ?2)",
            params![mid, sql_id(media_of.value())?],
        )?;

        for (delta, use_term) in uses.iter().enumerate() {
            tx.execute(
                "INSERT INTO media__field_media_use (entity_id, delta, field_media_use_target_id)
                 VALUES (?1, ?2, ?3)",
                params![mid, delta as i64, sql_id(use_term.value())?],
            )?;
        }
        tx.commit()?;

        Ok(mid as u64)
    }

    /// Delete a node and its field rows
    ///
    /// Media pointing at the node are left in place. Returns whether the
    /// node existed.
    pub fn delete_node(&mut self, id: NodeId) -> Result<bool, StoreError> {
        let nid = sql_id(id.value())?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM node__field_member_of WHERE entity_id = ?1", params![nid])?;
        tx.execute("DELETE FROM node__field_model WHERE entity_id = ?1", params![nid])?;
        let deleted = tx.execute("DELETE FROM node WHERE nid = ?1", params![nid])?;
        tx.commit()?;

        Ok(deleted > 0)
    }

    /// Find nodes for an operator to pick from
    ///
    /// Results are ordered by title, then id.
    pub fn find_nodes(&self, search: &NodeSearch) -> Result<Vec<Node>, StoreError> {
        let mut sql = String::from("SELECT n.nid FROM node n");
        if !search.models.is_empty() {
            sql.push_str(" JOIN node__field_model mo ON mo.entity_id = n.nid");
        }
        sql.push_str(" WHERE 1=1");

        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(fragment) = &search.title_contains {
            sql.push_str(" AND n.title LIKE ? ESCAPE '\\'");
            query_params.push(Box::new(format!("%{}%", escape_like(fragment))));
        }

        if let Some(bundle) = &search.bundle {
            sql.push_str(" AND n.type = ?");
            query_params.push(Box::new(bundle.clone()));
        }

        if !search.models.is_empty() {
            let marks = vec!["?"; search.models.len()].join(", ");
            sql.push_str(&format!(" AND mo.field_model_target_id IN ({})", marks));
            for model in &search.models {
                query_params.push(Box::new(sql_id(model.value())?));
            }
        }

        sql.push_str(" ORDER BY n.title, n.nid");

        if let Some(limit) = search.limit {
            sql.push_str(" LIMIT ?");
            query_params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = query_params.iter().map(|p| p.as_ref()).collect();
        let ids = stmt
            .query_map(&param_refs[..], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut nodes = Vec::with_capacity(ids.len());
        for nid in ids {
            let id = NodeId::new(nid as u64);
            let node = self
                .load_node(id)?
                .ok_or_else(|| StoreError::NotFound(format!("node {}", id)))?;
            nodes.push(node);
        }

        Ok(nodes)
    }

    /// Load the first service-file media attached to a node
    fn service_file(&self, id: NodeId) -> Result<Option<ServiceFile>, StoreError> {
        let nid = sql_id(id.value())?;
        let file = self
            .conn
            .query_row(
                "SELECT m.mid, m.file_uri, m.filemime
                 FROM media m
                 JOIN media__field_media_of mo ON mo.entity_id = m.mid
                 JOIN media__field_media_use mu ON mu.entity_id = m.mid
                 JOIN taxonomy_term__field_external_uri tu
                   ON tu.entity_id = mu.field_media_use_target_id
                 WHERE mo.field_media_of_target_id = ?1
                   AND tu.field_external_uri_uri = ?2
                 ORDER BY m.mid
                 LIMIT 1",
                params![nid, Vocabulary::ServiceFile.uri()],
                |row| {
                    Ok(ServiceFile {
                        media_id: row.get::<_, i64>(0)? as u64,
                        uri: row.get(1)?,
                        mime_type: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(file)
    }
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Convert an id for binding; SQLite integers are signed
fn sql_id(id: u64) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::InvalidQuery(format!("Id {} is out of range", id)))
}

fn to_sql_ids<I: IntoIterator<Item = u64>>(ids: I) -> Result<Vec<i64>, StoreError> {
    ids.into_iter().map(sql_id).collect()
}

impl TermResolver for SqliteStore {
    type Error = StoreError;

    fn term_for_uri(&self, uri: &str) -> Result<Option<TermId>, Self::Error> {
        let external: Option<i64> = self
            .conn
            .query_row(
                "SELECT entity_id FROM taxonomy_term__field_external_uri
                 WHERE field_external_uri_uri = ?1
                 ORDER BY entity_id LIMIT 1",
                params![uri],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(tid) = external {
            return Ok(Some(TermId::new(tid as u64)));
        }

        let authority: Option<i64> = self
            .conn
            .query_row(
                "SELECT entity_id FROM taxonomy_term__field_authority_link
                 WHERE field_authority_link_uri = ?1
                 ORDER BY entity_id LIMIT 1",
                params![uri],
                |row| row.get(0),
            )
            .optional()?;

        Ok(authority.map(|tid| TermId::new(tid as u64)))
    }
}

impl HierarchyQueries for SqliteStore {
    type Error = StoreError;

    fn member_nodes(&self, query: &MemberQuery) -> Result<Vec<NodeId>, Self::Error> {
        let parents = to_sql_ids(query.parents.iter().map(|id| id.value()))?;
        let terms = to_sql_ids(query.models.iter().map(|t| t.value()))?;
        if parents.is_empty() {
            return Err(StoreError::EmptyList("parents".to_string()));
        }

        let mut ids = BTreeSet::new();
        for chunk in parents.chunks(MAX_LIST_PARAMS) {
            let bound = BoundQuery::new(MEMBER_NODES_SQL)
                .list("parents", chunk)?
                .list("terms", &terms)?;
            ids.extend(self.fetch_ids(&bound)?);
        }

        Ok(ids.into_iter().collect())
    }

    fn pending_parts(&self, query: &PendingQuery) -> Result<Vec<NodeRow>, Self::Error> {
        let containers = to_sql_ids(query.containers.iter().map(|id| id.value()))?;
        let part_model = sql_id(query.part_model.value())?;
        let excluded_use = sql_id(query.excluded_use.value())?;
        if containers.is_empty() {
            return Err(StoreError::EmptyList("containers".to_string()));
        }

        let mut ids = BTreeSet::new();
        for chunk in containers.chunks(MAX_LIST_PARAMS) {
            let bound = BoundQuery::new(PENDING_PARTS_SQL)
                .list("containers", chunk)?
                .scalar("part_model", part_model)
                .scalar("excluded_use", excluded_use);
            ids.extend(self.fetch_ids(&bound)?);
        }

        Ok(ids.into_iter().map(|nid| NodeRow { nid }).collect())
    }
}

impl EntityStore for SqliteStore {
    type Error = StoreError;

    fn load_node(&self, id: NodeId) -> Result<Option<Node>, Self::Error> {
        let nid = sql_id(id.value())?;
        let header = self
            .conn
            .query_row(
                "SELECT uuid, type, title FROM node WHERE nid = ?1",
                params![nid],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((uuid, bundle, title)) = header else {
            return Ok(None);
        };

        let model: Option<i64> = self
            .conn
            .query_row(
                "SELECT field_model_target_id FROM node__field_model WHERE entity_id = ?1",
                params![nid],
                |row| row.get(0),
            )
            .optional()?;

        let mut stmt = self.conn.prepare(
            "SELECT field_member_of_target_id FROM node__field_member_of
             WHERE entity_id = ?1 ORDER BY delta",
        )?;
        let member_of = stmt
            .query_map(params![nid], |row| row.get::<_, i64>(0))?
            .map(|parent| parent.map(|p| NodeId::new(p as u64)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Node {
            id,
            uuid,
            bundle,
            title,
            model: model.map(|tid| TermId::new(tid as u64)),
            member_of,
            service_file: self.service_file(id)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off_now"), "50\\% off\\_now");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_member_nodes_rejects_empty_models() {
        let store = SqliteStore::new(":memory:").unwrap();
        let query = MemberQuery {
            parents: vec![NodeId::new(1)],
            models: Vec::new(),
        };

        let result = store.member_nodes(&query);
        assert!(matches!(result, Err(StoreError::EmptyList(name)) if name == "terms"));
    }
}
