//! Queries for the pattern_clusters table.
//!
//! Clusters are advisory and regenerated wholesale; the caller wraps
//! [`replace_all`] in a transaction.

use mend_core::errors::StorageError;
use mend_core::types::PatternCluster;
use rusqlite::{params, Connection};

use super::util::{json_column, sqlite_err, to_json};

const COLUMNS: &str =
    "cluster_index, pattern_ids, size, avg_success_rate, total_occurrences, centroid, generated_at";

pub fn replace_all(conn: &Connection, clusters: &[PatternCluster]) -> Result<(), StorageError> {
    conn.execute("DELETE FROM pattern_clusters", [])
        .map_err(sqlite_err)?;
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO pattern_clusters ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))
        .map_err(sqlite_err)?;
    for cluster in clusters {
        let pattern_ids = to_json(&cluster.pattern_ids)?;
        let centroid = to_json(&cluster.centroid)?;
        stmt.execute(params![
            cluster.cluster_index as i64,
            pattern_ids,
            cluster.size as i64,
            cluster.avg_success_rate,
            cluster.total_occurrences as i64,
            centroid,
            cluster.generated_at,
        ])
        .map_err(sqlite_err)?;
    }
    Ok(())
}

pub fn list_all(conn: &Connection) -> Result<Vec<PatternCluster>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM pattern_clusters ORDER BY cluster_index ASC"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt.query_map([], map_row).map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<PatternCluster> {
    let ids_raw: String = row.get(1)?;
    let centroid_raw: String = row.get(5)?;
    Ok(PatternCluster {
        cluster_index: row.get::<_, i64>(0)? as usize,
        pattern_ids: json_column(&ids_raw, 1)?,
        size: row.get::<_, i64>(2)? as usize,
        avg_success_rate: row.get(3)?,
        total_occurrences: row.get::<_, i64>(4)? as u64,
        centroid: json_column(&centroid_raw, 5)?,
        generated_at: row.get(6)?,
    })
}
