//! Queries for the error_patterns table.

use mend_core::errors::StorageError;
use mend_core::store::{UpsertDisposition, UpsertOutcome};
use mend_core::types::{
    ErrorPattern, FixType, PatternStatistics, PatternType, Severity,
};
use rusqlite::{params, Connection, OptionalExtension};

use super::util::{is_unique_violation, json_column, sqlite_err, to_json};

pub const COLUMNS: &str = "id, pattern_signature, pattern_type, error_matcher, error_source, \
     severity, occurrence_count, success_rate, confidence_score, auto_fix_enabled, \
     auto_fix_script, auto_fix_type, human_approved, approved_by, approved_at, \
     learned_from_incidents, last_seen, created_at, updated_at";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn find_by_signature(
    conn: &Connection,
    signature: &str,
) -> Result<Option<ErrorPattern>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM error_patterns WHERE pattern_signature = ?1"
        ))
        .map_err(sqlite_err)?;
    stmt.query_row(params![signature], map_row)
        .optional()
        .map_err(sqlite_err)
}

pub fn find_by_id(
    conn: &Connection,
    pattern_id: &str,
) -> Result<Option<ErrorPattern>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM error_patterns WHERE id = ?1"))
        .map_err(sqlite_err)?;
    stmt.query_row(params![pattern_id], map_row)
        .optional()
        .map_err(sqlite_err)
}

/// Inserts a new pattern; a signature collision maps to
/// `DuplicateSignature`.
pub fn insert(conn: &Connection, pattern: &ErrorPattern) -> Result<(), StorageError> {
    let incidents = to_json(&pattern.learned_from_incidents)?;
    let result = conn.execute(
        "INSERT INTO error_patterns (id, pattern_signature, pattern_type, error_matcher, \
             error_source, severity, occurrence_count, success_rate, confidence_score, \
             auto_fix_enabled, auto_fix_script, auto_fix_type, human_approved, approved_by, \
             approved_at, learned_from_incidents, last_seen, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            pattern.id,
            pattern.pattern_signature,
            pattern.pattern_type.as_str(),
            pattern.error_matcher,
            pattern.error_source,
            pattern.severity.as_str(),
            pattern.occurrence_count as i64,
            pattern.success_rate,
            pattern.confidence_score,
            pattern.auto_fix_enabled,
            pattern.auto_fix_script,
            pattern.auto_fix_type.map(FixType::as_str),
            pattern.human_approved,
            pattern.approved_by,
            pattern.approved_at,
            incidents,
            pattern.last_seen,
            pattern.created_at,
            pattern.updated_at,
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Err(StorageError::DuplicateSignature {
            signature: pattern.pattern_signature.clone(),
        }),
        Err(err) => Err(sqlite_err(err)),
    }
}

/// The atomic learn-path upsert: one statement inserts the candidate or
/// advances the existing row's occurrence state, returning whichever row
/// won. The returned id tells the two apart: an insert keeps the
/// candidate's fresh id, an update keeps the existing row's.
pub fn upsert_occurrence(
    conn: &Connection,
    candidate: &ErrorPattern,
) -> Result<UpsertOutcome, StorageError> {
    let incidents = to_json(&candidate.learned_from_incidents)?;
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO error_patterns (id, pattern_signature, pattern_type, error_matcher, \
                 error_source, severity, occurrence_count, success_rate, confidence_score, \
                 auto_fix_enabled, auto_fix_script, auto_fix_type, human_approved, approved_by, \
                 approved_at, learned_from_incidents, last_seen, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19) \
             ON CONFLICT(pattern_signature) DO UPDATE SET \
                 occurrence_count = occurrence_count + 1, \
                 last_seen = excluded.last_seen, \
                 updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        ))
        .map_err(sqlite_err)?;
    let pattern = stmt
        .query_row(
            params![
                candidate.id,
                candidate.pattern_signature,
                candidate.pattern_type.as_str(),
                candidate.error_matcher,
                candidate.error_source,
                candidate.severity.as_str(),
                candidate.occurrence_count as i64,
                candidate.success_rate,
                candidate.confidence_score,
                candidate.auto_fix_enabled,
                candidate.auto_fix_script,
                candidate.auto_fix_type.map(FixType::as_str),
                candidate.human_approved,
                candidate.approved_by,
                candidate.approved_at,
                incidents,
                candidate.last_seen,
                candidate.created_at,
                candidate.updated_at,
            ],
            map_row,
        )
        .map_err(sqlite_err)?;
    let disposition = if pattern.id == candidate.id {
        UpsertDisposition::Created
    } else {
        UpsertDisposition::Updated
    };
    Ok(UpsertOutcome {
        pattern,
        disposition,
    })
}

/// Rewrites the dedup incident list after a merge.
pub fn set_incident_ids(
    conn: &Connection,
    pattern_id: &str,
    incident_ids: &[String],
) -> Result<(), StorageError> {
    let incidents = to_json(&incident_ids)?;
    conn.execute(
        "UPDATE error_patterns SET learned_from_incidents = ?2 WHERE id = ?1",
        params![pattern_id, incidents],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Stamps a human approval: script, type, both approval flags, approver.
pub fn approve(
    conn: &Connection,
    pattern_id: &str,
    fix_script: &str,
    fix_type: FixType,
    approved_by: &str,
    now: i64,
) -> Result<ErrorPattern, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "UPDATE error_patterns SET \
                 auto_fix_script = ?2, auto_fix_type = ?3, human_approved = 1, \
                 auto_fix_enabled = 1, approved_by = ?4, approved_at = ?5, updated_at = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .map_err(sqlite_err)?;
    stmt.query_row(
        params![pattern_id, fix_script, fix_type.as_str(), approved_by, now],
        map_row,
    )
    .optional()
    .map_err(sqlite_err)?
    .ok_or_else(|| StorageError::NotFound {
        entity: "pattern",
        id: pattern_id.to_string(),
    })
}

/// Applies the mutable-field subset of a delta. Invariant checks happen
/// in the store layer before this runs.
pub fn apply_delta(
    conn: &Connection,
    pattern_id: &str,
    severity: Option<Severity>,
    error_matcher: Option<&str>,
    auto_fix_enabled: Option<bool>,
    now: i64,
) -> Result<ErrorPattern, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "UPDATE error_patterns SET \
                 severity = COALESCE(?2, severity), \
                 error_matcher = COALESCE(?3, error_matcher), \
                 auto_fix_enabled = COALESCE(?4, auto_fix_enabled), \
                 updated_at = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .map_err(sqlite_err)?;
    stmt.query_row(
        params![
            pattern_id,
            severity.map(Severity::as_str),
            error_matcher,
            auto_fix_enabled,
            now
        ],
        map_row,
    )
    .optional()
    .map_err(sqlite_err)?
    .ok_or_else(|| StorageError::NotFound {
        entity: "pattern",
        id: pattern_id.to_string(),
    })
}

/// Rewrites the derived scores after an application was appended.
pub fn update_scores(
    conn: &Connection,
    pattern_id: &str,
    success_rate: f64,
    confidence_score: f64,
    updated_at: i64,
) -> Result<ErrorPattern, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "UPDATE error_patterns SET success_rate = ?2, confidence_score = ?3, updated_at = ?4 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .map_err(sqlite_err)?;
    stmt.query_row(
        params![pattern_id, success_rate, confidence_score, updated_at],
        map_row,
    )
    .optional()
    .map_err(sqlite_err)?
    .ok_or_else(|| StorageError::NotFound {
        entity: "pattern",
        id: pattern_id.to_string(),
    })
}

/// Patterns eligible for clustering: occurrence_count descending with the
/// signature as a stable tie-break, matching the seeding order contract.
pub fn list_for_clustering(
    conn: &Connection,
    min_occurrences: u64,
) -> Result<Vec<ErrorPattern>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM error_patterns WHERE occurrence_count >= ?1 \
             ORDER BY occurrence_count DESC, pattern_signature ASC"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![min_occurrences as i64], map_row)
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

pub fn list_auto_fix_enabled(conn: &Connection) -> Result<Vec<ErrorPattern>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM error_patterns WHERE auto_fix_enabled = 1 \
             ORDER BY pattern_signature ASC"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt.query_map([], map_row).map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

/// Aggregate dashboard statistics across patterns and applications.
pub fn statistics(conn: &Connection) -> Result<PatternStatistics, StorageError> {
    let mut stats = PatternStatistics::empty();
    stats.total_patterns = scalar(conn, "SELECT COUNT(*) FROM error_patterns")?;
    stats.auto_fix_enabled = scalar(
        conn,
        "SELECT COUNT(*) FROM error_patterns WHERE auto_fix_enabled = 1",
    )?;
    stats.human_approved = scalar(
        conn,
        "SELECT COUNT(*) FROM error_patterns WHERE human_approved = 1",
    )?;
    stats.total_applications = scalar(conn, "SELECT COUNT(*) FROM pattern_applications")?;

    let avg: Option<f64> = conn
        .query_row(
            "SELECT AVG(success_rate) FROM error_patterns \
             WHERE id IN (SELECT DISTINCT pattern_id FROM pattern_applications)",
            [],
            |row| row.get(0),
        )
        .map_err(sqlite_err)?;
    stats.avg_success_rate = avg.map(round2).unwrap_or(0.0);

    let mut stmt = conn
        .prepare_cached("SELECT pattern_type, COUNT(*) FROM error_patterns GROUP BY pattern_type")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(sqlite_err)?;
    for row in rows {
        let (pattern_type, count) = row.map_err(sqlite_err)?;
        stats
            .patterns_by_type
            .insert(PatternType::parse_lossy(&pattern_type).as_str().to_string(), count as u64);
    }
    Ok(stats)
}

fn scalar(conn: &Connection, sql: &str) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0)).map_err(sqlite_err)?;
    Ok(count as u64)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ErrorPattern> {
    let pattern_type: String = row.get(2)?;
    let severity: String = row.get(5)?;
    let auto_fix_type: Option<String> = row.get(11)?;
    let incidents_raw: String = row.get(15)?;
    Ok(ErrorPattern {
        id: row.get(0)?,
        pattern_signature: row.get(1)?,
        pattern_type: PatternType::parse_lossy(&pattern_type),
        error_matcher: row.get(3)?,
        error_source: row.get(4)?,
        severity: Severity::parse_lossy(&severity),
        occurrence_count: row.get::<_, i64>(6)? as u64,
        success_rate: row.get(7)?,
        confidence_score: row.get(8)?,
        auto_fix_enabled: row.get(9)?,
        auto_fix_script: row.get(10)?,
        auto_fix_type: auto_fix_type.as_deref().map(FixType::parse_lossy),
        human_approved: row.get(12)?,
        approved_by: row.get(13)?,
        approved_at: row.get(14)?,
        learned_from_incidents: json_column(&incidents_raw, 15)?,
        last_seen: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}
