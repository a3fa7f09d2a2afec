//! V001: initial schema — patterns, applications, incidents, clusters,
//! deployments, rollback events, snapshots.

pub const MIGRATION_SQL: &str = r#"
-- Learned error patterns, keyed by their deterministic signature.
CREATE TABLE IF NOT EXISTS error_patterns (
    id TEXT PRIMARY KEY,
    pattern_signature TEXT NOT NULL UNIQUE,
    pattern_type TEXT NOT NULL,
    error_matcher TEXT NOT NULL,
    error_source TEXT NOT NULL,
    severity TEXT NOT NULL,
    occurrence_count INTEGER NOT NULL DEFAULT 1,
    success_rate REAL NOT NULL DEFAULT 0.0,
    confidence_score REAL NOT NULL DEFAULT 0.5,
    auto_fix_enabled INTEGER NOT NULL DEFAULT 0,
    auto_fix_script TEXT,
    auto_fix_type TEXT,
    human_approved INTEGER NOT NULL DEFAULT 0,
    approved_by TEXT,
    approved_at INTEGER,
    learned_from_incidents TEXT NOT NULL DEFAULT '[]',
    last_seen INTEGER NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    updated_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_error_patterns_type ON error_patterns(pattern_type);
CREATE INDEX IF NOT EXISTS idx_error_patterns_occurrences ON error_patterns(occurrence_count DESC);
CREATE INDEX IF NOT EXISTS idx_error_patterns_enabled ON error_patterns(auto_fix_enabled)
    WHERE auto_fix_enabled = 1;

-- Append-only fix application history.
CREATE TABLE IF NOT EXISTS pattern_applications (
    id TEXT PRIMARY KEY,
    pattern_id TEXT NOT NULL REFERENCES error_patterns(id),
    incident_id TEXT,
    success INTEGER NOT NULL,
    execution_time_ms INTEGER NOT NULL,
    fix_script TEXT,
    decision TEXT,
    applied_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_pattern_applications_pattern ON pattern_applications(pattern_id);

-- Incident log backing the trailing error window.
CREATE TABLE IF NOT EXISTS incidents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    incident_id TEXT,
    error_source TEXT NOT NULL,
    severity TEXT NOT NULL,
    seen_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_incidents_seen ON incidents(seen_at);

-- Advisory clusters, replaced wholesale on every rebuild.
CREATE TABLE IF NOT EXISTS pattern_clusters (
    cluster_index INTEGER PRIMARY KEY,
    pattern_ids TEXT NOT NULL,
    size INTEGER NOT NULL,
    avg_success_rate REAL NOT NULL,
    total_occurrences INTEGER NOT NULL,
    centroid TEXT NOT NULL,
    generated_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

-- Deployment registry.
CREATE TABLE IF NOT EXISTS deployments (
    id TEXT PRIMARY KEY,
    version TEXT NOT NULL,
    environment TEXT NOT NULL,
    status TEXT NOT NULL,
    health_check_passed INTEGER NOT NULL DEFAULT 0,
    deployed_at INTEGER NOT NULL,
    rolled_back_at INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_deployments_env_time ON deployments(environment, deployed_at DESC);

-- Audited rollback events with their ordered step logs.
CREATE TABLE IF NOT EXISTS rollback_events (
    id TEXT PRIMARY KEY,
    deployment_id TEXT NOT NULL,
    target_deployment_id TEXT,
    trigger_type TEXT NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL,
    steps TEXT NOT NULL DEFAULT '[]',
    pre_snapshot_id TEXT,
    post_snapshot_id TEXT,
    error TEXT,
    initiated_by TEXT,
    initiated_at INTEGER NOT NULL DEFAULT (unixepoch()),
    completed_at INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_rollback_events_initiated ON rollback_events(initiated_at DESC);
CREATE INDEX IF NOT EXISTS idx_rollback_events_deployment ON rollback_events(deployment_id);

-- Pre/post rollback snapshots for the audit trail.
CREATE TABLE IF NOT EXISTS system_snapshots (
    id TEXT PRIMARY KEY,
    deployment_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    summary TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_system_snapshots_deployment ON system_snapshots(deployment_id);
"#;
