//! SQL schema for the stash SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Assets carry no foreign key to an owning record — liveness is decided by
/// caller keep-lists at GC time, so the table stands alone. The origin
/// union is flattened into nullable columns discriminated by `origin_type`;
/// a row populates only the columns of its variant.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS assets (
    asset_id              TEXT PRIMARY KEY,
    asset_type            TEXT NOT NULL,   -- 'IMAGE' | 'AUDIO'
    label                 TEXT NOT NULL,
    mime_type             TEXT NOT NULL,
    base64                TEXT NOT NULL,   -- opaque payload, never inspected
    origin_type           TEXT NOT NULL,   -- 'user' | 'generated'
    origin_source         TEXT NOT NULL,
    origin_media          TEXT,            -- user origin only
    origin_url            TEXT,
    origin_file_name      TEXT,
    origin_generator_name TEXT,            -- generated origin only
    origin_prompt         TEXT,
    origin_parameters     TEXT,            -- JSON
    origin_generated_at   TEXT,
    metadata              TEXT NOT NULL,   -- JSON, shape depends on asset_type
    cache                 TEXT NOT NULL DEFAULT '{}',
    context_id            TEXT NOT NULL,
    scope_id              TEXT NOT NULL,
    created_at            TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at            TEXT NOT NULL
);

-- The two list shapes: by type, and by (context, scope, type). Both read
-- newest-first, so created_at rides along in each index.
CREATE INDEX IF NOT EXISTS assets_type_idx
    ON assets(asset_type, created_at);
CREATE INDEX IF NOT EXISTS assets_scope_idx
    ON assets(context_id, scope_id, asset_type, created_at);

PRAGMA user_version = 1;
";
