//! SQLite store
//!
//! One connection behind a mutex. Foreign keys are enforced, so deleting a
//! reconstruction cascades to every row it owns.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use uuid::Uuid;

use crate::checklist::{
    AcquisitionMethod, CategoryType, CategoryWithItems, ChecklistCategory, ChecklistItem,
    DocumentType, ItemStatus, Priority,
};
use crate::geo::GeoPoint;
use crate::hazard::{ConfidenceLevel, HazardExposure};
use crate::period::DateRange;
use crate::records_request::{RecordsRequest, RecordsRequestType, RequestStatus};
use crate::reference::{HazardType, Severity};
use crate::tracker::{LifecycleStatus, ReconstructionState};

use super::errors::{StoreError, StoreResult};
use super::records::{AssignmentKind, AssignmentRecord, ChecklistMutation, ReconstructionRecord};
use super::ReconstructionStore;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS reconstructions (
        id TEXT PRIMARY KEY,
        seq INTEGER NOT NULL,
        profile TEXT NOT NULL,
        veteran_name TEXT,
        occupational TEXT NOT NULL,
        total_documents INTEGER NOT NULL,
        completed_documents INTEGER NOT NULL,
        missing_documents INTEGER NOT NULL,
        requested_documents INTEGER NOT NULL,
        rejected_documents INTEGER NOT NULL,
        outstanding_requestable INTEGER NOT NULL,
        completion_percentage INTEGER NOT NULL,
        ready INTEGER NOT NULL,
        lifecycle TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY,
        reconstruction_id TEXT NOT NULL,
        category_type TEXT NOT NULL,
        name TEXT NOT NULL,
        priority TEXT NOT NULL,
        position INTEGER NOT NULL,
        total_items INTEGER NOT NULL,
        completed_items INTEGER NOT NULL,
        completion_percentage INTEGER NOT NULL,
        FOREIGN KEY (reconstruction_id) REFERENCES reconstructions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        category_id TEXT NOT NULL,
        reconstruction_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        document_name TEXT NOT NULL,
        document_type TEXT NOT NULL,
        source TEXT NOT NULL,
        acquisition_method TEXT NOT NULL,
        priority TEXT NOT NULL,
        required INTEGER NOT NULL,
        tag TEXT,
        status TEXT NOT NULL,
        file_ref TEXT,
        notes TEXT,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE,
        FOREIGN KEY (reconstruction_id) REFERENCES reconstructions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS assignments (
        id TEXT PRIMARY KEY,
        seq INTEGER NOT NULL,
        reconstruction_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        name TEXT NOT NULL,
        latitude REAL,
        longitude REAL,
        address TEXT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        reference_version TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (reconstruction_id) REFERENCES reconstructions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS exposures (
        assignment_id TEXT NOT NULL,
        ordinal INTEGER NOT NULL,
        hazard_type TEXT NOT NULL,
        reference_id TEXT NOT NULL,
        source_name TEXT NOT NULL,
        distance_m REAL NOT NULL,
        exposure_days INTEGER NOT NULL,
        severity TEXT NOT NULL,
        presumptive INTEGER NOT NULL,
        program_covered INTEGER NOT NULL,
        confidence TEXT NOT NULL,
        citation TEXT NOT NULL,
        PRIMARY KEY (assignment_id, ordinal),
        FOREIGN KEY (assignment_id) REFERENCES assignments(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS records_requests (
        id TEXT PRIMARY KEY,
        seq INTEGER NOT NULL,
        reconstruction_id TEXT NOT NULL,
        request_type TEXT NOT NULL,
        documents TEXT NOT NULL,
        veteran TEXT NOT NULL,
        form_artifact_ref TEXT NOT NULL,
        expected_response_date TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (reconstruction_id) REFERENCES reconstructions(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_categories_reconstruction
    ON categories(reconstruction_id, position);

    CREATE INDEX IF NOT EXISTS idx_items_category
    ON items(category_id, position);

    CREATE INDEX IF NOT EXISTS idx_items_reconstruction
    ON items(reconstruction_id);

    CREATE INDEX IF NOT EXISTS idx_assignments_reconstruction
    ON assignments(reconstruction_id, seq);

    CREATE INDEX IF NOT EXISTS idx_requests_reconstruction
    ON records_requests(reconstruction_id, seq);
";

const ITEM_COLUMNS: &str = "i.id, i.category_id, i.reconstruction_id, i.position, i.document_name, \
     i.document_type, i.source, i.acquisition_method, i.priority, i.required, i.tag, i.status, \
     i.file_ref, i.notes, i.updated_at";

const ASSIGNMENT_COLUMNS: &str = "id, reconstruction_id, kind, name, latitude, longitude, \
     address, start_date, end_date, reference_version, created_at, updated_at";

const REQUEST_COLUMNS: &str = "id, reconstruction_id, request_type, documents, veteran, \
     form_artifact_ref, expected_response_date, status, created_at, updated_at";

/// SQLite-backed reconstruction store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store database at `path`
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Backend(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        Self::initialize(conn, true)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?, false)
    }

    fn initialize(conn: Connection, on_disk: bool) -> StoreResult<Self> {
        if on_disk {
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;
        }
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }
}

// ============================================================================
// Column codecs
// ============================================================================

fn conversion_error(idx: usize, reason: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, reason.into())
}

fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::from_str(&raw).map_err(|e| conversion_error(idx, e.to_string()))
}

fn enum_at<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_error(idx, format!("unknown value '{}'", raw)))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_error(idx, e.to_string()))
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e.to_string()))
}

fn json_at<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e.to_string()))
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<ChecklistCategory> {
    Ok(ChecklistCategory {
        id: uuid_at(row, 0)?,
        reconstruction_id: uuid_at(row, 1)?,
        category_type: enum_at(row, 2, CategoryType::parse)?,
        name: row.get(3)?,
        priority: enum_at(row, 4, Priority::parse)?,
        position: row.get(5)?,
        total_items: row.get(6)?,
        completed_items: row.get(7)?,
        completion_percentage: row.get(8)?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ChecklistItem> {
    Ok(ChecklistItem {
        id: uuid_at(row, 0)?,
        category_id: uuid_at(row, 1)?,
        reconstruction_id: uuid_at(row, 2)?,
        position: row.get(3)?,
        document_name: row.get(4)?,
        document_type: enum_at(row, 5, DocumentType::parse)?,
        source: row.get(6)?,
        acquisition_method: enum_at(row, 7, AcquisitionMethod::parse)?,
        priority: enum_at(row, 8, Priority::parse)?,
        required: row.get(9)?,
        tag: row.get(10)?,
        status: enum_at(row, 11, ItemStatus::parse)?,
        file_ref: row.get(12)?,
        notes: row.get(13)?,
        updated_at: timestamp_at(row, 14)?,
    })
}

fn exposure_from_row(row: &Row<'_>) -> rusqlite::Result<HazardExposure> {
    Ok(HazardExposure {
        hazard_type: enum_at(row, 0, HazardType::parse)?,
        reference_id: row.get(1)?,
        source_name: row.get(2)?,
        distance_m: row.get(3)?,
        exposure_days: row.get(4)?,
        severity: enum_at(row, 5, Severity::parse)?,
        presumptive: row.get(6)?,
        program_covered: row.get(7)?,
        confidence: enum_at(row, 8, ConfidenceLevel::parse)?,
        citation: row.get(9)?,
    })
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<AssignmentRecord> {
    let latitude: Option<f64> = row.get(4)?;
    let longitude: Option<f64> = row.get(5)?;
    Ok(AssignmentRecord {
        id: uuid_at(row, 0)?,
        reconstruction_id: uuid_at(row, 1)?,
        kind: enum_at(row, 2, AssignmentKind::parse)?,
        name: row.get(3)?,
        location: latitude.zip(longitude).map(|(lat, lon)| GeoPoint::new(lat, lon)),
        address: row.get(6)?,
        period: DateRange::new(date_at(row, 7)?, date_at(row, 8)?),
        exposures: Vec::new(),
        reference_version: row.get(9)?,
        created_at: timestamp_at(row, 10)?,
        updated_at: timestamp_at(row, 11)?,
    })
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<RecordsRequest> {
    Ok(RecordsRequest {
        id: uuid_at(row, 0)?,
        reconstruction_id: uuid_at(row, 1)?,
        request_type: enum_at(row, 2, RecordsRequestType::parse)?,
        documents: json_at(row, 3)?,
        veteran: json_at(row, 4)?,
        form_artifact_ref: row.get(5)?,
        expected_response_date: date_at(row, 6)?,
        status: enum_at(row, 7, RequestStatus::parse)?,
        created_at: timestamp_at(row, 8)?,
        updated_at: timestamp_at(row, 9)?,
    })
}

// ============================================================================
// Row writers
// ============================================================================

fn next_seq(tx: &Transaction<'_>, table: &str) -> StoreResult<i64> {
    let sql = format!("SELECT COALESCE(MAX(seq), 0) + 1 FROM {}", table);
    Ok(tx.query_row(&sql, [], |row| row.get(0))?)
}

fn write_state(tx: &Transaction<'_>, id: &Uuid, state: &ReconstructionState) -> StoreResult<usize> {
    Ok(tx.execute(
        "UPDATE reconstructions SET
            total_documents = ?2, completed_documents = ?3, missing_documents = ?4,
            requested_documents = ?5, rejected_documents = ?6, outstanding_requestable = ?7,
            completion_percentage = ?8, ready = ?9, lifecycle = ?10, updated_at = ?11
         WHERE id = ?1",
        params![
            id.to_string(),
            state.total_documents,
            state.completed_documents,
            state.missing_documents,
            state.requested_documents,
            state.rejected_documents,
            state.outstanding_requestable,
            state.completion_percentage,
            state.ready,
            state.lifecycle.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )?)
}

fn write_root(tx: &Transaction<'_>, record: &ReconstructionRecord) -> StoreResult<()> {
    let changed = tx.execute(
        "UPDATE reconstructions SET profile = ?2, veteran_name = ?3, occupational = ?4
         WHERE id = ?1",
        params![
            record.id.to_string(),
            serde_json::to_string(&record.profile)?,
            record.veteran_name,
            serde_json::to_string(&record.occupational_exposures)?,
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("reconstruction", record.id));
    }
    write_state(tx, &record.id, &record.state)?;
    Ok(())
}

fn insert_checklist(tx: &Transaction<'_>, checklist: &[CategoryWithItems]) -> StoreResult<()> {
    for entry in checklist {
        let c = &entry.category;
        tx.execute(
            "INSERT INTO categories (id, reconstruction_id, category_type, name, priority,
                position, total_items, completed_items, completion_percentage)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                c.id.to_string(),
                c.reconstruction_id.to_string(),
                c.category_type.as_str(),
                c.name,
                c.priority.as_str(),
                c.position,
                c.total_items,
                c.completed_items,
                c.completion_percentage,
            ],
        )?;
        for item in &entry.items {
            tx.execute(
                "INSERT INTO items (id, category_id, reconstruction_id, position, document_name,
                    document_type, source, acquisition_method, priority, required, tag, status,
                    file_ref, notes, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    item.id.to_string(),
                    item.category_id.to_string(),
                    item.reconstruction_id.to_string(),
                    item.position,
                    item.document_name,
                    item.document_type.as_str(),
                    item.source,
                    item.acquisition_method.as_str(),
                    item.priority.as_str(),
                    item.required,
                    item.tag,
                    item.status.as_str(),
                    item.file_ref,
                    item.notes,
                    item.updated_at.to_rfc3339(),
                ],
            )?;
        }
    }
    Ok(())
}

fn apply_mutation(tx: &Transaction<'_>, mutation: &ChecklistMutation<'_>) -> StoreResult<()> {
    for c in mutation.categories {
        let changed = tx.execute(
            "UPDATE categories SET total_items = ?2, completed_items = ?3,
                completion_percentage = ?4
             WHERE id = ?1",
            params![
                c.id.to_string(),
                c.total_items,
                c.completed_items,
                c.completion_percentage
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("category", c.id));
        }
    }
    for item in mutation.items {
        let changed = tx.execute(
            "UPDATE items SET status = ?2, file_ref = ?3, notes = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                item.id.to_string(),
                item.status.as_str(),
                item.file_ref,
                item.notes,
                item.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("item", item.id));
        }
    }
    if write_state(tx, &mutation.reconstruction_id, mutation.state)? == 0 {
        return Err(StoreError::not_found(
            "reconstruction",
            mutation.reconstruction_id,
        ));
    }
    Ok(())
}

fn insert_exposures(
    tx: &Transaction<'_>,
    assignment_id: &Uuid,
    exposures: &[HazardExposure],
) -> StoreResult<()> {
    for (ordinal, e) in exposures.iter().enumerate() {
        tx.execute(
            "INSERT INTO exposures (assignment_id, ordinal, hazard_type, reference_id,
                source_name, distance_m, exposure_days, severity, presumptive,
                program_covered, confidence, citation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                assignment_id.to_string(),
                ordinal as i64,
                e.hazard_type.as_str(),
                e.reference_id,
                e.source_name,
                e.distance_m,
                e.exposure_days,
                e.severity.as_str(),
                e.presumptive,
                e.program_covered,
                e.confidence.as_str(),
                e.citation,
            ],
        )?;
    }
    Ok(())
}

fn load_exposures(conn: &Connection, assignment_id: &Uuid) -> StoreResult<Vec<HazardExposure>> {
    let mut stmt = conn.prepare(
        "SELECT hazard_type, reference_id, source_name, distance_m, exposure_days, severity,
            presumptive, program_covered, confidence, citation
         FROM exposures WHERE assignment_id = ?1 ORDER BY ordinal",
    )?;
    let rows = stmt.query_map(params![assignment_id.to_string()], exposure_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn require_reconstruction(conn: &Connection, id: &Uuid) -> StoreResult<()> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM reconstructions WHERE id = ?1",
            params![id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    exists.ok_or_else(|| StoreError::not_found("reconstruction", id))
}

// ============================================================================
// Store implementation
// ============================================================================

impl ReconstructionStore for SqliteStore {
    fn create_reconstruction(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let seq = next_seq(&tx, "reconstructions")?;
        let state = &record.state;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO reconstructions (id, seq, profile, veteran_name, occupational,
                total_documents, completed_documents, missing_documents, requested_documents,
                rejected_documents, outstanding_requestable, completion_percentage, ready,
                lifecycle, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                record.id.to_string(),
                seq,
                serde_json::to_string(&record.profile)?,
                record.veteran_name,
                serde_json::to_string(&record.occupational_exposures)?,
                state.total_documents,
                state.completed_documents,
                state.missing_documents,
                state.requested_documents,
                state.rejected_documents,
                state.outstanding_requestable,
                state.completion_percentage,
                state.ready,
                state.lifecycle.as_str(),
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        if inserted == 0 {
            return Err(StoreError::AlreadyExists {
                kind: "reconstruction",
                id: record.id.to_string(),
            });
        }
        insert_checklist(&tx, checklist)?;
        tx.commit()?;
        Ok(())
    }

    fn get_reconstruction(&self, id: &Uuid) -> StoreResult<ReconstructionRecord> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, profile, veteran_name, occupational, total_documents,
                completed_documents, missing_documents, requested_documents, rejected_documents,
                outstanding_requestable, completion_percentage, ready, lifecycle, created_at,
                updated_at
             FROM reconstructions WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok(ReconstructionRecord {
                    id: uuid_at(row, 0)?,
                    profile: json_at(row, 1)?,
                    veteran_name: row.get(2)?,
                    occupational_exposures: json_at(row, 3)?,
                    state: ReconstructionState {
                        total_documents: row.get(4)?,
                        completed_documents: row.get(5)?,
                        missing_documents: row.get(6)?,
                        requested_documents: row.get(7)?,
                        rejected_documents: row.get(8)?,
                        outstanding_requestable: row.get(9)?,
                        completion_percentage: row.get(10)?,
                        ready: row.get(11)?,
                        lifecycle: enum_at(row, 12, LifecycleStatus::parse)?,
                    },
                    created_at: timestamp_at(row, 13)?,
                    updated_at: timestamp_at(row, 14)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("reconstruction", id))
    }

    fn list_reconstructions(&self) -> StoreResult<Vec<Uuid>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id FROM reconstructions ORDER BY seq")?;
        let rows = stmt.query_map([], |row| uuid_at(row, 0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn categories(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistCategory>> {
        let conn = self.conn()?;
        require_reconstruction(&conn, reconstruction_id)?;
        let mut stmt = conn.prepare(
            "SELECT id, reconstruction_id, category_type, name, priority, position,
                total_items, completed_items, completion_percentage
             FROM categories WHERE reconstruction_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![reconstruction_id.to_string()], category_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn items(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistItem>> {
        let conn = self.conn()?;
        require_reconstruction(&conn, reconstruction_id)?;
        let sql = format!(
            "SELECT {} FROM items i JOIN categories c ON c.id = i.category_id
             WHERE i.reconstruction_id = ?1 ORDER BY c.position, i.position",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![reconstruction_id.to_string()], item_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_item(&self, item_id: &Uuid) -> StoreResult<ChecklistItem> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM items i WHERE i.id = ?1", ITEM_COLUMNS);
        conn.query_row(&sql, params![item_id.to_string()], item_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("item", item_id))
    }

    fn commit_mutation(&self, mutation: &ChecklistMutation<'_>) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        apply_mutation(&tx, mutation)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_checklist(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_root(&tx, record)?;
        tx.execute(
            "DELETE FROM categories WHERE reconstruction_id = ?1",
            params![record.id.to_string()],
        )?;
        insert_checklist(&tx, checklist)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_assignment(&self, assignment: &AssignmentRecord) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        require_reconstruction(&tx, &assignment.reconstruction_id)?;
        let seq = next_seq(&tx, "assignments")?;
        tx.execute(
            "INSERT INTO assignments (id, seq, reconstruction_id, kind, name, latitude,
                longitude, address, start_date, end_date, reference_version, created_at,
                updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                assignment.id.to_string(),
                seq,
                assignment.reconstruction_id.to_string(),
                assignment.kind.as_str(),
                assignment.name,
                assignment.location.map(|p| p.latitude),
                assignment.location.map(|p| p.longitude),
                assignment.address,
                assignment.period.start.to_string(),
                assignment.period.end.to_string(),
                assignment.reference_version,
                assignment.created_at.to_rfc3339(),
                assignment.updated_at.to_rfc3339(),
            ],
        )?;
        insert_exposures(&tx, &assignment.id, &assignment.exposures)?;
        tx.commit()?;
        Ok(())
    }

    fn get_assignment(&self, id: &Uuid) -> StoreResult<AssignmentRecord> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM assignments WHERE id = ?1", ASSIGNMENT_COLUMNS);
        let mut assignment = conn
            .query_row(&sql, params![id.to_string()], assignment_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("assignment", id))?;
        assignment.exposures = load_exposures(&conn, id)?;
        Ok(assignment)
    }

    fn assignments(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<AssignmentRecord>> {
        let conn = self.conn()?;
        require_reconstruction(&conn, reconstruction_id)?;
        let sql = format!(
            "SELECT {} FROM assignments WHERE reconstruction_id = ?1 ORDER BY seq",
            ASSIGNMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![reconstruction_id.to_string()], assignment_from_row)?;
        let mut out = rows.collect::<Result<Vec<_>, _>>()?;
        for assignment in &mut out {
            assignment.exposures = load_exposures(&conn, &assignment.id)?;
        }
        Ok(out)
    }

    fn replace_exposures(
        &self,
        assignment_id: &Uuid,
        exposures: &[HazardExposure],
        reference_version: &str,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE assignments SET reference_version = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                assignment_id.to_string(),
                reference_version,
                Utc::now().to_rfc3339()
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("assignment", assignment_id));
        }
        tx.execute(
            "DELETE FROM exposures WHERE assignment_id = ?1",
            params![assignment_id.to_string()],
        )?;
        insert_exposures(&tx, assignment_id, exposures)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_request(
        &self,
        request: &RecordsRequest,
        mutation: Option<&ChecklistMutation<'_>>,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        require_reconstruction(&tx, &request.reconstruction_id)?;
        if let Some(mutation) = mutation {
            apply_mutation(&tx, mutation)?;
        }
        let seq = next_seq(&tx, "records_requests")?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO records_requests (id, seq, reconstruction_id, request_type,
                documents, veteran, form_artifact_ref, expected_response_date, status,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                request.id.to_string(),
                seq,
                request.reconstruction_id.to_string(),
                request.request_type.as_str(),
                serde_json::to_string(&request.documents)?,
                serde_json::to_string(&request.veteran)?,
                request.form_artifact_ref,
                request.expected_response_date.to_string(),
                request.status.as_str(),
                request.created_at.to_rfc3339(),
                request.updated_at.to_rfc3339(),
            ],
        )?;
        if inserted == 0 {
            return Err(StoreError::AlreadyExists {
                kind: "records request",
                id: request.id.to_string(),
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn get_request(&self, id: &Uuid) -> StoreResult<RecordsRequest> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM records_requests WHERE id = ?1", REQUEST_COLUMNS);
        conn.query_row(&sql, params![id.to_string()], request_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("records request", id))
    }

    fn update_request(&self, request: &RecordsRequest) -> StoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE records_requests SET form_artifact_ref = ?2, expected_response_date = ?3,
                status = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                request.id.to_string(),
                request.form_artifact_ref,
                request.expected_response_date.to_string(),
                request.status.as_str(),
                request.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("records request", request.id));
        }
        Ok(())
    }

    fn requests(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<RecordsRequest>> {
        let conn = self.conn()?;
        require_reconstruction(&conn, reconstruction_id)?;
        let sql = format!(
            "SELECT {} FROM records_requests WHERE reconstruction_id = ?1 ORDER BY seq",
            REQUEST_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![reconstruction_id.to_string()], request_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_enabled() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.conn().unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }

    #[test]
    fn test_unknown_reconstruction_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.get_reconstruction(&Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), "VREC_STORE_NOT_FOUND");
        assert!(store.categories(&Uuid::new_v4()).is_err());
    }
}
