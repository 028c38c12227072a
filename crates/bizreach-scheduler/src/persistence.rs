//! SQLite-backed snapshot store for companies, methods, and communications.
//! Same contract as the JSON file store; survives restarts and is easier to
//! inspect with standard tooling.

use std::path::Path;

use bizreach_core::error::{ReachError, Result};
use bizreach_core::types::{CommunicationMethod, CommunicationRecord, Company, Snapshot};
use chrono::{DateTime, Utc};

use crate::store::SnapshotStore;

/// SQLite-backed snapshot store.
pub struct SqliteStore {
    conn: rusqlite::Connection,
    location: String,
}

fn db_err(context: &str) -> impl Fn(rusqlite::Error) -> ReachError + '_ {
    move |e| ReachError::Storage(format!("{context}: {e}"))
}

impl SqliteStore {
    /// Open or create the database.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = rusqlite::Connection::open(path).map_err(db_err("DB open"))?;
        let store = Self {
            conn,
            location: path.display().to_string(),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory().map_err(db_err("DB open"))?;
        let store = Self {
            conn,
            location: ":memory:".into(),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Run migrations to create tables.
    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS companies (
                position INTEGER NOT NULL,
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                linkedin_profile TEXT,
                emails TEXT NOT NULL DEFAULT '[\"\"]',        -- JSON array
                phone_numbers TEXT NOT NULL DEFAULT '[\"\"]', -- JSON array
                comments TEXT NOT NULL DEFAULT '',
                communication_periodicity INTEGER NOT NULL,
                last_communication_date TEXT,
                last_communication_sequence INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS communication_methods (
                position INTEGER NOT NULL,
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                sequence INTEGER NOT NULL,
                is_mandatory INTEGER NOT NULL DEFAULT 0
            );

            -- No foreign key: records outlive deleted companies.
            CREATE TABLE IF NOT EXISTS communications (
                position INTEGER NOT NULL,
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                type TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                sequence INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_communications_company
                ON communications(company_id);
         ",
            )
            .map_err(db_err("Migration"))?;
        Ok(())
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, location, linkedin_profile, emails, phone_numbers, comments,
                        communication_periodicity, last_communication_date, last_communication_sequence
                 FROM companies ORDER BY position",
            )
            .map_err(db_err("Load companies"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, u32>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, u32>(9)?,
                ))
            })
            .map_err(db_err("Load companies"))?;

        let mut companies = Vec::new();
        for row in rows {
            let (id, name, location, linkedin, emails, phones, comments, periodicity, last, seq) =
                row.map_err(db_err("Load companies"))?;
            companies.push(Company {
                id,
                name,
                location,
                linkedin_profile: linkedin,
                emails: serde_json::from_str(&emails)?,
                phone_numbers: serde_json::from_str(&phones)?,
                comments,
                communication_periodicity: periodicity,
                last_communication_date: last.as_deref().map(parse_time).transpose()?,
                last_communication_sequence: seq,
            });
        }
        Ok(companies)
    }

    fn load_methods(&self) -> Result<Vec<CommunicationMethod>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, sequence, is_mandatory
                 FROM communication_methods ORDER BY position",
            )
            .map_err(db_err("Load methods"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CommunicationMethod {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    sequence: row.get(3)?,
                    is_mandatory: row.get::<_, i32>(4)? != 0,
                })
            })
            .map_err(db_err("Load methods"))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err("Load methods"))
    }

    fn load_communications(&self) -> Result<Vec<CommunicationRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, company_id, type, timestamp, notes, sequence, created_at
                 FROM communications ORDER BY position",
            )
            .map_err(db_err("Load communications"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(db_err("Load communications"))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, company_id, kind, timestamp, notes, sequence, created_at) =
                row.map_err(db_err("Load communications"))?;
            records.push(CommunicationRecord {
                id,
                company_id,
                kind,
                timestamp: parse_time(&timestamp)?,
                notes,
                sequence,
                created_at: parse_time(&created_at)?,
            });
        }
        Ok(records)
    }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ReachError::Storage(format!("Bad timestamp '{raw}': {e}")))
}

impl SnapshotStore for SqliteStore {
    /// Replace all three tables in one transaction.
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(db_err("Begin save"))?;

        tx.execute_batch(
            "DELETE FROM companies; DELETE FROM communication_methods; DELETE FROM communications;",
        )
        .map_err(db_err("Clear tables"))?;

        for (position, c) in snapshot.companies.iter().enumerate() {
            tx.execute(
                "INSERT INTO companies
                 (position, id, name, location, linkedin_profile, emails, phone_numbers, comments,
                  communication_periodicity, last_communication_date, last_communication_sequence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    position as i64,
                    c.id,
                    c.name,
                    c.location,
                    c.linkedin_profile,
                    serde_json::to_string(&c.emails)?,
                    serde_json::to_string(&c.phone_numbers)?,
                    c.comments,
                    c.communication_periodicity,
                    c.last_communication_date.map(|t| t.to_rfc3339()),
                    c.last_communication_sequence,
                ],
            )
            .map_err(db_err("Save company"))?;
        }

        for (position, m) in snapshot.communication_methods.iter().enumerate() {
            tx.execute(
                "INSERT INTO communication_methods
                 (position, id, name, description, sequence, is_mandatory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    position as i64,
                    m.id,
                    m.name,
                    m.description,
                    m.sequence,
                    m.is_mandatory as i32,
                ],
            )
            .map_err(db_err("Save method"))?;
        }

        for (position, r) in snapshot.communications.iter().enumerate() {
            tx.execute(
                "INSERT INTO communications
                 (position, id, company_id, type, timestamp, notes, sequence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    position as i64,
                    r.id,
                    r.company_id,
                    r.kind,
                    r.timestamp.to_rfc3339(),
                    r.notes,
                    r.sequence,
                    r.created_at.to_rfc3339(),
                ],
            )
            .map_err(db_err("Save communication"))?;
        }

        tx.commit().map_err(db_err("Commit save"))?;
        tracing::debug!("💾 Saved snapshot to {}", self.location);
        Ok(())
    }

    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            companies: self.load_companies()?,
            communication_methods: self.load_methods()?,
            communications: self.load_communications()?,
        })
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}
