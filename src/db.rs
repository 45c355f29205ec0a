use crate::translation::{convert_to_hash, EntityTranslations, EntityType, MachineTranslation};
use crate::voiceover::{EntityVoiceovers, LanguageCodesMapping};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Length of the source-text hash in machine translation ids.
const MACHINE_TRANSLATION_HASH_LENGTH: usize = 64;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

fn decode<T: DeserializeOwned>(kind: &str, id: &str, data: &str) -> Result<T> {
    serde_json::from_str(data).with_context(|| format!("Corrupt {} record {}", kind, id))
}

impl Database {
    /// Open (or create) the database and make sure every table exists
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entity_translations (
                id TEXT PRIMARY KEY,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                entity_version INTEGER NOT NULL,
                language_code TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_entity_translations_entity
                ON entity_translations (entity_type, entity_id, entity_version);

            CREATE TABLE IF NOT EXISTS machine_translations (
                id TEXT PRIMARY KEY,
                source_language_code TEXT NOT NULL,
                target_language_code TEXT NOT NULL,
                source_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entity_voiceovers (
                id TEXT PRIMARY KEY,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                entity_version INTEGER NOT NULL,
                language_accent_code TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS voiceover_policy (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                language_codes_mapping TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );",
        )
        .context("Failed to create tables")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock was poisoned"))
    }

    // ==================== Entity Translations ====================

    /// Persist a new, empty translations record. Fails if it already exists.
    pub fn create_entity_translations(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
        language_code: &str,
    ) -> Result<EntityTranslations> {
        let record =
            EntityTranslations::create_empty(entity_type, entity_id, entity_version, language_code);
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO entity_translations
                (id, entity_type, entity_id, entity_version, language_code, data, created_at, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                record.id(),
                entity_type.as_str(),
                entity_id,
                entity_version,
                language_code,
                serde_json::to_string(&record)?,
                now
            ],
        )
        .with_context(|| format!("Failed to create entity translations {}", record.id()))?;
        Ok(record)
    }

    pub fn get_entity_translations(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
        language_code: &str,
    ) -> Result<Option<EntityTranslations>> {
        let id = EntityTranslations::generate_id(entity_type, entity_id, entity_version, language_code);
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM entity_translations WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|data| decode("entity translations", &id, &data))
            .transpose()
    }

    /// Every language's record for one entity version, ordered by language code.
    pub fn get_all_entity_translations_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
    ) -> Result<Vec<EntityTranslations>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, data FROM entity_translations
             WHERE entity_type = ?1 AND entity_id = ?2 AND entity_version = ?3
             ORDER BY language_code",
        )?;
        let rows = stmt
            .query_map(params![entity_type.as_str(), entity_id, entity_version], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(id, data)| decode("entity translations", id, data))
            .collect()
    }

    /// Insert or overwrite a record, keeping its original creation time.
    pub fn put_entity_translations(&self, record: &EntityTranslations) -> Result<()> {
        self.put_multi_entity_translations(std::slice::from_ref(record))
    }

    /// Insert or overwrite several records in one transaction.
    pub fn put_multi_entity_translations(&self, records: &[EntityTranslations]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for record in records {
            tx.execute(
                "INSERT INTO entity_translations
                    (id, entity_type, entity_id, entity_version, language_code, data, created_at, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    data = excluded.data,
                    last_updated = excluded.last_updated",
                params![
                    record.id(),
                    record.entity_type.as_str(),
                    record.entity_id,
                    record.entity_version,
                    record.language_code,
                    serde_json::to_string(record)?,
                    now
                ],
            )
            .with_context(|| format!("Failed to save entity translations {}", record.id()))?;
        }
        tx.commit().context("Failed to commit entity translations")?;
        debug!("Saved {} entity translations record(s)", records.len());
        Ok(())
    }

    // ==================== Machine Translations ====================

    /// `[source_language_code].[target_language_code].[hash of source_text]`
    pub fn machine_translation_id(
        source_language_code: &str,
        target_language_code: &str,
        source_text: &str,
    ) -> String {
        format!(
            "{}.{}.{}",
            source_language_code,
            target_language_code,
            convert_to_hash(source_text, MACHINE_TRANSLATION_HASH_LENGTH)
        )
    }

    /// Store a machine translation, returning its id. Nothing is stored, and
    /// `None` returned, when source and target languages are equal.
    pub fn create_machine_translation(
        &self,
        source_language_code: &str,
        target_language_code: &str,
        source_text: &str,
        translated_text: &str,
    ) -> Result<Option<String>> {
        if source_language_code == target_language_code {
            return Ok(None);
        }
        let id = Self::machine_translation_id(source_language_code, target_language_code, source_text);
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO machine_translations
                (id, source_language_code, target_language_code, source_text, translated_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET translated_text = excluded.translated_text",
            params![
                id,
                source_language_code,
                target_language_code,
                source_text,
                translated_text,
                Utc::now().to_rfc3339()
            ],
        )
        .context("Failed to save machine translation")?;
        Ok(Some(id))
    }

    pub fn get_machine_translation(
        &self,
        source_language_code: &str,
        target_language_code: &str,
        source_text: &str,
    ) -> Result<Option<MachineTranslation>> {
        let id = Self::machine_translation_id(source_language_code, target_language_code, source_text);
        let conn = self.conn()?;
        let translation = conn
            .query_row(
                "SELECT source_language_code, target_language_code, source_text, translated_text
                 FROM machine_translations WHERE id = ?1",
                params![id],
                |row| {
                    Ok(MachineTranslation {
                        source_language_code: row.get(0)?,
                        target_language_code: row.get(1)?,
                        source_text: row.get(2)?,
                        translated_text: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(translation)
    }

    // ==================== Entity Voiceovers ====================

    pub fn get_entity_voiceovers(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
        language_accent_code: &str,
    ) -> Result<Option<EntityVoiceovers>> {
        let id =
            EntityVoiceovers::generate_id(entity_type, entity_id, entity_version, language_accent_code);
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM entity_voiceovers WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|data| decode("entity voiceovers", &id, &data))
            .transpose()
    }

    pub fn get_all_entity_voiceovers_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        entity_version: u32,
    ) -> Result<Vec<EntityVoiceovers>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, data FROM entity_voiceovers
             WHERE entity_type = ?1 AND entity_id = ?2 AND entity_version = ?3
             ORDER BY language_accent_code",
        )?;
        let rows = stmt
            .query_map(params![entity_type.as_str(), entity_id, entity_version], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(id, data)| decode("entity voiceovers", id, data))
            .collect()
    }

    pub fn put_entity_voiceovers(&self, record: &EntityVoiceovers) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO entity_voiceovers
                (id, entity_type, entity_id, entity_version, language_accent_code, data, created_at, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                last_updated = excluded.last_updated",
            params![
                record.id(),
                record.entity_type.as_str(),
                record.entity_id,
                record.entity_version,
                record.language_accent_code,
                serde_json::to_string(record)?,
                Utc::now().to_rfc3339()
            ],
        )
        .with_context(|| format!("Failed to save entity voiceovers {}", record.id()))?;
        Ok(())
    }

    // ==================== Voiceover Policy ====================

    /// The stored language-accent codes mapping, empty if never set.
    pub fn get_language_codes_mapping(&self) -> Result<LanguageCodesMapping> {
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT language_codes_mapping FROM voiceover_policy WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(data) => decode("voiceover policy", "1", &data),
            None => Ok(LanguageCodesMapping::new()),
        }
    }

    pub fn put_language_codes_mapping(&self, mapping: &LanguageCodesMapping) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO voiceover_policy (id, language_codes_mapping, last_updated)
             VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                language_codes_mapping = excluded.language_codes_mapping,
                last_updated = excluded.last_updated",
            params![serde_json::to_string(mapping)?, Utc::now().to_rfc3339()],
        )
        .context("Failed to save language codes mapping")?;
        Ok(())
    }
}
