//! Entity Registry
//!
//! Readable collection of known product/vendor records, backed by the
//! `entity_registry` table. Iteration order is the table's insertion
//! (rowid) order; the matcher's first-match-wins tie-break depends on
//! this order being stable.

use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use crate::models::entity::Entity;
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// Registry service over the entity table.
#[derive(Clone)]
pub struct EntityRegistry {
    db: Database,
}

impl EntityRegistry {
    /// Create a registry over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load all entities in insertion order.
    pub fn load(&self) -> AppResult<Vec<Entity>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entity_id, name, aliases, cache_id
             FROM entity_registry
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut entities = Vec::new();
        for row in rows {
            let (id, name, aliases_json, cache_id) = row?;
            let aliases: Vec<String> = serde_json::from_str(&aliases_json).unwrap_or_default();
            entities.push(Entity {
                id,
                name,
                aliases,
                cache_id,
            });
        }
        Ok(entities)
    }

    /// Add an entity to the registry. The id is generated when empty.
    pub fn add(&self, mut entity: Entity) -> AppResult<Entity> {
        if entity.id.trim().is_empty() {
            entity.id = Uuid::new_v4().to_string();
        }
        if entity.name.trim().is_empty() {
            return Err(AppError::invalid_input("entity name must not be empty"));
        }

        let aliases_json = serde_json::to_string(&entity.aliases)?;
        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO entity_registry (entity_id, name, aliases, cache_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity.id,
                entity.name,
                aliases_json,
                entity.cache_id,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(entity)
    }
}
