/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{
    Frequency, Habit, HabitId, HabitStore, HabitType, Mark, UserTag, DATE_FORMAT,
};
use crate::storage::{migrations, HabitStorage, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a throwaway in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Load every record, grouped by habit id
    fn load_completions(&self) -> Result<HashMap<u32, BTreeMap<NaiveDate, Mark>>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT habit_id, date, status FROM completions ORDER BY habit_id, date")?;

        let rows = stmt.query_map([], |row| {
            let habit_id: u32 = row.get(0)?;
            let date_str: String = row.get(1)?;
            let date = parse_column(1, &date_str, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))?;
            let status_str: String = row.get(2)?;
            let mark = parse_column(2, &status_str, Mark::from_str)?;
            Ok((habit_id, date, mark))
        })?;

        let mut grouped: HashMap<u32, BTreeMap<NaiveDate, Mark>> = HashMap::new();
        for row in rows {
            let (habit_id, date, mark) = row?;
            grouped.entry(habit_id).or_default().insert(date, mark);
        }
        Ok(grouped)
    }

    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut completions = self.load_completions()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, habit_type, frequency, streak, created_at
             FROM habits ORDER BY position, id",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: u32 = row.get(0)?;

            let habit_type_str: String = row.get(3)?;
            let habit_type = parse_column(3, &habit_type_str, HabitType::from_str)?;

            let frequency_str: String = row.get(4)?;
            let frequency = parse_column(4, &frequency_str, Frequency::from_str)?;

            let created_at_str: String = row.get(6)?;
            let created_at = parse_column(6, &created_at_str, DateTime::parse_from_rfc3339)?
                .with_timezone(&Utc);

            Ok(Habit::from_existing(
                HabitId(id),
                row.get(1)?, // name
                row.get(2)?, // category
                habit_type,
                frequency,
                BTreeMap::new(),
                row.get(5)?, // streak
                created_at,
            ))
        })?;

        let mut habits = Vec::new();
        for habit in rows {
            let mut habit = habit?;
            habit.completions = completions.remove(&habit.id.0).unwrap_or_default();
            habits.push(habit);
        }

        if !completions.is_empty() {
            tracing::warn!(
                "Ignoring records for {} unknown habit ids",
                completions.len()
            );
        }

        Ok(habits)
    }

    fn load_tags(&self) -> Result<Vec<UserTag>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, color_index FROM tags ORDER BY position, name")?;

        let rows = stmt.query_map([], |row| {
            Ok(UserTag {
                name: row.get(0)?,
                color_index: row.get(1)?,
            })
        })?;

        let mut tags = Vec::new();
        for tag in rows {
            tags.push(tag?);
        }
        Ok(tags)
    }
}

/// Parse a text column, reporting failures as a conversion error on that column
fn parse_column<T, E>(
    index: usize,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    parse(value).map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

impl HabitStorage for SqliteStorage {
    fn load_store(&self) -> Result<HabitStore, StorageError> {
        let habits = self.load_habits()?;
        let tags = self.load_tags()?;
        tracing::debug!("Loaded {} habits and {} tags", habits.len(), tags.len());
        Ok(HabitStore::from_parts(habits, tags))
    }

    /// Replace every habit, record and tag in one transaction
    fn save_store(&self, store: &HabitStore) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM completions", [])?;
        tx.execute("DELETE FROM habits", [])?;
        tx.execute("DELETE FROM tags", [])?;

        {
            let mut insert_habit = tx.prepare(
                "INSERT INTO habits (
                    id, name, category, habit_type, frequency, streak, position, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            let mut insert_completion = tx.prepare(
                "INSERT INTO completions (habit_id, date, status) VALUES (?1, ?2, ?3)",
            )?;

            for (position, habit) in store.habits.iter().enumerate() {
                insert_habit.execute(params![
                    habit.id.0,
                    habit.name,
                    habit.category,
                    habit.habit_type.as_str(),
                    habit.frequency.as_str(),
                    habit.streak,
                    position as i64,
                    habit.created_at.to_rfc3339(),
                ])?;

                for (date, mark) in &habit.completions {
                    insert_completion.execute(params![
                        habit.id.0,
                        date.format(DATE_FORMAT).to_string(),
                        mark.as_str(),
                    ])?;
                }
            }

            let mut insert_tag =
                tx.prepare("INSERT INTO tags (name, color_index, position) VALUES (?1, ?2, ?3)")?;
            for (position, tag) in store.tags.iter().enumerate() {
                insert_tag.execute(params![tag.name, tag.color_index, position as i64])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Saved {} habits and {} tags",
            store.habits.len(),
            store.tags.len()
        );
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(value) => {
                self.conn.execute(
                    "INSERT INTO settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
            }
        }
        tracing::debug!("Setting '{}' updated", key);
        Ok(())
    }
}
