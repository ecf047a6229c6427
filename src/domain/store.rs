/// In-memory habit and tag collections
///
/// `HabitStore` is the explicit state object the tools load from storage,
/// mutate, and save back. The collection-level record operations are also
/// available as free functions over a plain `Vec<Habit>`.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    set_record, toggle_record, DomainError, Frequency, Habit, HabitId, HabitType, Status, UserTag,
    PALETTE_SIZE,
};
use crate::sync::NotificationSink;

/// Direction for reordering a habit in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Toggle `date` for the habit with `habit_id` and return the updated collection
pub fn toggle(
    mut habits: Vec<Habit>,
    habit_id: HabitId,
    date: NaiveDate,
    sink: &dyn NotificationSink,
) -> Result<Vec<Habit>, DomainError> {
    let habit = find_mut(&mut habits, habit_id)?;
    toggle_record(habit, date, sink);
    Ok(habits)
}

/// Set `date` explicitly for the habit with `habit_id` and return the updated collection
pub fn set_explicit_status(
    mut habits: Vec<Habit>,
    habit_id: HabitId,
    date: NaiveDate,
    status: Status,
    today: NaiveDate,
    sink: &dyn NotificationSink,
) -> Result<Vec<Habit>, DomainError> {
    let habit = find_mut(&mut habits, habit_id)?;
    set_record(habit, date, status, today, sink);
    Ok(habits)
}

fn find_mut(habits: &mut [Habit], habit_id: HabitId) -> Result<&mut Habit, DomainError> {
    habits
        .iter_mut()
        .find(|h| h.id == habit_id)
        .ok_or(DomainError::HabitNotFound(habit_id))
}

/// Habits and tags owned together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStore {
    /// Habits in display order
    pub habits: Vec<Habit>,
    /// Tags in display order; never empty
    pub tags: Vec<UserTag>,
}

impl Default for HabitStore {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            tags: vec![UserTag::default_tag()],
        }
    }
}

impl HabitStore {
    /// Build a store from loaded collections, restoring the default tag if none survived
    pub fn from_parts(habits: Vec<Habit>, tags: Vec<UserTag>) -> Self {
        let tags = if tags.is_empty() {
            vec![UserTag::default_tag()]
        } else {
            tags
        };
        Self { habits, tags }
    }

    pub fn habit(&self, habit_id: HabitId) -> Result<&Habit, DomainError> {
        self.habits
            .iter()
            .find(|h| h.id == habit_id)
            .ok_or(DomainError::HabitNotFound(habit_id))
    }

    pub fn habit_mut(&mut self, habit_id: HabitId) -> Result<&mut Habit, DomainError> {
        find_mut(&mut self.habits, habit_id)
    }

    pub fn contains(&self, habit_id: HabitId) -> bool {
        self.habits.iter().any(|h| h.id == habit_id)
    }

    /// Lowest positive id not used by any habit
    pub fn next_free_id(&self) -> HabitId {
        let mut taken: Vec<u32> = self.habits.iter().map(|h| h.id.0).collect();
        taken.sort_unstable();

        let mut candidate = 1;
        for id in taken {
            if id == candidate {
                candidate += 1;
            } else if id > candidate {
                break;
            }
        }
        HabitId(candidate)
    }

    /// Create and append a habit; `id` defaults to the lowest free one
    pub fn create_habit(
        &mut self,
        id: Option<HabitId>,
        name: String,
        category: Option<String>,
        habit_type: HabitType,
        frequency: Frequency,
    ) -> Result<&Habit, DomainError> {
        let id = id.unwrap_or_else(|| self.next_free_id());
        let category = category.unwrap_or_else(|| self.tags[0].name.clone());
        let habit = Habit::new(id, name, category, habit_type, frequency)?;
        self.add_habit(habit)?;
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Append an already built habit, rejecting a duplicate id
    pub fn add_habit(&mut self, habit: Habit) -> Result<(), DomainError> {
        if self.contains(habit.id) {
            return Err(DomainError::DuplicateHabitId(habit.id));
        }
        if self.tag_color(&habit.category).is_none() {
            debug!("Habit {} references unknown tag '{}'", habit.id, habit.category);
        }
        info!("Added habit {} ({})", habit.name, habit.id);
        self.habits.push(habit);
        Ok(())
    }

    pub fn update_habit(
        &mut self,
        habit_id: HabitId,
        name: Option<String>,
        category: Option<String>,
        habit_type: Option<HabitType>,
        frequency: Option<Frequency>,
    ) -> Result<&Habit, DomainError> {
        let habit = self.habit_mut(habit_id)?;
        habit.update(name, category, habit_type, frequency)?;
        Ok(habit)
    }

    pub fn remove_habit(&mut self, habit_id: HabitId) -> Result<Habit, DomainError> {
        let index = self.index_of(habit_id)?;
        let removed = self.habits.remove(index);
        info!("Removed habit {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Swap a habit with its neighbour; no-op at either end of the list
    pub fn move_habit(&mut self, habit_id: HabitId, direction: MoveDirection) -> Result<(), DomainError> {
        let index = self.index_of(habit_id)?;
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.habits.len() => index + 1,
            _ => return Ok(()),
        };
        self.habits.swap(index, target);
        Ok(())
    }

    pub fn toggle(
        &mut self,
        habit_id: HabitId,
        date: NaiveDate,
        sink: &dyn NotificationSink,
    ) -> Result<Status, DomainError> {
        let habit = self.habit_mut(habit_id)?;
        Ok(toggle_record(habit, date, sink))
    }

    pub fn set_explicit_status(
        &mut self,
        habit_id: HabitId,
        date: NaiveDate,
        status: Status,
        today: NaiveDate,
        sink: &dyn NotificationSink,
    ) -> Result<(), DomainError> {
        let habit = self.habit_mut(habit_id)?;
        set_record(habit, date, status, today, sink);
        Ok(())
    }

    /// Add a tag with the next palette color
    pub fn add_tag(&mut self, name: &str) -> Result<&UserTag, DomainError> {
        let color_index = (self.tags.len() % PALETTE_SIZE as usize) as u8;
        let tag = UserTag::new(name, color_index)?;
        if self.tags.iter().any(|t| t.name == tag.name) {
            return Err(DomainError::DuplicateTag(tag.name));
        }
        self.tags.push(tag);
        Ok(&self.tags[self.tags.len() - 1])
    }

    /// Remove a tag; the last remaining tag cannot be removed
    ///
    /// Habits using the tag keep its name.
    pub fn remove_tag(&mut self, name: &str) -> Result<UserTag, DomainError> {
        let index = self
            .tags
            .iter()
            .position(|t| t.name == name.trim())
            .ok_or_else(|| DomainError::TagNotFound(name.to_string()))?;
        if self.tags.len() == 1 {
            return Err(DomainError::LastTag);
        }
        let orphaned = self.habits.iter().filter(|h| h.category == self.tags[index].name).count();
        if orphaned > 0 {
            debug!("Tag '{}' removed while {} habits still reference it", name, orphaned);
        }
        Ok(self.tags.remove(index))
    }

    /// Palette index for a tag, `None` for unknown or deleted tags
    pub fn tag_color(&self, name: &str) -> Option<u8> {
        self.tags.iter().find(|t| t.name == name).map(|t| t.color_index)
    }

    fn index_of(&self, habit_id: HabitId) -> Result<usize, DomainError> {
        self.habits
            .iter()
            .position(|h| h.id == habit_id)
            .ok_or(DomainError::HabitNotFound(habit_id))
    }
}
