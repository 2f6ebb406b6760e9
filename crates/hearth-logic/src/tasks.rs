//! Day-scoped task scheduling.
//!
//! A [`TaskBook`] owns the full catalog of task definitions and, for the
//! current simulated day, a fresh set of runtime [`TaskInstance`]s. The
//! clock's minute events drive activation; external collaborators
//! complete tasks by description or by requirement tag. Completion
//! never applies stat effects itself — the completed definition is
//! handed back so the owning engine can apply them to its residents.
//!
//! Activation uses a `>=` comparison against the trigger minute so a
//! task whose exact minute was skipped by a large time step still
//! activates on the next event; the `is_active` guard keeps it from
//! triggering twice.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::clock::SimTime;
use crate::stats::Attribute;

/// How a task is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Completed by a resident interacting with something.
    Interaction,
    /// Completed by placing/activating a named object; checked against
    /// the placement oracle when the task comes due.
    ObjectActivation,
}

/// One attribute change applied to a named resident on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEffect {
    pub actor: String,
    pub attribute: Attribute,
    pub amount: i32,
}

/// Immutable task template from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub description: String,
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
    /// Tag matched against interaction/placement requirements.
    pub requirement: Option<String>,
    pub kind: TaskKind,
    /// If set, only this resident may complete the task.
    pub required_actor: Option<String>,
    pub effects: Vec<StatEffect>,
}

impl TaskDefinition {
    pub fn trigger_minute_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

/// Runtime state for one catalog task on the current day. Rebuilt from
/// scratch when the day rolls over; incomplete tasks do not carry over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInstance {
    pub definition: TaskDefinition,
    pub is_active: bool,
    pub is_completed: bool,
    pub activated_at: Option<SimTime>,
}

impl TaskInstance {
    fn new(definition: TaskDefinition) -> Self {
        Self {
            definition,
            is_active: false,
            is_completed: false,
            activated_at: None,
        }
    }

    fn activate(&mut self, now: SimTime) {
        self.is_active = true;
        self.activated_at = Some(now);
    }

    fn complete(&mut self) {
        self.is_completed = true;
        self.is_active = false;
    }
}

/// Answers whether a named object has already been placed/activated.
/// Owned by the placement system; queried when object-activation tasks
/// come due.
pub trait PlacementOracle {
    fn is_object_active(&self, requirement: &str) -> bool;
}

/// Oracle that reports nothing placed; handy for tests and for running
/// without a placement system.
pub struct NoPlacements;

impl PlacementOracle for NoPlacements {
    fn is_object_active(&self, _requirement: &str) -> bool {
        false
    }
}

/// What happened during one minute of scheduling.
#[derive(Debug, Default)]
pub struct MinuteReport {
    /// Tasks newly activated this minute.
    pub activated: u32,
    /// Object-activation tasks auto-completed because their object was
    /// already placed. Effects have not been applied yet.
    pub auto_completed: Vec<TaskDefinition>,
}

impl MinuteReport {
    pub fn changed(&self) -> bool {
        self.activated > 0 || !self.auto_completed.is_empty()
    }
}

/// The task scheduler: catalog plus the current day's instances.
#[derive(Debug)]
pub struct TaskBook {
    catalog: Catalog,
    current_day: u32,
    day_tasks: Vec<TaskInstance>,
    /// Lowercased requirement tag -> index into `day_tasks`. Valid for
    /// the current day only; rebuilt on day change.
    requirement_index: HashMap<String, usize>,
}

impl TaskBook {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            current_day: 0,
            day_tasks: Vec::new(),
            requirement_index: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Replace the catalog wholesale. Current-day instances are rebuilt
    /// on the next [`advance_to_day`](Self::advance_to_day).
    pub fn load_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.current_day = 0;
        self.day_tasks.clear();
        self.requirement_index.clear();
    }

    /// Discard the old day's instances and instantiate every definition
    /// scheduled for `day`.
    pub fn advance_to_day(&mut self, day: u32) {
        self.current_day = day;
        self.day_tasks.clear();
        self.requirement_index.clear();

        for definition in self.catalog.definitions() {
            if definition.day == day {
                let index = self.day_tasks.len();
                if let Some(tag) = &definition.requirement {
                    self.requirement_index.insert(tag.trim().to_lowercase(), index);
                }
                self.day_tasks.push(TaskInstance::new(definition.clone()));
            }
        }
        log::debug!(
            "day {}: instantiated {} tasks",
            day,
            self.day_tasks.len()
        );
    }

    /// React to a minute event: activate due tasks and re-check pending
    /// object-activation tasks against the oracle.
    pub fn on_clock_minute(
        &mut self,
        hour: u8,
        minute: u8,
        day: u32,
        oracle: &dyn PlacementOracle,
    ) -> MinuteReport {
        let mut report = MinuteReport::default();
        let now = SimTime::new(day, hour, minute);
        let current = now.minute_of_day();

        for instance in &mut self.day_tasks {
            if instance.is_active || instance.is_completed {
                continue;
            }
            let def = &instance.definition;
            if def.day == day && current >= def.trigger_minute_of_day() {
                instance.activate(now);
                report.activated += 1;
                log::debug!("activated task: {}", instance.definition.description);
            }
        }

        // An object placed before its task came due satisfies the task
        // the moment it activates.
        for instance in &mut self.day_tasks {
            if !instance.is_active || instance.is_completed {
                continue;
            }
            if instance.definition.kind != TaskKind::ObjectActivation {
                continue;
            }
            let satisfied = instance
                .definition
                .requirement
                .as_deref()
                .is_some_and(|tag| oracle.is_object_active(tag));
            if satisfied {
                instance.complete();
                report.auto_completed.push(instance.definition.clone());
                log::debug!(
                    "auto-completed placed task: {}",
                    instance.definition.description
                );
            }
        }

        report
    }

    /// Complete the active task with this description (case-insensitive).
    /// Returns the definition so the caller can apply its effects, or
    /// `None` if nothing matched — completing an unknown, inactive, or
    /// already-completed task is a logged no-op.
    pub fn complete_task(&mut self, description: &str, actor: Option<&str>) -> Option<TaskDefinition> {
        let index = self.day_tasks.iter().position(|t| {
            t.is_active
                && !t.is_completed
                && t.definition.description.eq_ignore_ascii_case(description)
        });
        let Some(index) = index else {
            log::warn!("no active task matching description '{}'", description);
            return None;
        };
        self.finish(index, actor)
    }

    /// Complete the active task registered under this requirement tag.
    pub fn complete_task_by_requirement(
        &mut self,
        requirement: &str,
        actor: Option<&str>,
    ) -> Option<TaskDefinition> {
        let key = requirement.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        let Some(&index) = self.requirement_index.get(&key) else {
            log::warn!("no task registered for requirement '{}'", requirement.trim());
            return None;
        };
        let instance = &self.day_tasks[index];
        if !instance.is_active || instance.is_completed {
            log::warn!(
                "task '{}' for requirement '{}' is not active",
                instance.definition.description,
                requirement.trim()
            );
            return None;
        }
        self.finish(index, actor)
    }

    fn finish(&mut self, index: usize, actor: Option<&str>) -> Option<TaskDefinition> {
        let instance = &mut self.day_tasks[index];
        if let Some(required) = &instance.definition.required_actor {
            let matches = actor.is_some_and(|a| a.eq_ignore_ascii_case(required));
            if !matches {
                log::warn!(
                    "task '{}' requires {}, rejected for {:?}",
                    instance.definition.description,
                    required,
                    actor
                );
                return None;
            }
        }
        instance.complete();
        log::debug!("completed task: {}", instance.definition.description);
        Some(instance.definition.clone())
    }

    /// Tasks that are active and not yet completed.
    pub fn active_tasks(&self) -> Vec<&TaskInstance> {
        self.day_tasks
            .iter()
            .filter(|t| t.is_active && !t.is_completed)
            .collect()
    }

    /// All of today's instances, for UI-style listings.
    pub fn day_tasks(&self) -> &[TaskInstance] {
        &self.day_tasks
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn completed_count(&self) -> usize {
        self.day_tasks.iter().filter(|t| t.is_completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn def(description: &str, day: u32, hour: u8, minute: u8, tag: &str) -> TaskDefinition {
        TaskDefinition {
            description: description.into(),
            day,
            hour,
            minute,
            requirement: Some(tag.into()),
            kind: TaskKind::Interaction,
            required_actor: None,
            effects: Vec::new(),
        }
    }

    fn book(defs: Vec<TaskDefinition>) -> TaskBook {
        TaskBook::new(Catalog::new(defs).unwrap())
    }

    #[test]
    fn test_day_rollover_replaces_instances() {
        let mut book = book(vec![
            def("Sweep", 1, 9, 0, "Sweep1"),
            def("Mop", 2, 9, 0, "Mop2"),
        ]);
        book.advance_to_day(1);
        assert_eq!(book.day_tasks().len(), 1);
        assert_eq!(book.day_tasks()[0].definition.description, "Sweep");

        book.advance_to_day(2);
        assert_eq!(book.day_tasks().len(), 1);
        assert_eq!(book.day_tasks()[0].definition.description, "Mop");
    }

    #[test]
    fn test_no_activation_before_trigger() {
        let mut book = book(vec![def("Lunch", 2, 10, 30, "Lunch2")]);
        book.advance_to_day(2);
        let report = book.on_clock_minute(10, 29, 2, &NoPlacements);
        assert_eq!(report.activated, 0);
        assert!(book.active_tasks().is_empty());
    }

    #[test]
    fn test_activation_at_exact_minute() {
        let mut book = book(vec![def("Lunch", 2, 10, 30, "Lunch2")]);
        book.advance_to_day(2);
        let report = book.on_clock_minute(10, 30, 2, &NoPlacements);
        assert_eq!(report.activated, 1);
        assert_eq!(book.active_tasks().len(), 1);
    }

    #[test]
    fn test_activation_catches_skipped_minute() {
        let mut book = book(vec![def("Lunch", 2, 10, 30, "Lunch2")]);
        book.advance_to_day(2);
        // The 10:30 event never fired; 11:00 still activates the task,
        // and only once.
        let report = book.on_clock_minute(11, 0, 2, &NoPlacements);
        assert_eq!(report.activated, 1);
        let report = book.on_clock_minute(11, 1, 2, &NoPlacements);
        assert_eq!(report.activated, 0);
        assert_eq!(book.active_tasks().len(), 1);
    }

    #[test]
    fn test_wrong_day_never_activates() {
        let mut book = book(vec![def("Lunch", 2, 10, 30, "Lunch2")]);
        book.advance_to_day(1);
        let report = book.on_clock_minute(12, 0, 1, &NoPlacements);
        assert_eq!(report.activated, 0);
    }

    #[test]
    fn test_complete_by_description_case_insensitive() {
        let mut book = book(vec![def("Cook dinner", 1, 18, 0, "Dinner1")]);
        book.advance_to_day(1);
        book.on_clock_minute(18, 0, 1, &NoPlacements);
        assert!(book.complete_task("COOK DINNER", None).is_some());
        assert!(book.active_tasks().is_empty());
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut book = book(vec![def("Cook dinner", 1, 18, 0, "Dinner1")]);
        book.advance_to_day(1);
        book.on_clock_minute(18, 0, 1, &NoPlacements);
        assert!(book.complete_task_by_requirement("Dinner1", None).is_some());
        // Second completion by either path is a no-op.
        assert!(book.complete_task_by_requirement("Dinner1", None).is_none());
        assert!(book.complete_task("Cook dinner", None).is_none());
        assert_eq!(book.completed_count(), 1);
    }

    #[test]
    fn test_inactive_task_cannot_complete() {
        let mut book = book(vec![def("Cook dinner", 1, 18, 0, "Dinner1")]);
        book.advance_to_day(1);
        // Never activated; both completion paths refuse.
        assert!(book.complete_task_by_requirement("Dinner1", None).is_none());
        assert!(book.complete_task("Cook dinner", None).is_none());
    }

    #[test]
    fn test_required_actor_gating() {
        let mut task = def("Read a story", 1, 19, 0, "Story1");
        task.required_actor = Some("Alice".into());
        let mut book = book(vec![task]);
        book.advance_to_day(1);
        book.on_clock_minute(19, 0, 1, &NoPlacements);

        assert!(book.complete_task_by_requirement("Story1", Some("Bob")).is_none());
        assert!(book.complete_task_by_requirement("Story1", None).is_none());
        assert!(!book.day_tasks()[0].is_completed);
        assert!(book.complete_task_by_requirement("Story1", Some("alice")).is_some());
    }

    #[test]
    fn test_requirement_lookup_trims_and_ignores_case() {
        let mut book = book(vec![def("Cook dinner", 1, 18, 0, "Dinner1")]);
        book.advance_to_day(1);
        book.on_clock_minute(18, 0, 1, &NoPlacements);
        assert!(book.complete_task_by_requirement("  dinner1 ", None).is_some());
    }

    #[test]
    fn test_object_task_autocompletes_when_placed() {
        struct Placed;
        impl PlacementOracle for Placed {
            fn is_object_active(&self, requirement: &str) -> bool {
                requirement == "Windmill2"
            }
        }

        let mut task = def("Place windmill", 2, 12, 0, "Windmill2");
        task.kind = TaskKind::ObjectActivation;
        let mut book = book(vec![task]);
        book.advance_to_day(2);

        let report = book.on_clock_minute(12, 0, 2, &Placed);
        assert_eq!(report.activated, 1);
        assert_eq!(report.auto_completed.len(), 1);
        assert!(book.day_tasks()[0].is_completed);
    }

    #[test]
    fn test_object_task_waits_for_placement() {
        let mut task = def("Place windmill", 2, 12, 0, "Windmill2");
        task.kind = TaskKind::ObjectActivation;
        let mut book = book(vec![task]);
        book.advance_to_day(2);

        let report = book.on_clock_minute(12, 0, 2, &NoPlacements);
        assert_eq!(report.activated, 1);
        assert!(report.auto_completed.is_empty());
        assert!(book.day_tasks()[0].is_active);
    }

    #[test]
    fn test_activated_at_records_sim_time() {
        let mut book = book(vec![def("Lunch", 1, 12, 0, "Lunch1")]);
        book.advance_to_day(1);
        book.on_clock_minute(12, 5, 1, &NoPlacements);
        assert_eq!(
            book.day_tasks()[0].activated_at,
            Some(SimTime::new(1, 12, 5))
        );
    }
}
