//! Household engine — the composition root that owns the clock, the
//! task book, the placement board, and the ECS world of residents.
//!
//! Everything runs on the single update thread: the driver calls
//! [`HouseholdEngine::update`] once per frame, clock events are
//! dispatched synchronously in order, and outbound [`SimEvent`]s queue
//! up for the driver to drain once per tick. No collaborator ever
//! observes a half-advanced clock.

use hecs::{Entity, World};

use hearth_logic::catalog::Catalog;
use hearth_logic::clock::{ClockEvent, SimClock, SimTime, TimePeriod};
use hearth_logic::hope::hope_score;
use hearth_logic::stats::{effective_change, Attribute, DrainRates, Growth, StatBlock};
use hearth_logic::tasks::{TaskBook, TaskDefinition, TaskInstance};

use crate::components::{Identity, Resident};
use crate::placement::{PlaceOutcome, PlacementBoard};

/// Outbound notifications, drained by the driver after each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    MinuteChanged { hour: u8, minute: u8, day: u32 },
    HourChanged { hour: u8, minute: u8, day: u32 },
    DayChanged { day: u32 },
    TasksUpdated,
    HopeChanged { hope: u8 },
}

/// The running household simulation.
pub struct HouseholdEngine {
    /// ECS world containing resident entities.
    pub world: World,
    clock: SimClock,
    tasks: TaskBook,
    placements: PlacementBoard,
    hope: u8,
    events_out: Vec<SimEvent>,
}

impl HouseholdEngine {
    /// Build an engine over a validated catalog. Today's tasks are
    /// instantiated immediately.
    pub fn new(catalog: Catalog, clock: SimClock) -> Self {
        let placements = PlacementBoard::from_catalog(&catalog);
        let mut tasks = TaskBook::new(catalog);
        tasks.advance_to_day(clock.time().day);
        let mut engine = Self {
            world: World::new(),
            clock,
            tasks,
            placements,
            hope: 0,
            events_out: Vec::new(),
        };
        engine.hope = engine.current_hope();
        engine
    }

    /// Add a resident to the household.
    pub fn add_resident(
        &mut self,
        name: &str,
        description: &str,
        stats: StatBlock,
        growth: Option<Growth>,
        drains: DrainRates,
    ) -> Entity {
        let entity = self
            .world
            .spawn((Resident, Identity::new(name, description), stats, drains));
        if let Some(growth) = growth {
            // Entity was just spawned; insertion cannot fail.
            let _ = self.world.insert_one(entity, growth);
        }
        entity
    }

    /// Advance the simulation by a wall-clock delta.
    pub fn update(&mut self, delta_seconds: f32) {
        let events = self.clock.tick(delta_seconds);
        self.dispatch(events);
        self.publish_hope();
    }

    /// Jump the clock forward by whole minutes, firing events as if
    /// ticked naturally.
    pub fn add_minutes(&mut self, minutes: i32) {
        let events = self.clock.add_minutes(minutes);
        self.dispatch(events);
        self.publish_hope();
    }

    fn dispatch(&mut self, events: Vec<ClockEvent>) {
        for event in events {
            match event {
                ClockEvent::DayChanged { day } => {
                    self.tasks.advance_to_day(day);
                    self.events_out.push(SimEvent::DayChanged { day });
                    self.events_out.push(SimEvent::TasksUpdated);
                }
                ClockEvent::HourChanged { hour, minute, day } => {
                    self.apply_hourly_drain();
                    self.events_out
                        .push(SimEvent::HourChanged { hour, minute, day });
                }
                ClockEvent::MinuteChanged { hour, minute, day } => {
                    let report = self
                        .tasks
                        .on_clock_minute(hour, minute, day, &self.placements);
                    for definition in &report.auto_completed {
                        apply_task_effects(&mut self.world, definition);
                    }
                    if report.changed() {
                        self.events_out.push(SimEvent::TasksUpdated);
                    }
                    self.events_out
                        .push(SimEvent::MinuteChanged { hour, minute, day });
                }
            }
        }
    }

    /// Complete an active task by description. Returns whether anything
    /// was completed; effects are applied to residents on success.
    pub fn complete_task(&mut self, description: &str, actor: Option<&str>) -> bool {
        match self.tasks.complete_task(description, actor) {
            Some(definition) => {
                apply_task_effects(&mut self.world, &definition);
                self.events_out.push(SimEvent::TasksUpdated);
                self.publish_hope();
                true
            }
            None => false,
        }
    }

    /// Complete an active task by requirement tag.
    pub fn complete_task_by_requirement(&mut self, requirement: &str, actor: Option<&str>) -> bool {
        match self.tasks.complete_task_by_requirement(requirement, actor) {
            Some(definition) => {
                apply_task_effects(&mut self.world, &definition);
                self.events_out.push(SimEvent::TasksUpdated);
                self.publish_hope();
                true
            }
            None => false,
        }
    }

    /// A resident finished interacting with something: apply the
    /// interaction's own effects to that resident, then credit any task
    /// registered under the interaction's requirement tag.
    pub fn complete_interaction(
        &mut self,
        actor: &str,
        requirement: Option<&str>,
        effects: &[(Attribute, i32)],
    ) {
        self.apply_resident_effects(actor, effects);
        if let Some(tag) = requirement {
            self.complete_task_by_requirement(tag, Some(actor));
        }
        self.publish_hope();
    }

    /// Place a named upgrade object. First placement counts toward the
    /// hope score and credits the matching object-activation task if it
    /// is already active; otherwise the task auto-completes when it
    /// comes due.
    pub fn place_object(&mut self, name: &str) -> bool {
        match self.placements.place(name) {
            PlaceOutcome::Placed => {
                if let Some(definition) = self.tasks.complete_task_by_requirement(name, None) {
                    apply_task_effects(&mut self.world, &definition);
                    self.events_out.push(SimEvent::TasksUpdated);
                }
                self.publish_hope();
                true
            }
            PlaceOutcome::AlreadyPlaced => true,
            PlaceOutcome::Unknown => false,
        }
    }

    fn apply_hourly_drain(&mut self) {
        for (_, (_, stats, drains)) in self
            .world
            .query_mut::<(&Resident, &mut StatBlock, &DrainRates)>()
        {
            drains.apply_hour(stats);
        }
    }

    fn apply_resident_effects(&mut self, actor: &str, effects: &[(Attribute, i32)]) {
        let mut found = false;
        for (_, (identity, stats, growth)) in self
            .world
            .query_mut::<(&Identity, &mut StatBlock, Option<&Growth>)>()
        {
            if identity.name.eq_ignore_ascii_case(actor) {
                for &(attribute, amount) in effects {
                    let amount = effective_change(growth, attribute, amount);
                    stats.apply(attribute, amount);
                }
                found = true;
                break;
            }
        }
        if !found {
            log::warn!("interaction effects target unknown resident '{}'", actor);
        }
    }

    fn current_hope(&self) -> u8 {
        let mut averages = Vec::new();
        for (_, (_, stats)) in self.world.query::<(&Resident, &StatBlock)>().iter() {
            averages.push(stats.average_seven());
        }
        hope_score(
            self.placements.placed_count(),
            self.tasks.catalog().total_upgrades(),
            &averages,
        )
    }

    fn publish_hope(&mut self) {
        let hope = self.current_hope();
        if hope != self.hope {
            self.hope = hope;
            self.events_out.push(SimEvent::HopeChanged { hope });
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn time(&self) -> SimTime {
        self.clock.time()
    }

    pub fn period(&self) -> TimePeriod {
        self.clock.period()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    pub fn minutes_per_second(&self) -> f32 {
        self.clock.rate()
    }

    pub fn hope(&self) -> u8 {
        self.hope
    }

    pub fn upgrades_done(&self) -> u32 {
        self.placements.placed_count()
    }

    pub fn total_upgrades(&self) -> u32 {
        self.tasks.catalog().total_upgrades()
    }

    pub fn active_tasks(&self) -> Vec<&TaskInstance> {
        self.tasks.active_tasks()
    }

    pub fn day_tasks(&self) -> &[TaskInstance] {
        self.tasks.day_tasks()
    }

    pub fn resident_count(&self) -> usize {
        self.world.query::<&Resident>().iter().count()
    }

    pub fn find_resident(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Identity>()
            .iter()
            .find(|(_, identity)| identity.name.eq_ignore_ascii_case(name))
            .map(|(entity, _)| entity)
    }

    pub fn resident_stats(&self, name: &str) -> Option<StatBlock> {
        let entity = self.find_resident(name)?;
        self.world.get::<&StatBlock>(entity).ok().map(|s| *s)
    }

    /// Drain queued outbound events.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events_out)
    }

    pub(crate) fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut TaskBook {
        &mut self.tasks
    }

    pub(crate) fn placements_mut(&mut self) -> &mut PlacementBoard {
        &mut self.placements
    }

    pub(crate) fn placements(&self) -> &PlacementBoard {
        &self.placements
    }

    pub(crate) fn refresh_hope(&mut self) {
        self.hope = self.current_hope();
    }
}

/// Apply a completed task's stat effects to the residents they name.
/// Effects naming unknown residents are skipped with a warning.
fn apply_task_effects(world: &mut World, definition: &TaskDefinition) {
    for effect in &definition.effects {
        let mut applied = false;
        for (_, (identity, stats, growth)) in
            world.query_mut::<(&Identity, &mut StatBlock, Option<&Growth>)>()
        {
            if identity.name.eq_ignore_ascii_case(&effect.actor) {
                let amount = effective_change(growth, effect.attribute, effect.amount);
                stats.apply(effect.attribute, amount);
                applied = true;
                break;
            }
        }
        if !applied {
            log::warn!(
                "task '{}' effect targets unknown resident '{}'",
                definition.description,
                effect.actor
            );
        }
    }
}
