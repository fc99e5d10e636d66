//! Arrangement: data ownership and public API.
//!
//! Methods:
//! - set_elements / recalculate_placements (membership + placement)
//! - rearrange_instantly (snap without animation)
//! - plan_to_placements / schedule_plans / execute_movement_plans (animated moves)
//! - tick (per-frame driver: start → interpolate → end)

use std::fmt::Debug;
use std::hash::Hash;

use hashbrown::HashSet;
use indexmap::IndexMap;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::easing::Easing;
use crate::element::{ElementHost, ElementMetrics, ElementTransform};
use crate::error::{ArrangementError, Result};
use crate::ids::{IdAllocator, RunId};
use crate::outputs::{ArrangeEvent, TickReport};
use crate::placement::{calculate, LinearPlacement, Placement, PlacementStrategy};
use crate::plan::{create_plan, MovementPlan};
use crate::run::RunHandle;
use crate::scheduler::{
    self, AcceleratingCfg, MussCfg, SerialCfg, SimultaneousCfg,
};

/// Easing and spin shared by every plan of one animated rearrangement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveStyle {
    pub easing: Easing,
    pub extra_rotation_windings: i32,
}

impl MoveStyle {
    pub fn eased(easing: Easing) -> Self {
        Self {
            easing,
            extra_rotation_windings: 0,
        }
    }
}

/// Serializable view of an arrangement for tooling and tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrangementSnapshot<K> {
    pub config: LayoutConfig,
    pub placements: Vec<Placement<K>>,
    pub active_plans: Vec<MovementPlan<K>>,
    pub excluded: Vec<K>,
    pub elapsed: f32,
    pub run: Option<RunId>,
}

/// Ordered set of elements, their placements, and the plans moving them.
#[derive(Debug)]
pub struct Arrangement<K> {
    config: LayoutConfig,
    strategy: Box<dyn PlacementStrategy>,
    members: Vec<(K, ElementMetrics)>,
    placements: Vec<Placement<K>>,
    excluded: HashSet<K>,
    active: IndexMap<K, MovementPlan<K>>,
    elapsed: f32,
    run: Option<RunHandle>,
    /// Events produced outside `tick`, reported by the next one.
    pending: Vec<ArrangeEvent<K>>,
    ids: IdAllocator,
}

impl<K> Arrangement<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Create an empty arrangement using the linear strategy.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            strategy: Box::new(LinearPlacement),
            members: Vec::new(),
            placements: Vec::new(),
            excluded: HashSet::new(),
            active: IndexMap::new(),
            elapsed: 0.0,
            run: None,
            pending: Vec::new(),
            ids: IdAllocator::new(),
        })
    }

    pub fn with_strategy(mut self, strategy: impl PlacementStrategy + 'static) -> Self {
        self.set_strategy(Box::new(strategy));
        self
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn PlacementStrategy>) {
        self.strategy = strategy;
        self.recompute();
    }

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the layout configuration and recompute placements.
    ///
    /// An invalid configuration is rejected and leaves the arrangement untouched.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.recompute();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.members.iter().any(|(k, _)| *k == key)
    }

    pub fn elements(&self) -> impl Iterator<Item = K> + '_ {
        self.members.iter().map(|(k, _)| *k)
    }

    #[inline]
    pub fn placements(&self) -> &[Placement<K>] {
        &self.placements
    }

    pub fn placement(&self, key: K) -> Option<&Placement<K>> {
        self.placements.iter().find(|p| p.element == key)
    }

    /// Replace membership with `keys` (in order).
    ///
    /// Newly added elements are attached through the host, removed ones are
    /// detached and lose any in-flight plan. Duplicate keys keep their first
    /// position.
    pub fn set_elements<H: ElementHost<K>>(&mut self, keys: impl IntoIterator<Item = K>, host: &mut H) {
        self.reap_stopped_run();
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for key in keys {
            if seen.insert(key) {
                ordered.push(key);
            } else {
                warn!("set_elements: duplicate element {:?} ignored", key);
            }
        }

        let previous: HashSet<K> = self.members.iter().map(|(k, _)| *k).collect();
        let removed: Vec<K> = self
            .members
            .iter()
            .map(|(k, _)| *k)
            .filter(|k| !seen.contains(k))
            .collect();
        for key in &removed {
            host.detach(*key);
            self.active.shift_remove(key);
            self.excluded.remove(key);
        }
        let mut added = 0usize;
        for key in ordered.iter().filter(|k| !previous.contains(*k)) {
            host.attach(*key);
            added += 1;
        }

        self.members = ordered.into_iter().map(|k| (k, host.metrics(k))).collect();
        debug!(
            "set_elements: {} members ({} added, {} removed)",
            self.members.len(),
            added,
            removed.len()
        );
        self.recompute();
    }

    /// Re-read element metrics from the host and recompute placements.
    pub fn recalculate_placements<H: ElementHost<K>>(&mut self, host: &H) {
        for (key, metrics) in &mut self.members {
            *metrics = host.metrics(*key);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.placements = calculate(self.strategy.as_ref(), &self.members, &self.config);
    }

    pub fn exclude_from_rearrange(&mut self, key: K) {
        self.excluded.insert(key);
    }

    pub fn include_in_rearrange(&mut self, key: K) {
        self.excluded.remove(&key);
    }

    pub fn is_excluded(&self, key: K) -> bool {
        self.excluded.contains(&key)
    }

    /// Recompute placements and snap every non-excluded element onto its placement.
    ///
    /// In-flight plans for snapped elements are dropped.
    pub fn rearrange_instantly<H: ElementHost<K>>(&mut self, host: &mut H) {
        self.reap_stopped_run();
        self.recalculate_placements(host);
        for placement in &self.placements {
            if self.excluded.contains(&placement.element) {
                continue;
            }
            let Some(live) = host.transform(placement.element) else {
                warn!(
                    "rearrange_instantly: host has no transform for {:?}",
                    placement.element
                );
                continue;
            };
            host.set_transform(placement.element, placement.to_transform(live.scale));
            self.active.shift_remove(&placement.element);
        }
    }

    /// Fresh zero-duration plans from each element's live transform to its placement.
    ///
    /// Excluded elements and plans that would not move anything are skipped.
    pub fn plan_to_placements<H: ElementHost<K>>(
        &self,
        host: &H,
        style: MoveStyle,
    ) -> Vec<MovementPlan<K>> {
        self.placements
            .iter()
            .filter(|p| !self.excluded.contains(&p.element))
            .filter_map(|p| {
                let Some(live) = host.transform(p.element) else {
                    warn!("plan_to_placements: host has no transform for {:?}", p.element);
                    return None;
                };
                let plan = create_plan(
                    p.element,
                    live,
                    p.to_transform(live.scale),
                    0.0,
                    0.0,
                    style.extra_rotation_windings,
                    style.easing,
                );
                (!plan.is_noop()).then_some(plan)
            })
            .collect()
    }

    /// Record plans in the active set. Returns how many were accepted.
    ///
    /// Plan windows are relative to now: they are shifted by the current run's
    /// elapsed time. A plan for an element already in flight replaces it.
    /// Plans for elements that are not members are dropped.
    pub fn schedule_plans(&mut self, plans: impl IntoIterator<Item = MovementPlan<K>>) -> usize {
        let mut accepted = 0;
        for plan in plans {
            match self.try_schedule_plan(plan) {
                Ok(()) => accepted += 1,
                Err(err) => warn!("schedule_plans: {err}; plan dropped"),
            }
        }
        accepted
    }

    /// Record one plan, rejecting it if its element is not a member.
    pub fn try_schedule_plan(&mut self, plan: MovementPlan<K>) -> Result<()> {
        self.reap_stopped_run();
        if !self.contains(plan.element) {
            return Err(ArrangementError::UntrackedElement {
                element: format!("{:?}", plan.element),
            });
        }
        if self.active.get(&plan.element).is_some_and(|p| !p.is_ended) {
            warn!(
                "schedule_plans: element {:?} already moving; superseding its plan",
                plan.element
            );
        }
        self.active.insert(plan.element, plan.delayed(self.elapsed));
        Ok(())
    }

    /// Start driving the active plans. Ticks advance them until the set is empty.
    ///
    /// While a run is in flight the same handle is returned, so plans scheduled
    /// mid-run join it.
    pub fn execute_movement_plans(&mut self) -> RunHandle {
        self.reap_stopped_run();
        if let Some(run) = &self.run {
            if !run.is_finished() {
                return run.clone();
            }
        }
        let id = self.ids.alloc_run();
        if self.active.is_empty() {
            return RunHandle::finished(id);
        }
        debug!(
            "execute_movement_plans: run {:?} with {} plans",
            id,
            self.active.len()
        );
        let run = RunHandle::new(id);
        self.run = Some(run.clone());
        run
    }

    pub fn arrange_simultaneous<H: ElementHost<K>>(
        &mut self,
        host: &H,
        style: MoveStyle,
        cfg: &SimultaneousCfg,
    ) -> RunHandle {
        let plans = scheduler::schedule_simultaneous(&self.plan_to_placements(host, style), cfg);
        self.schedule_plans(plans);
        self.execute_movement_plans()
    }

    pub fn arrange_serial<H: ElementHost<K>>(
        &mut self,
        host: &H,
        style: MoveStyle,
        cfg: &SerialCfg,
    ) -> RunHandle {
        let plans = scheduler::schedule_serial(&self.plan_to_placements(host, style), cfg);
        self.schedule_plans(plans);
        self.execute_movement_plans()
    }

    pub fn arrange_accelerating<H: ElementHost<K>>(
        &mut self,
        host: &H,
        style: MoveStyle,
        cfg: &AcceleratingCfg,
    ) -> RunHandle {
        let plans = scheduler::schedule_accelerating(&self.plan_to_placements(host, style), cfg);
        self.schedule_plans(plans);
        self.execute_movement_plans()
    }

    /// Perturb the end state of every non-excluded member and run the result.
    pub fn muss<H: ElementHost<K>, R: Rng>(
        &mut self,
        host: &H,
        cfg: &MussCfg,
        rng: &mut R,
    ) -> RunHandle {
        self.reap_stopped_run();
        let targets: Vec<(K, ElementTransform)> = self
            .members
            .iter()
            .filter(|(k, _)| !self.excluded.contains(k))
            .filter_map(|(k, _)| host.transform(*k).map(|t| (*k, t)))
            .collect();
        let existing: Vec<MovementPlan<K>> = self.active.values().copied().collect();
        for plan in scheduler::muss(&existing, &targets, cfg, rng) {
            self.active.insert(plan.element, plan);
        }
        self.execute_movement_plans()
    }

    pub fn active_plans(&self) -> impl Iterator<Item = &MovementPlan<K>> + '_ {
        self.active.values()
    }

    pub fn plan(&self, key: K) -> Option<&MovementPlan<K>> {
        self.active.get(&key)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn current_run(&self) -> Option<&RunHandle> {
        self.run.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Stop the current run now, dropping its plans where they stand.
    pub fn stop_run(&mut self) -> Option<RunId> {
        let run = self.run.clone()?;
        run.stop();
        self.abort_run(&run);
        Some(run.id())
    }

    /// Advance the current run by `dt` seconds.
    ///
    /// Plans are visited in insertion order. Each plan starts (once) when
    /// elapsed time reaches its start, is interpolated while running, and ends
    /// (once) when elapsed time reaches its end, after which it is removed.
    pub fn tick<H: ElementHost<K>>(&mut self, dt: f32, host: &mut H) -> TickReport<K> {
        let mut report = TickReport {
            events: std::mem::take(&mut self.pending),
            ..Default::default()
        };
        let Some(run) = self.run.clone() else {
            report.remaining = self.active.len();
            return report;
        };
        if run.is_stopped() {
            let stopped = self.abort_run(&run);
            report.push_event(stopped);
            return report;
        }

        self.elapsed += dt.max(0.0);
        let elapsed = self.elapsed;
        let z_instantly = self.config.update_z_instantly;
        let mut finished = Vec::new();

        for (key, slot) in self.active.iter_mut() {
            let plan = *slot;
            if elapsed < plan.start_time {
                continue;
            }
            let mut next = plan;
            if !plan.is_started {
                next = next.started();
                host.arrange_started(*key);
                report.push_event(ArrangeEvent::ArrangeStarted {
                    element: *key,
                    elapsed,
                });
            }
            let done = elapsed >= plan.end_time;
            let mut transform = if done { plan.end } else { plan.sample(elapsed) };
            if z_instantly {
                transform.position.z = plan.end.position.z;
            }
            host.set_transform(*key, transform);
            if done {
                next = next.ended();
                host.arrange_ended(*key);
                report.push_event(ArrangeEvent::ArrangeEnded {
                    element: *key,
                    elapsed,
                });
                finished.push(*key);
            }
            *slot = next;
        }
        for key in &finished {
            self.active.shift_remove(key);
        }

        if self.active.is_empty() {
            run.mark_complete();
            self.run = None;
            self.elapsed = 0.0;
            debug!("tick: run {:?} finished", run.id());
            report.push_event(ArrangeEvent::RunFinished { run: run.id() });
        }
        report.remaining = self.active.len();
        report.elapsed = self.elapsed;
        report
    }

    /// Abort a run stopped through its handle since the last tick.
    fn reap_stopped_run(&mut self) {
        let Some(run) = self.run.clone() else {
            return;
        };
        if run.is_stopped() {
            let stopped = self.abort_run(&run);
            self.pending.push(stopped);
        }
    }

    fn abort_run(&mut self, run: &RunHandle) -> ArrangeEvent<K> {
        debug!(
            "run {:?} stopped with {} plans in flight",
            run.id(),
            self.active.len()
        );
        self.active.clear();
        self.elapsed = 0.0;
        if self.run.as_ref().is_some_and(|r| r.same_run(run)) {
            self.run = None;
        }
        ArrangeEvent::RunStopped { run: run.id() }
    }

    pub fn snapshot(&self) -> ArrangementSnapshot<K> {
        ArrangementSnapshot {
            config: self.config.clone(),
            placements: self.placements.clone(),
            active_plans: self.active.values().copied().collect(),
            excluded: self
                .elements()
                .filter(|k| self.excluded.contains(k))
                .collect(),
            elapsed: self.elapsed,
            run: self.run.as_ref().map(RunHandle::id),
        }
    }
}
