//! Workbench session.
//!
//! A [`Workbench`] owns one [`CircuitGraph`] for the lifetime of a play
//! session and implements the edit operations the game performs on it:
//! dropping palette items, moving, rotating, toggling switches, deleting, and
//! running the simulation on demand or on a timer.
//!
//! Every edit leaves the graph fully consistent before returning: terminals
//! are recomputed, snapped, and re-registered in one step.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::challenge::{Challenge, ChallengeOutcome, PaletteItem};
use crate::circuit::{CircuitGraph, ComponentId, SimulationOptions, SimulationReport, SimulationStatus};
use crate::components::{Component, ComponentKind, Element};
use crate::dsl::LayoutAst;
use crate::error::{LabError, Result};
use crate::layout::{GridConfig, Rotation};

/// Interval at which the host should call [`Workbench::tick`] while
/// continuous simulation runs.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// A play session's workbench.
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    graph: CircuitGraph,
    grid: GridConfig,
    options: SimulationOptions,
    /// Palette item each placed component was dragged from
    palette: HashMap<ComponentId, PaletteItem>,
    next_serial: u32,
    continuous: bool,
    /// Last explicit simulation; the one challenges are graded against
    last_status: Option<SimulationStatus>,
    /// Last continuous tick
    live_status: Option<SimulationStatus>,
}

impl Workbench {
    /// Start a new, empty session with default grid and options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom grid.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Use custom simulation options.
    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a workbench from a parsed layout.
    pub fn from_ast(ast: &LayoutAst) -> Result<Self> {
        let mut grid = GridConfig::default();
        if let Some(size) = ast.grid_size {
            grid = grid.with_size(size);
        }
        if let Some((x, y)) = ast.grid_origin {
            grid = grid.with_origin(x, y);
        }
        let options = SimulationOptions::new().with_strict_switches(ast.strict_switches);

        let mut bench = Self::new().with_grid(grid).with_options(options);
        for def in &ast.components {
            let component = Component::from_def(def, &bench.grid)?;
            bench.add_component(component)?;
        }
        tracing::debug!(
            components = bench.graph.len(),
            junctions = bench.graph.junction_count(),
            "loaded layout"
        );
        Ok(bench)
    }

    /// Drop a palette item at a raw pointer position.
    ///
    /// The centre is snapped to the grid and a kind-prefixed id is generated.
    pub fn place(&mut self, item: PaletteItem, x: f64, y: f64) -> Result<ComponentId> {
        self.ensure_editable("place", item)?;
        let id = self.next_id(item.kind());
        let center = self.grid.snap(x, y);
        let component = Component::placed(id.clone(), item.element(), center, Rotation::Deg0, &self.grid);
        tracing::info!(component = %id, %center, "placed component");
        self.palette.insert(id.clone(), item);
        self.graph.add_component(component);
        Ok(id)
    }

    /// Register a fully built component, e.g. one loaded from a layout file.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        if self.graph.component(&component.id).is_some() {
            return Err(LabError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }
        self.ensure_editable("add", &component.id)?;
        self.palette
            .insert(component.id.clone(), PaletteItem::for_component(&component));
        self.graph.add_component(component);
        Ok(())
    }

    /// Move a placed component so its centre lands on the grid point nearest
    /// to `(x, y)`.
    pub fn move_to(&mut self, id: &ComponentId, x: f64, y: f64) -> Result<()> {
        self.ensure_editable("move", id)?;
        let center = self.grid.snap(x, y);
        let grid = self.grid;
        let component = self
            .graph
            .component_mut(id)
            .ok_or_else(|| LabError::not_found(id))?;
        let rotation = component.rotation;
        component.place(center, rotation, &grid);
        self.graph.sync_terminals(id);
        tracing::debug!(component = %id, %center, "moved component");
        Ok(())
    }

    /// Toggle a component between 0° and 90°.
    pub fn rotate(&mut self, id: &ComponentId) -> Result<Rotation> {
        self.ensure_editable("rotate", id)?;
        let grid = self.grid;
        let component = self
            .graph
            .component_mut(id)
            .ok_or_else(|| LabError::not_found(id))?;
        component.rotate(&grid);
        let rotation = component.rotation;
        self.graph.sync_terminals(id);
        tracing::debug!(component = %id, %rotation, "rotated component");
        Ok(rotation)
    }

    /// Flip a switch. As in the game, switches are operated only while
    /// continuous simulation runs.
    pub fn toggle_switch(&mut self, id: &ComponentId) -> Result<bool> {
        if !self.continuous {
            return Err(LabError::SimulationStopped { id: id.to_string() });
        }
        let is_on = !self.switch_state(id)?;
        self.set_switch(id, is_on)?;
        Ok(is_on)
    }

    /// Set a switch's state directly.
    pub fn set_switch(&mut self, id: &ComponentId, is_on: bool) -> Result<()> {
        let component = self
            .graph
            .component_mut(id)
            .ok_or_else(|| LabError::not_found(id))?;
        let actual = component.kind();
        let switch = component.as_switch_mut().ok_or_else(|| LabError::WrongKind {
            id: id.to_string(),
            expected: ComponentKind::Switch.to_string(),
            actual: actual.to_string(),
        })?;
        switch.set_state(is_on);
        tracing::debug!(component = %id, is_on, "switch set");
        Ok(())
    }

    /// Delete a placed component together with its terminals.
    pub fn remove(&mut self, id: &ComponentId) -> Result<Component> {
        let component = self
            .graph
            .remove_component(id)
            .ok_or_else(|| LabError::not_found(id))?;
        self.palette.remove(id);
        tracing::info!(component = %id, "removed component");
        Ok(component)
    }

    /// Remove every placed component (e.g. when moving to the next challenge).
    pub fn clear(&mut self) {
        self.graph.clear();
        self.palette.clear();
        self.last_status = None;
        self.live_status = None;
    }

    /// Run the simulation now and remember the result.
    pub fn simulate(&mut self) -> SimulationStatus {
        let status = self.graph.simulate_with(&self.options);
        tracing::info!(code = status.code(), "{}", status.message());
        self.last_status = Some(status);
        status
    }

    /// Run the simulation and return a full report.
    pub fn report(&mut self) -> SimulationReport {
        let report = self.graph.simulate_report(&self.options);
        self.last_status = Some(report.status);
        report
    }

    /// Start continuous simulation. Layout edits are blocked until stopped.
    pub fn start_continuous(&mut self) {
        self.continuous = true;
    }

    /// Stop continuous simulation.
    pub fn stop_continuous(&mut self) {
        self.continuous = false;
    }

    /// Toggle continuous simulation; returns the new state.
    pub fn toggle_continuous(&mut self) -> bool {
        self.continuous = !self.continuous;
        self.continuous
    }

    /// Check whether continuous simulation is running.
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Timer callback: simulates if continuous simulation is running.
    ///
    /// Ticks only refresh the live connection indicator. They do not count as
    /// a simulation run for challenge grading; see [`Workbench::simulate`].
    pub fn tick(&mut self) -> Option<SimulationStatus> {
        if !self.continuous {
            return None;
        }
        let status = self.graph.simulate_with(&self.options);
        tracing::debug!(code = status.code(), "continuous tick");
        self.live_status = Some(status);
        Some(status)
    }

    /// Result of the most recent continuous-simulation tick, if any.
    pub fn live_status(&self) -> Option<SimulationStatus> {
        self.live_status
    }

    /// Grade a challenge against this workbench.
    pub fn check(&self, challenge: &Challenge) -> ChallengeOutcome {
        challenge.check(&self.placed_items(), self.last_status)
    }

    /// Result of the most recent simulation, if any.
    pub fn last_status(&self) -> Option<SimulationStatus> {
        self.last_status
    }

    /// Palette items of all placed components, ordered by component id.
    pub fn placed_items(&self) -> Vec<PaletteItem> {
        let mut placed: Vec<_> = self.palette.iter().collect();
        placed.sort_by(|a, b| a.0.cmp(b.0));
        placed.into_iter().map(|(_, item)| *item).collect()
    }

    /// Kinds of all placed components, ordered by component id.
    pub fn placed_kinds(&self) -> Vec<ComponentKind> {
        self.graph.placed_kinds()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    /// The simulation options in use.
    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// The grid in use.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Get a placed component.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.graph.component(id)
    }

    fn switch_state(&self, id: &ComponentId) -> Result<bool> {
        let component = self.graph.component(id).ok_or_else(|| LabError::not_found(id))?;
        match &component.element {
            Element::Switch(sw) => Ok(sw.is_on),
            other => Err(LabError::WrongKind {
                id: id.to_string(),
                expected: ComponentKind::Switch.to_string(),
                actual: other.kind().to_string(),
            }),
        }
    }

    fn ensure_editable(&self, action: &str, subject: impl fmt::Display) -> Result<()> {
        if self.continuous {
            tracing::warn!(component = %subject, "{} rejected while simulation runs", action);
            return Err(LabError::SimulationRunning {
                action: action.to_string(),
                id: subject.to_string(),
            });
        }
        Ok(())
    }

    fn next_id(&mut self, kind: ComponentKind) -> ComponentId {
        loop {
            self.next_serial += 1;
            let id = ComponentId(format!("{}_{}", kind.id_prefix(), self.next_serial));
            if self.graph.component(&id).is_none() {
                return id;
            }
        }
    }
}
