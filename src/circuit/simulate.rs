//! Closed-loop detection.
//!
//! The engine does not compute voltages or currents. It answers one question:
//! is there a path from one battery terminal to the other that does not pass
//! through that battery?
//!
//! 1. Junctions with identical coordinates are merged into nets.
//! 2. Every component becomes an undirected edge between the nets of its
//!    two terminals.
//! 3. For each battery, its own edge is ignored and a breadth-first search
//!    checks whether its terminal nets are still connected.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::graph::CircuitGraph;
use super::junction::Junction;
use super::types::{ComponentId, JunctionId};
use crate::components::Component;
use crate::layout::GridPoint;

/// Result of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// A closed loop exists; current flows (code 1)
    Closed,
    /// Components are present but no loop closes (code 0)
    Open,
    /// No battery on the workbench (code -1)
    NoPowerSource,
    /// At least one switch is open (code -2)
    SwitchOpen,
}

impl SimulationStatus {
    /// Integer status code understood by the game UI.
    pub fn code(&self) -> i32 {
        match self {
            Self::Closed => 1,
            Self::Open => 0,
            Self::NoPowerSource => -1,
            Self::SwitchOpen => -2,
        }
    }

    /// Parse a status from its integer code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Closed),
            0 => Some(Self::Open),
            -1 => Some(Self::NoPowerSource),
            -2 => Some(Self::SwitchOpen),
            _ => None,
        }
    }

    /// Check whether current flows.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// User-facing message for this status.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Closed => "Current flows: the circuit is closed.",
            Self::Open => "The circuit is not closed.",
            Self::NoPowerSource => "A battery is missing.",
            Self::SwitchOpen => "A switch is open.",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// Options for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    /// When false (default), any open switch on the board blocks the whole
    /// simulation with [`SimulationStatus::SwitchOpen`]. When true, open
    /// switches only stop conducting, so they block just the loops they sit on.
    pub strict_switches: bool,
}

impl SimulationOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable per-loop switch gating.
    pub fn with_strict_switches(mut self, strict: bool) -> Self {
        self.strict_switches = strict;
        self
    }
}

/// Summary of a simulation run, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub status: SimulationStatus,
    pub code: i32,
    pub message: String,
    pub components: usize,
    pub junctions: usize,
    pub nets: usize,
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Partition of junctions into nets by coordinate equality.
struct NetMap<'a> {
    /// Net index per junction id
    net_of: HashMap<&'a JunctionId, usize>,
    /// Net index per coordinate, for terminals not (or no longer) registered
    net_at: HashMap<GridPoint, usize>,
    count: usize,
}

impl<'a> NetMap<'a> {
    fn build(junctions: &[&'a Junction]) -> Self {
        let mut set = DisjointSet::new(junctions.len());
        let mut first_at: HashMap<GridPoint, usize> = HashMap::new();
        for (idx, junction) in junctions.iter().enumerate() {
            let first = *first_at.entry(junction.position()).or_insert(idx);
            set.union(first, idx);
        }

        let mut root_to_net: HashMap<usize, usize> = HashMap::new();
        let mut net_of = HashMap::with_capacity(junctions.len());
        let mut net_at = HashMap::with_capacity(first_at.len());
        for (idx, junction) in junctions.iter().enumerate() {
            let root = set.find(idx);
            let next = root_to_net.len();
            let net = *root_to_net.entry(root).or_insert(next);
            net_of.insert(&junction.id, net);
            net_at.insert(junction.position(), net);
        }

        Self {
            count: root_to_net.len(),
            net_of,
            net_at,
        }
    }

    /// Net of a component terminal. Falls back to the terminal's own
    /// coordinates when its junction is not registered, allocating a new net
    /// if nothing else sits there.
    fn resolve(&mut self, terminal: &Junction) -> usize {
        if let Some(&net) = self.net_of.get(&terminal.id) {
            return net;
        }
        let count = &mut self.count;
        *self.net_at.entry(terminal.position()).or_insert_with(|| {
            *count += 1;
            *count - 1
        })
    }
}

/// Undirected multigraph with nets as vertices and components as edges.
struct ConductionGraph<'a> {
    /// (component, net a, net b)
    edges: Vec<(&'a Component, usize, usize)>,
    /// Per net: (neighbor net, edge index)
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl<'a> ConductionGraph<'a> {
    fn new(nets: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); nets],
        }
    }

    fn add_edge(&mut self, component: &'a Component, a: usize, b: usize) {
        let needed = a.max(b) + 1;
        if self.adjacency.len() < needed {
            self.adjacency.resize(needed, Vec::new());
        }
        let idx = self.edges.len();
        self.edges.push((component, a, b));
        self.adjacency[a].push((b, idx));
        self.adjacency[b].push((a, idx));
    }

    /// Check whether `from` reaches `to` without traversing edge `skip`.
    fn connected_without(&self, from: usize, to: usize, skip: usize) -> bool {
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back(from);
        while let Some(net) = queue.pop_front() {
            for &(next, edge) in &self.adjacency[net] {
                if edge == skip || visited[next] {
                    continue;
                }
                if next == to {
                    return true;
                }
                visited[next] = true;
                queue.push_back(next);
            }
        }
        false
    }
}

impl CircuitGraph {
    /// Decide whether the current layout forms a closed circuit.
    ///
    /// This is a pure read: the graph is not modified and repeated calls
    /// without intervening edits return the same status.
    pub fn simulate(&self) -> SimulationStatus {
        self.simulate_with(&SimulationOptions::default())
    }

    /// Run the simulation with explicit options.
    pub fn simulate_with(&self, options: &SimulationOptions) -> SimulationStatus {
        let mut components: Vec<&Component> = self.components.values().collect();
        components.sort_by(|a, b| a.id.cmp(&b.id));

        if !components.iter().any(|c| c.is_battery()) {
            return SimulationStatus::NoPowerSource;
        }

        if !options.strict_switches && components.iter().any(|c| c.is_open_switch()) {
            return SimulationStatus::SwitchOpen;
        }

        let junctions = self.sorted_junctions();
        let mut nets = NetMap::build(&junctions);
        let mut graph = ConductionGraph::new(nets.count);
        for &component in &components {
            if !component.conducts() {
                continue;
            }
            let a = nets.resolve(&component.start);
            let b = nets.resolve(&component.end);
            graph.add_edge(component, a, b);
        }

        tracing::debug!(
            components = components.len(),
            nets = nets.count,
            edges = graph.edges.len(),
            "simulating circuit"
        );

        let closed = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, (component, _, _))| component.is_battery())
            .any(|(idx, &(component, a, b))| {
                let found = graph.connected_without(a, b, idx);
                if found {
                    tracing::debug!(battery = %component.id, "found closed loop");
                }
                found
            });

        if closed {
            SimulationStatus::Closed
        } else {
            SimulationStatus::Open
        }
    }

    /// Simulate and summarize the run.
    pub fn simulate_report(&self, options: &SimulationOptions) -> SimulationReport {
        let status = self.simulate_with(options);
        SimulationReport {
            status,
            code: status.code(),
            message: status.message().to_string(),
            components: self.len(),
            junctions: self.junction_count(),
            nets: self.nets().len(),
        }
    }

    /// Group registered junctions into nets (sets of coincident junctions).
    ///
    /// Nets are returned sorted, each net's ids sorted.
    pub fn nets(&self) -> Vec<Vec<JunctionId>> {
        let junctions = self.sorted_junctions();
        let nets = NetMap::build(&junctions);
        let mut grouped = vec![Vec::new(); nets.count];
        for junction in &junctions {
            if let Some(&net) = nets.net_of.get(&junction.id) {
                grouped[net].push(junction.id.clone());
            }
        }
        for net in &mut grouped {
            net.sort();
        }
        grouped.sort();
        grouped
    }

    /// Check whether two components share at least one net.
    pub fn are_touching(&self, a: &ComponentId, b: &ComponentId) -> bool {
        let (Some(a), Some(b)) = (self.component(a), self.component(b)) else {
            return false;
        };
        let position = |j: &Junction| {
            self.junctions
                .get(&j.id)
                .map(Junction::position)
                .unwrap_or_else(|| j.position())
        };
        a.terminals()
            .iter()
            .any(|ta| b.terminals().iter().any(|tb| position(*ta) == position(*tb)))
    }

    fn sorted_junctions(&self) -> Vec<&Junction> {
        let mut junctions: Vec<&Junction> = self.junctions.values().collect();
        junctions.sort_by(|a, b| a.id.cmp(&b.id));
        junctions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Bulb, ComponentKind, Element, Resistor, Switch, Wire};
    use proptest::prelude::*;

    fn part(id: &str, element: Element, from: (i32, i32), to: (i32, i32)) -> Component {
        Component::new(
            id,
            element,
            GridPoint::new(from.0, from.1),
            GridPoint::new(to.0, to.1),
        )
    }

    fn battery(id: &str, from: (i32, i32), to: (i32, i32)) -> Component {
        part(id, Element::Battery(Battery::default()), from, to)
    }

    fn wire(id: &str, from: (i32, i32), to: (i32, i32)) -> Component {
        part(id, Element::Wire(Wire), from, to)
    }

    fn bulb(id: &str, from: (i32, i32), to: (i32, i32)) -> Component {
        part(id, Element::Bulb(Bulb), from, to)
    }

    fn switch(id: &str, on: bool, from: (i32, i32), to: (i32, i32)) -> Component {
        part(id, Element::Switch(Switch::new(on)), from, to)
    }

    /// Battery, wire, bulb, wire back to the battery.
    fn closed_loop() -> CircuitGraph {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(wire("wire_1", (40, 0), (80, 0)));
        graph.add_component(bulb("bulb_1", (80, 0), (120, 0)));
        graph.add_component(wire("wire_2", (120, 0), (0, 0)));
        graph
    }

    #[test]
    fn test_status_codes() {
        for status in [
            SimulationStatus::Closed,
            SimulationStatus::Open,
            SimulationStatus::NoPowerSource,
            SimulationStatus::SwitchOpen,
        ] {
            assert_eq!(SimulationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(SimulationStatus::from_code(7), None);
        assert_eq!(SimulationStatus::SwitchOpen.code(), -2);
    }

    #[test]
    fn test_closed_loop() {
        assert_eq!(closed_loop().simulate(), SimulationStatus::Closed);
    }

    #[test]
    fn test_open_loop() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(wire("wire_1", (40, 0), (80, 0)));
        graph.add_component(bulb("bulb_1", (80, 0), (120, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::Open);
    }

    #[test]
    fn test_open_switch_blocks() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(wire("wire_1", (40, 0), (80, 0)));
        graph.add_component(bulb("bulb_1", (80, 0), (120, 0)));
        graph.add_component(switch("switch_1", false, (120, 0), (0, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::SwitchOpen);

        let id = ComponentId::from("switch_1");
        graph.component_mut(&id).unwrap().as_switch_mut().unwrap().toggle();
        assert_eq!(graph.simulate(), SimulationStatus::Closed);
    }

    #[test]
    fn test_no_battery() {
        let mut graph = CircuitGraph::new();
        graph.add_component(bulb("bulb_1", (0, 0), (40, 0)));
        graph.add_component(wire("wire_1", (40, 0), (80, 0)));
        graph.add_component(wire("wire_2", (80, 0), (0, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::NoPowerSource);
        assert_eq!(CircuitGraph::new().simulate(), SimulationStatus::NoPowerSource);
    }

    #[test]
    fn test_missing_battery_wins_over_open_switch() {
        let mut graph = CircuitGraph::new();
        graph.add_component(switch("switch_1", false, (0, 0), (40, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::NoPowerSource);
    }

    #[test]
    fn test_open_switch_off_loop_is_board_global() {
        let mut graph = closed_loop();
        graph.add_component(switch("switch_9", false, (400, 400), (440, 400)));
        assert_eq!(graph.simulate(), SimulationStatus::SwitchOpen);

        let strict = SimulationOptions::new().with_strict_switches(true);
        assert_eq!(graph.simulate_with(&strict), SimulationStatus::Closed);
    }

    #[test]
    fn test_strict_open_switch_on_loop() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(bulb("bulb_1", (40, 0), (80, 0)));
        graph.add_component(switch("switch_1", false, (80, 0), (0, 0)));
        let strict = SimulationOptions::new().with_strict_switches(true);
        assert_eq!(graph.simulate_with(&strict), SimulationStatus::Open);
    }

    #[test]
    fn test_battery_alone_is_open() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::Open);
    }

    #[test]
    fn test_two_batteries_in_parallel_close_each_other() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(battery("bat_2", (0, 0), (40, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::Closed);
    }

    #[test]
    fn test_any_battery_with_loop_is_enough() {
        let mut graph = closed_loop();
        graph.add_component(battery("bat_2", (400, 400), (440, 400)));
        assert_eq!(graph.simulate(), SimulationStatus::Closed);
    }

    #[test]
    fn test_resistor_conducts() {
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(part("res_1", Element::Resistor(Resistor::default()), (40, 0), (40, 40)));
        graph.add_component(wire("wire_1", (40, 40), (0, 40)));
        graph.add_component(wire("wire_2", (0, 40), (0, 0)));
        assert_eq!(graph.simulate(), SimulationStatus::Closed);
    }

    #[test]
    fn test_merge_is_transitive_across_components() {
        // Three unrelated wires meet at (200, 200).
        let mut graph = CircuitGraph::new();
        graph.add_component(wire("wire_a", (160, 200), (200, 200)));
        graph.add_component(wire("wire_b", (200, 200), (240, 200)));
        graph.add_component(wire("wire_c", (200, 160), (200, 200)));
        let nets = graph.nets();
        let shared = nets
            .iter()
            .find(|net| net.len() == 3)
            .expect("three coincident junctions form one net");
        assert_eq!(
            shared,
            &vec![
                JunctionId::from("wire_a_end"),
                JunctionId::from("wire_b_start"),
                JunctionId::from("wire_c_end"),
            ]
        );
        assert!(graph.are_touching(&ComponentId::from("wire_a"), &ComponentId::from("wire_c")));
    }

    #[test]
    fn test_removal_leaves_no_residual_edge() {
        let mut graph = closed_loop();
        let removed = graph.remove_component(&ComponentId::from("wire_2")).unwrap();
        graph.remove_node(&removed.start.id);
        graph.remove_node(&removed.end.id);
        assert_eq!(graph.simulate(), SimulationStatus::Open);
        assert_eq!(graph.junction_count(), 6);
    }

    #[test]
    fn test_simulate_does_not_mutate() {
        let graph = closed_loop();
        let before = graph.nets();
        let first = graph.simulate();
        let second = graph.simulate();
        assert_eq!(first, second);
        assert_eq!(graph.nets(), before);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_report() {
        let report = closed_loop().simulate_report(&SimulationOptions::default());
        assert_eq!(report.code, 1);
        assert_eq!(report.components, 4);
        assert_eq!(report.junctions, 8);
        assert_eq!(report.nets, 4);
        assert_eq!(report.message, SimulationStatus::Closed.message());
    }

    #[test]
    fn test_registered_position_is_authoritative() {
        // Junction re-registered at a new spot without touching the component copy.
        let mut graph = CircuitGraph::new();
        graph.add_component(battery("bat_1", (0, 0), (40, 0)));
        graph.add_component(wire("wire_1", (40, 0), (80, 0)));
        graph.add_node(Junction::new("wire_1_end", 0, 0));
        assert_eq!(graph.simulate(), SimulationStatus::Closed);
    }

    fn kind_strategy() -> impl Strategy<Value = ComponentKind> {
        prop_oneof![
            Just(ComponentKind::Battery),
            Just(ComponentKind::Resistor),
            Just(ComponentKind::Bulb),
            Just(ComponentKind::Switch),
            Just(ComponentKind::Wire),
        ]
    }

    /// Random layouts on a small 4x4 grid so terminals collide often.
    fn layout_strategy() -> impl Strategy<Value = Vec<(ComponentKind, bool, (i32, i32), (i32, i32))>> {
        let point = (0..4i32, 0..4i32).prop_map(|(x, y)| (x * 40, y * 40));
        proptest::collection::vec((kind_strategy(), any::<bool>(), point.clone(), point), 0..12)
    }

    fn build(layout: &[(ComponentKind, bool, (i32, i32), (i32, i32))]) -> CircuitGraph {
        let mut graph = CircuitGraph::new();
        for (idx, (kind, on, from, to)) in layout.iter().enumerate() {
            let element = match kind {
                ComponentKind::Switch => Element::Switch(Switch::new(*on)),
                other => Element::default_for(*other),
            };
            let id = format!("{}_{}", kind.id_prefix(), idx);
            graph.add_component(part(&id, element, *from, *to));
        }
        graph
    }

    /// Reference answer: flood grid points outwards from each battery's start
    /// terminal over every other component.
    fn flood_status(layout: &[(ComponentKind, bool, (i32, i32), (i32, i32))]) -> SimulationStatus {
        let closes = |battery: usize| {
            let (_, _, from, to) = layout[battery];
            let mut reached = vec![from];
            loop {
                let before = reached.len();
                for (idx, &(_, _, a, b)) in layout.iter().enumerate() {
                    if idx == battery {
                        continue;
                    }
                    if reached.contains(&a) && !reached.contains(&b) {
                        reached.push(b);
                    } else if reached.contains(&b) && !reached.contains(&a) {
                        reached.push(a);
                    }
                }
                if reached.len() == before {
                    return reached.contains(&to);
                }
            }
        };

        let batteries: Vec<usize> = layout
            .iter()
            .enumerate()
            .filter(|(_, (kind, ..))| *kind == ComponentKind::Battery)
            .map(|(idx, _)| idx)
            .collect();
        if batteries.is_empty() {
            SimulationStatus::NoPowerSource
        } else if batteries.into_iter().any(closes) {
            SimulationStatus::Closed
        } else {
            SimulationStatus::Open
        }
    }

    proptest! {
        #[test]
        fn prop_matches_flood_fill(layout in layout_strategy()) {
            let layout: Vec<_> = layout
                .into_iter()
                .map(|(kind, on, from, to)| match kind {
                    ComponentKind::Switch => (ComponentKind::Wire, on, from, to),
                    other => (other, on, from, to),
                })
                .collect();
            prop_assert_eq!(build(&layout).simulate(), flood_status(&layout));
        }

        #[test]
        fn prop_strict_switches_match_flood_fill(layout in layout_strategy()) {
            // Open switches simply vanish from the conduction graph.
            let conducting: Vec<_> = layout
                .iter()
                .copied()
                .filter(|(kind, on, ..)| *kind != ComponentKind::Switch || *on)
                .collect();
            let options = SimulationOptions::new().with_strict_switches(true);
            let expected = if layout.iter().any(|(kind, ..)| *kind == ComponentKind::Battery) {
                flood_status(&conducting)
            } else {
                SimulationStatus::NoPowerSource
            };
            prop_assert_eq!(build(&layout).simulate_with(&options), expected);
        }

        #[test]
        fn prop_no_battery_means_missing_source(layout in layout_strategy()) {
            let layout: Vec<_> = layout
                .into_iter()
                .filter(|(kind, ..)| *kind != ComponentKind::Battery)
                .collect();
            prop_assert_eq!(build(&layout).simulate(), SimulationStatus::NoPowerSource);
        }

        #[test]
        fn prop_open_switch_with_battery(layout in layout_strategy()) {
            let mut layout = layout;
            layout.push((ComponentKind::Battery, true, (0, 0), (40, 0)));
            layout.push((ComponentKind::Switch, false, (80, 80), (120, 80)));
            prop_assert_eq!(build(&layout).simulate(), SimulationStatus::SwitchOpen);
        }

        #[test]
        fn prop_simulate_is_idempotent(layout in layout_strategy()) {
            let graph = build(&layout);
            prop_assert_eq!(graph.simulate(), graph.simulate());
        }

        #[test]
        fn prop_removal_equals_never_added(layout in layout_strategy(), extra in layout_strategy()) {
            let baseline = build(&layout);
            let mut graph = build(&layout);
            for (idx, (kind, on, from, to)) in extra.iter().enumerate() {
                let element = match kind {
                    ComponentKind::Switch => Element::Switch(Switch::new(*on)),
                    other => Element::default_for(*other),
                };
                graph.add_component(part(&format!("extra_{}", idx), element, *from, *to));
            }
            for idx in 0..extra.len() {
                graph.remove_component(&ComponentId(format!("extra_{}", idx)));
            }
            prop_assert_eq!(graph.simulate(), baseline.simulate());
            prop_assert_eq!(graph.nets(), baseline.nets());
        }
    }
}
