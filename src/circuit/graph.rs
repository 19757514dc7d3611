//! Circuit graph structure.

use std::collections::HashMap;

use super::junction::Junction;
use super::types::{ComponentId, JunctionId};
use crate::components::{Component, ComponentKind};

/// The live set of junctions and components on a workbench.
///
/// All registry operations are idempotent and never fail: the UI issues them
/// opportunistically during drag and drop. Removals report what was removed
/// for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CircuitGraph {
    /// Junctions keyed by id (terminals of live components)
    pub(crate) junctions: HashMap<JunctionId, Junction>,
    /// Components keyed by id
    pub(crate) components: HashMap<ComponentId, Component>,
}

impl CircuitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a junction by id.
    pub fn add_node(&mut self, junction: Junction) {
        self.junctions.insert(junction.id.clone(), junction);
    }

    /// Remove a junction by id, scrubbing it from every neighbor set.
    ///
    /// Returns the removed junction, or `None` if it was not registered.
    pub fn remove_node(&mut self, id: &JunctionId) -> Option<Junction> {
        let removed = self.junctions.remove(id)?;
        for junction in self.junctions.values_mut() {
            junction.neighbors.remove(id);
        }
        for component in self.components.values_mut() {
            component.start.neighbors.remove(id);
            component.end.neighbors.remove(id);
        }
        Some(removed)
    }

    /// Register a component together with both of its terminals.
    ///
    /// Re-adding an id replaces the previous component and its junctions.
    pub fn add_component(&mut self, component: Component) {
        if let Some(previous) = self.components.remove(&component.id) {
            self.junctions.remove(&previous.start.id);
            self.junctions.remove(&previous.end.id);
        }
        self.add_node(component.start.clone());
        self.add_node(component.end.clone());
        self.components.insert(component.id.clone(), component);
    }

    /// Deregister a component and both of its terminals.
    ///
    /// Removing the terminals again afterwards through [`remove_node`] is a
    /// harmless no-op.
    ///
    /// [`remove_node`]: CircuitGraph::remove_node
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<Component> {
        let component = self.components.remove(id)?;
        self.remove_node(&component.start.id);
        self.remove_node(&component.end.id);
        Some(component)
    }

    /// Re-register a component's terminals after an in-place edit.
    ///
    /// Returns `false` if the component is not registered.
    pub fn sync_terminals(&mut self, id: &ComponentId) -> bool {
        let Some(component) = self.components.get(id) else {
            return false;
        };
        let (start, end) = (component.start.clone(), component.end.clone());
        self.add_node(start);
        self.add_node(end);
        true
    }

    /// Get a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Get a mutable component by id.
    ///
    /// Call [`sync_terminals`](CircuitGraph::sync_terminals) after moving it.
    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    /// Iterate over all components.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Get a junction by id.
    pub fn junction(&self, id: &JunctionId) -> Option<&Junction> {
        self.junctions.get(id)
    }

    /// Iterate over all junctions.
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    /// Kinds of all registered components, ordered by component id.
    pub fn placed_kinds(&self) -> Vec<ComponentKind> {
        let mut placed: Vec<_> = self.components.values().collect();
        placed.sort_by(|a, b| a.id.cmp(&b.id));
        placed.into_iter().map(Component::kind).collect()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check whether no component is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of registered junctions.
    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    /// Remove every component and junction.
    pub fn clear(&mut self) {
        self.components.clear();
        self.junctions.clear();
    }
}
