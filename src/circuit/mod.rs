//! Circuit graph representation and closed-loop simulation.
//!
//! This module provides the [`CircuitGraph`] registry of junctions and
//! components, and the [`simulate`](CircuitGraph::simulate) decision procedure
//! that classifies the layout with a [`SimulationStatus`].

mod graph;
mod junction;
mod simulate;
mod types;

pub use graph::CircuitGraph;
pub use junction::Junction;
pub use simulate::{SimulationOptions, SimulationReport, SimulationStatus};
pub use types::*;
