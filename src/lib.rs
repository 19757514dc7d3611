//! # Circuit Lab Core
//!
//! The circuit engine behind a browser circuit-building game.
//!
//! Learners drag batteries, resistors, bulbs, switches and wires onto a
//! grid, connect their terminals by placing them on the same grid points,
//! and ask whether current flows. This library provides:
//! - A grid model with snapping and 0°/90° rotation
//! - A junction/component graph that stays consistent across edits
//! - Closed-loop detection with the game's status codes
//! - Challenge grading against the component palette
//! - A small text format for describing layouts
//!
//! ## Architecture
//!
//! - [`layout`] - Grid points, snapping and rotation
//! - [`circuit`] - Junctions, the circuit graph and the simulation
//! - [`components`] - Component models (battery, resistor, bulb, switch, wire)
//! - [`workbench`] - Edit operations of a play session
//! - [`challenge`] - Palette items and challenge grading
//! - [`dsl`] - Parser for the layout format
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuitlab loop.lab --format json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmWorkbench } from 'circuitlab_core';
//!
//! const bench = new WasmWorkbench();
//! const id = bench.place('battery', 283, 118);
//! const code = bench.simulate(); // 1 closed, 0 open, -1 no battery, -2 switch open
//! ```
//!
//! ## Simulation Method
//!
//! The engine answers a single yes/no question and computes no voltages:
//!
//! 1. Junctions sharing a grid point are merged into nets
//! 2. Each conducting component becomes an edge between two nets
//! 3. A battery closes a loop when its terminal nets stay connected without it

pub mod challenge;
pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod layout;
pub mod workbench;

// Re-export main types for convenience
pub use challenge::{Challenge, ChallengeOutcome, PaletteItem};
pub use circuit::{CircuitGraph, SimulationStatus};
pub use error::{LabError, Result};
pub use workbench::Workbench;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWorkbench;
