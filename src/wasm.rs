//! WASM bindings for Circuit Lab Core.
//!
//! This module exposes a [`Workbench`] to the browser game. Component ids
//! cross the boundary as strings, simulation results as the integer status
//! codes the game already understands.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWorkbench } from 'circuitlab_core';
//!
//! await init();
//!
//! const bench = new WasmWorkbench();
//! const battery = bench.place('battery', 283, 118);
//! bench.rotate(battery);
//!
//! const code = bench.simulate();
//! statusText.setText(bench.status_message(code));
//!
//! // Continuous mode: call tick() every 2 seconds
//! bench.start_continuous();
//! setInterval(() => bench.tick(), 2000);
//! ```

use wasm_bindgen::prelude::*;

use crate::challenge::PaletteItem;
use crate::circuit::{ComponentId, SimulationStatus};
use crate::dsl;
use crate::error::LabError;
use crate::workbench::Workbench;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: LabError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible workbench.
#[wasm_bindgen]
pub struct WasmWorkbench {
    bench: Workbench,
}

#[wasm_bindgen]
impl WasmWorkbench {
    /// Create an empty workbench on the default grid.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmWorkbench {
        WasmWorkbench {
            bench: Workbench::new(),
        }
    }

    /// Create a workbench from layout text.
    #[wasm_bindgen]
    pub fn from_layout(layout: &str) -> Result<WasmWorkbench, JsValue> {
        let ast = dsl::parse(layout).map_err(to_js)?;
        let bench = Workbench::from_ast(&ast).map_err(to_js)?;
        Ok(WasmWorkbench { bench })
    }

    /// Drop a palette item (e.g. `"switch_off"`) at a pointer position.
    /// Returns the new component id.
    #[wasm_bindgen]
    pub fn place(&mut self, item: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let item: PaletteItem = item.parse().map_err(to_js)?;
        let id = self.bench.place(item, x, y).map_err(to_js)?;
        Ok(id.to_string())
    }

    /// Move a component; its centre snaps to the grid.
    #[wasm_bindgen]
    pub fn move_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.bench.move_to(&ComponentId::from(id), x, y).map_err(to_js)
    }

    /// Toggle a component's rotation. Returns the new angle in degrees.
    #[wasm_bindgen]
    pub fn rotate(&mut self, id: &str) -> Result<u16, JsValue> {
        let rotation = self.bench.rotate(&ComponentId::from(id)).map_err(to_js)?;
        Ok(rotation.degrees())
    }

    /// Flip a switch while continuous simulation runs. Returns the new state.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: &str) -> Result<bool, JsValue> {
        self.bench.toggle_switch(&ComponentId::from(id)).map_err(to_js)
    }

    /// Delete a component.
    #[wasm_bindgen]
    pub fn remove(&mut self, id: &str) -> Result<(), JsValue> {
        self.bench.remove(&ComponentId::from(id)).map(|_| ()).map_err(to_js)
    }

    /// Run the simulation; returns 1, 0, -1 or -2.
    #[wasm_bindgen]
    pub fn simulate(&mut self) -> i32 {
        self.bench.simulate().code()
    }

    /// User-facing message for a status code.
    #[wasm_bindgen]
    pub fn status_message(&self, code: i32) -> Result<String, JsValue> {
        SimulationStatus::from_code(code)
            .map(|status| status.message().to_string())
            .ok_or_else(|| {
                to_js(LabError::WasmError {
                    message: format!("unknown status code {}", code),
                })
            })
    }

    /// Kind names of all placed components, ordered by id.
    #[wasm_bindgen]
    pub fn placed_kinds(&self) -> Vec<String> {
        self.bench
            .placed_kinds()
            .into_iter()
            .map(|kind| kind.to_string())
            .collect()
    }

    /// Start continuous simulation.
    #[wasm_bindgen]
    pub fn start_continuous(&mut self) {
        self.bench.start_continuous();
    }

    /// Stop continuous simulation.
    #[wasm_bindgen]
    pub fn stop_continuous(&mut self) {
        self.bench.stop_continuous();
    }

    /// Timer callback. Returns the status code, or `undefined` when
    /// continuous simulation is stopped.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Option<i32> {
        self.bench.tick().map(|status| status.code())
    }
}

impl Default for WasmWorkbench {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
