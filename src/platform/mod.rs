//! Platform abstraction layer
//!
//! On the web, exposes the session to JavaScript. The page owns the canvas,
//! the input widgets and the `requestAnimationFrame` loop; each frame it calls
//! `advance(dt)` and redraws from `curve()` and `ball()`.

#[cfg(target_arch = "wasm32")]
pub mod web {
    use js_sys::Float64Array;
    use wasm_bindgen::prelude::*;

    use crate::error::SimError;
    use crate::settings::Settings;
    use crate::sim::{CurveKind, DemoMode, Handle, Point, SessionPhase, SimulationSession};

    fn to_js(e: SimError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn parse_handle(name: &str) -> Option<Handle> {
        match name.to_ascii_uppercase().as_str() {
            "A" => Some(Handle::A),
            "B" => Some(Handle::B),
            "C" => Some(Handle::C),
            _ => None,
        }
    }

    fn handle_name(handle: Handle) -> &'static str {
        match handle {
            Handle::A => "A",
            Handle::B => "B",
            Handle::C => "C",
        }
    }

    /// Install panic hook and console logger
    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }
        log::info!("Brachisto starting...");
    }

    #[wasm_bindgen]
    pub struct WasmSession {
        inner: SimulationSession,
    }

    #[wasm_bindgen]
    impl WasmSession {
        /// Session from optional settings JSON, built and ready to draw
        #[wasm_bindgen(constructor)]
        pub fn new(settings_json: Option<String>) -> Result<WasmSession, JsValue> {
            let settings = match settings_json {
                Some(json) => Settings::from_json(&json).map_err(to_js)?,
                None => Settings::default(),
            };
            let mut inner = SimulationSession::new(settings).map_err(to_js)?;
            inner.rebuild().map_err(to_js)?;
            Ok(WasmSession { inner })
        }

        pub fn rebuild(&mut self) -> Result<(), JsValue> {
            self.inner.rebuild().map_err(to_js)
        }

        pub fn start(&mut self) -> Result<(), JsValue> {
            self.inner.start().map_err(to_js)
        }

        pub fn stop(&mut self) {
            self.inner.stop();
        }

        /// Step by `dt` real seconds; returns true while still running
        pub fn advance(&mut self, dt: f64) -> bool {
            self.inner.advance(dt) == SessionPhase::Running
        }

        #[wasm_bindgen(js_name = setKind)]
        pub fn set_kind(&mut self, name: &str) -> Result<(), JsValue> {
            let kind = CurveKind::from_str(name)
                .ok_or_else(|| JsValue::from_str(&format!("unknown curve '{}'", name)))?;
            self.inner.set_kind(kind).map_err(to_js)
        }

        #[wasm_bindgen(js_name = setGravity)]
        pub fn set_gravity(&mut self, g: f64) -> Result<(), JsValue> {
            self.inner.set_gravity(g).map_err(to_js)
        }

        #[wasm_bindgen(js_name = setSamples)]
        pub fn set_samples(&mut self, n: usize) -> Result<(), JsValue> {
            self.inner.set_samples(n).map_err(to_js)
        }

        #[wasm_bindgen(js_name = setTimeScale)]
        pub fn set_time_scale(&mut self, scale: f64) -> Result<(), JsValue> {
            self.inner.set_time_scale(scale).map_err(to_js)
        }

        /// 0 = fixed endpoints, 1 = draggable endpoints, 2 = draggable control
        #[wasm_bindgen(js_name = setMode)]
        pub fn set_mode(&mut self, mode: u8) {
            self.inner.set_mode(match mode {
                0 => DemoMode::FixedEndpoints,
                1 => DemoMode::DraggableEndpoints,
                _ => DemoMode::DraggableControl,
            });
        }

        /// Handle name ("A", "B", "C") under a world-space point, or undefined
        #[wasm_bindgen(js_name = pickHandle)]
        pub fn pick_handle(&self, x: f64, y: f64, radius: f64) -> Option<String> {
            self.inner
                .pick_handle(Point::new(x, y), radius)
                .map(|h| handle_name(h).to_string())
        }

        /// Move a handle; false when ignored (running, or locked by mode)
        #[wasm_bindgen(js_name = setPoint)]
        pub fn set_point(&mut self, handle: &str, x: f64, y: f64) -> Result<bool, JsValue> {
            let handle = parse_handle(handle)
                .ok_or_else(|| JsValue::from_str(&format!("unknown handle '{}'", handle)))?;
            self.inner.set_point(handle, Point::new(x, y)).map_err(to_js)
        }

        #[wasm_bindgen(js_name = resetPoints)]
        pub fn reset_points(&mut self) -> Result<(), JsValue> {
            self.inner.reset_points().map_err(to_js)
        }

        /// Curve as flat `[x0, y0, x1, y1, ...]`
        pub fn curve(&self) -> Float64Array {
            let flat: Vec<f64> = self
                .inner
                .curve()
                .map(|c| c.points.iter().flat_map(|p| [p.x, p.y]).collect())
                .unwrap_or_default();
            Float64Array::from(flat.as_slice())
        }

        /// Ball position as `[x, y]` (empty before the first build)
        pub fn ball(&self) -> Float64Array {
            let flat: Vec<f64> = self.inner.ball().map(|p| vec![p.x, p.y]).unwrap_or_default();
            Float64Array::from(flat.as_slice())
        }

        pub fn feasible(&self) -> bool {
            self.inner.feasible().unwrap_or(false)
        }

        #[wasm_bindgen(js_name = usedFallback)]
        pub fn used_fallback(&self) -> bool {
            self.inner.curve().is_some_and(|c| c.used_fallback)
        }

        /// Total time, or undefined when infeasible
        #[wasm_bindgen(js_name = totalTime)]
        pub fn total_time(&self) -> Option<f64> {
            self.inner.reported_time()
        }

        #[wasm_bindgen(js_name = currentTime)]
        pub fn current_time(&self) -> f64 {
            self.inner.current_time()
        }

        #[wasm_bindgen(js_name = isRunning)]
        pub fn is_running(&self) -> bool {
            self.inner.is_running()
        }

        /// Race results for the current points as JSON
        #[wasm_bindgen(js_name = raceJson)]
        pub fn race_json(&self) -> Result<String, JsValue> {
            let board = crate::race(self.inner.points(), self.inner.settings()).map_err(to_js)?;
            serde_json::to_string(&board).map_err(|e| JsValue::from_str(&e.to_string()))
        }
    }
}
