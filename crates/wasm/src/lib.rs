#![deny(unsafe_code)]
//! WASM bindings for drift.
//!
//! JS owns the animation loop and the DOM listeners: it calls `frame()` from
//! `requestAnimationFrame` and forwards pointer and resize events. Each handle
//! keeps a [`ManualHost`] so the engines' frame and listener bookkeeping
//! behaves exactly as it does headlessly, and `frame()` reports `false` once
//! the handle has been torn down.

use drift_core::{Engine, ManualHost, Srgb, Surface};
use drift_flow::FlowField;
use drift_morph::ShapeMorph;
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_params(params: &str) -> Result<serde_json::Value, JsValue> {
    if params.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(params).map_err(js_error)
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| js_error("not a 2d context"))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn fill(&mut self, color: Srgb, alpha: f64) {
        let (w, h) = self.size();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Srgb) {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.begin_path();
        // Errors only on a negative radius.
        self.ctx.arc(x, y, radius.max(0.0), 0.0, TAU).ok();
        self.ctx.fill();
    }
}

/// Flow field bound to a canvas.
#[wasm_bindgen]
pub struct FlowHandle {
    flow: FlowField<CanvasSurface>,
    host: ManualHost,
}

#[wasm_bindgen]
impl FlowHandle {
    /// Starts a flow field on `canvas`. `params` is a JSON object string
    /// (empty for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, params: &str, seed: u64) -> Result<FlowHandle, JsValue> {
        let params = parse_params(params)?;
        let surface = CanvasSurface::new(canvas)?;
        let mut host = ManualHost::new();
        let flow = FlowField::from_json(Some(surface), &params, &mut host, seed).map_err(js_error)?;
        Ok(FlowHandle { flow, host })
    }

    /// Runs one frame if one is pending. Returns `false` after teardown.
    pub fn frame(&mut self) -> bool {
        match self.host.take_frame() {
            Some(frame) => self.flow.on_frame(&mut self.host, frame),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.flow.on_pointer_move(x, y);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.flow.on_pointer_leave();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.flow.on_resize(width, height);
    }

    /// Replaces the configuration; the old one stays on error.
    pub fn reconfigure(&mut self, params: &str) -> Result<(), JsValue> {
        let config = drift_flow::FlowConfig::from_json(&parse_params(params)?).map_err(js_error)?;
        self.flow.reconfigure(config).map_err(js_error)
    }

    /// Listeners the page should keep attached (0 after teardown).
    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.host.active_listeners()
    }

    pub fn teardown(&mut self) {
        self.flow.teardown(&mut self.host);
    }

    pub fn params(&self) -> String {
        self.flow.params().to_string()
    }
}

/// Shape morph whose positions JS copies into a render buffer each frame.
#[wasm_bindgen]
pub struct MorphHandle {
    morph: ShapeMorph,
    host: ManualHost,
}

#[wasm_bindgen]
impl MorphHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(params: &str, seed: u64) -> Result<MorphHandle, JsValue> {
        let mut morph = ShapeMorph::from_json(&parse_params(params)?, seed).map_err(js_error)?;
        let mut host = ManualHost::new();
        morph.start(&mut host);
        Ok(MorphHandle { morph, host })
    }

    /// Advances by `dt` seconds if a frame is pending. Returns `false` after
    /// teardown.
    pub fn frame(&mut self, dt: f64) -> bool {
        match self.host.take_frame() {
            Some(frame) => self.morph.on_frame(&mut self.host, frame, dt),
            None => false,
        }
    }

    /// Copy of the flat `x, y, z` buffer.
    pub fn positions(&self) -> Vec<f32> {
        self.morph.positions().to_vec()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.morph.point_count()
    }

    pub fn progress(&self) -> f64 {
        self.morph.progress()
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.morph.current_index()
    }

    /// Hex color of every point.
    pub fn color(&self) -> String {
        self.morph.config().color.to_hex()
    }

    pub fn teardown(&mut self) {
        self.morph.teardown(&mut self.host);
    }
}
