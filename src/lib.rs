#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod attributes;
pub mod buffers;
pub mod config;
pub mod consts;
pub mod context;
pub mod error;
pub mod program;
pub mod starfield;
pub mod uniforms;

pub use buffers::{
    create_buffer_info_from_arrays, AttribBinding, AttribInfo, AttributeData, AttributeSource,
    BufferInfo, ElementType, TypedArray, VertexArrays,
};
pub use context::{ActiveInfo, RenderContext};
pub use error::{GlError, Result};
pub use uniforms::{apply_uniforms, create_uniform_setters, UniformValue, Uniforms};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::StarFieldConfig;

    mod context;
    mod render;

    pub use context::WebGlContext;
    pub use render::resize_canvas_to_display_size;

    fn init_logging() {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        init_logging();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let config = canvas
            .get_attribute("data-config")
            .map(|json| StarFieldConfig::from_json(&json))
            .unwrap_or_default();

        render::start(canvas, config).map_err(|err| {
            log::error!("Star field failed to start: {err:?}");
            err
        })
    }
}
