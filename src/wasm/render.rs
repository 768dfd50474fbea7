use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlCanvasElement, WebGl2RenderingContext as GL};

use super::context::WebGlContext;
use crate::buffers::create_buffer_info_from_arrays;
use crate::config::StarFieldConfig;
use crate::program::create_program_info;
use crate::starfield::{star_geometry, StarField, STAR_FRAGMENT_SHADER, STAR_VERTEX_SHADER};

/// Matches the backing store to the canvas' displayed size. Returns whether
/// it changed.
pub fn resize_canvas_to_display_size(canvas: &HtmlCanvasElement, multiplier: f64) -> bool {
    let width = (canvas.client_width() as f64 * multiplier) as u32;
    let height = (canvas.client_height() as f64 * multiplier) as u32;
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
        return true;
    }
    false
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(f.as_ref().unchecked_ref())
}

/// Set up the star field and start the render loop.
pub fn start(canvas: HtmlCanvasElement, config: StarFieldConfig) -> Result<(), JsValue> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let ctx = WebGlContext::new(gl);
    ctx.gl().enable(GL::DEPTH_TEST);

    let program = create_program_info(&ctx, STAR_VERTEX_SHADER, STAR_FRAGMENT_SHADER)?;
    let buffers = create_buffer_info_from_arrays(&ctx, &star_geometry(), None)?;
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    let mut field = StarField::new(&config, seed);
    info!("Star geometry: {} vertices", buffers.num_elements);

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
        resize_canvas_to_display_size(&canvas, 1.0);
        let gl = ctx.gl();
        gl.viewport(0, 0, canvas.width() as i32, canvas.height() as i32);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let aspect = canvas.client_width() as f32 / canvas.client_height().max(1) as f32;
        if let Err(err) = field.draw(&ctx, &program, &buffers, aspect, time) {
            error!("Frame failed, stopping render loop: {err}");
            return;
        }

        // schedule next
        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = request_animation_frame(next) {
                error!("request_animation_frame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(first) = g.borrow().as_ref() {
        request_animation_frame(first)?;
    }
    Ok(())
}
