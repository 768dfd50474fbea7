use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::buffers::{AttribInfo, BufferInfo};
use crate::consts;
use crate::context::RenderContext;

/// Binds one attribute location to a buffer or a constant value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribSetter {
    pub location: u32,
}

impl AttribSetter {
    pub fn set<C: RenderContext>(&self, ctx: &C, info: &AttribInfo<C::Buffer>) {
        match info {
            AttribInfo::Buffer(b) => {
                ctx.bind_buffer(consts::ARRAY_BUFFER, Some(&b.buffer));
                ctx.enable_vertex_attrib_array(self.location);
                ctx.vertex_attrib_pointer(
                    self.location,
                    // At most 4 components.
                    b.num_components as i32,
                    b.element_type.gl_code(),
                    b.normalize,
                    b.stride,
                    b.offset,
                );
            }
            AttribInfo::Constant(value) => {
                // Missing components take the GL defaults (0, 0, 0, 1).
                let mut v = [0.0, 0.0, 0.0, 1.0];
                for (dst, src) in v.iter_mut().zip(value) {
                    *dst = *src;
                }
                ctx.disable_vertex_attrib_array(self.location);
                ctx.vertex_attrib4fv(self.location, &v);
            }
        }
    }
}

pub type AttribSetters = HashMap<String, AttribSetter>;

/// One setter per active attribute of `program`, keyed by name.
pub fn create_attribute_setters<C: RenderContext>(
    ctx: &C,
    program: &C::Program,
) -> AttribSetters {
    let mut setters = HashMap::new();
    for index in 0..ctx.active_attribute_count(program) {
        let Some(info) = ctx.active_attribute(program, index) else {
            break;
        };
        // Negative locations mark attributes the linker dropped.
        let Ok(location) = u32::try_from(ctx.attrib_location(program, &info.name)) else {
            continue;
        };
        setters.insert(info.name, AttribSetter { location });
    }
    debug!("created {} attribute setters", setters.len());
    setters
}

/// Applies every attribute the program declares; the rest are skipped.
pub fn set_attributes<C: RenderContext>(
    ctx: &C,
    setters: &AttribSetters,
    attribs: &BTreeMap<String, AttribInfo<C::Buffer>>,
) {
    for (name, info) in attribs {
        if let Some(setter) = setters.get(name) {
            setter.set(ctx, info);
        }
    }
}

/// Sets attributes and, when the geometry is indexed, binds its element
/// array buffer.
pub fn set_buffers_and_attributes<C: RenderContext>(
    ctx: &C,
    setters: &AttribSetters,
    buffers: &BufferInfo<C::Buffer>,
) {
    set_attributes(ctx, setters, &buffers.attribs);
    if let Some(indices) = &buffers.indices {
        ctx.bind_buffer(consts::ELEMENT_ARRAY_BUFFER, Some(&indices.buffer));
    }
}

/// Issues the draw for `buffers`: indexed when it has indices.
pub fn draw_buffer_info<C: RenderContext>(ctx: &C, buffers: &BufferInfo<C::Buffer>, mode: u32) {
    let Ok(count) = i32::try_from(buffers.num_elements) else {
        warn!("{} elements exceed a single draw call; skipped", buffers.num_elements);
        return;
    };
    match &buffers.indices {
        Some(indices) => ctx.draw_elements(mode, count, indices.element_type.gl_code(), 0),
        None => ctx.draw_arrays(mode, 0, count),
    }
}
