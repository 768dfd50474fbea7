use log::{error, info};

use crate::attributes::{create_attribute_setters, AttribSetters};
use crate::consts;
use crate::context::RenderContext;
use crate::error::{GlError, Result};
use crate::uniforms::{create_uniform_setters, UniformSetters};

/// Compiles one stage. A failed shader is deleted and its info log returned.
pub fn compile_shader<C: RenderContext>(ctx: &C, source: &str, kind: u32) -> Result<C::Shader> {
    let shader = ctx.create_shader(kind).ok_or(GlError::Resource("shader"))?;
    ctx.shader_source(&shader, source);
    ctx.compile_shader(&shader);
    if !ctx.shader_compiled(&shader) {
        let log = ctx.shader_info_log(&shader);
        ctx.delete_shader(&shader);
        error!("could not compile shader: {log}");
        return Err(GlError::ShaderCompile(log));
    }
    Ok(shader)
}

/// Links a program from two compiled stages.
pub fn create_program<C: RenderContext>(
    ctx: &C,
    vertex: &C::Shader,
    fragment: &C::Shader,
) -> Result<C::Program> {
    let program = ctx.create_program().ok_or(GlError::Resource("program"))?;
    ctx.attach_shader(&program, vertex);
    ctx.attach_shader(&program, fragment);
    ctx.link_program(&program);
    if !ctx.program_linked(&program) {
        let log = ctx.program_info_log(&program);
        ctx.delete_program(&program);
        error!("program failed to link: {log}");
        return Err(GlError::ProgramLink(log));
    }
    Ok(program)
}

/// A linked program together with its setters.
pub struct ProgramInfo<C: RenderContext> {
    pub program: C::Program,
    pub uniform_setters: UniformSetters<C>,
    pub attrib_setters: AttribSetters,
}

/// Compiles, links and introspects a program from GLSL sources.
pub fn create_program_info<C: RenderContext>(
    ctx: &C,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ProgramInfo<C>> {
    let vertex = compile_shader(ctx, vertex_source, consts::VERTEX_SHADER)?;
    let fragment = match compile_shader(ctx, fragment_source, consts::FRAGMENT_SHADER) {
        Ok(s) => s,
        Err(e) => {
            ctx.delete_shader(&vertex);
            return Err(e);
        }
    };
    let linked = create_program(ctx, &vertex, &fragment);
    // Shaders stay alive while attached; release our handles either way.
    ctx.delete_shader(&vertex);
    ctx.delete_shader(&fragment);
    let program = linked?;

    let uniform_setters = create_uniform_setters(ctx, &program)?;
    let attrib_setters = create_attribute_setters(ctx, &program);
    info!(
        "program ready: {} uniforms, {} attributes",
        uniform_setters.len(),
        attrib_setters.len()
    );
    Ok(ProgramInfo {
        program,
        uniform_setters,
        attrib_setters,
    })
}
