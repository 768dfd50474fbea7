use log::warn;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation,
};

use crate::context::{ActiveInfo, RenderContext};

/// [`RenderContext`] over a browser WebGL2 context.
pub struct WebGlContext {
    gl: GL,
}

impl WebGlContext {
    pub fn new(gl: GL) -> Self {
        Self { gl }
    }

    /// The raw context, for frame setup the marshalling layer does not cover.
    pub fn gl(&self) -> &GL {
        &self.gl
    }
}

impl RenderContext for WebGlContext {
    type Buffer = WebGlBuffer;
    type Texture = WebGlTexture;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type UniformLocation = WebGlUniformLocation;

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.gl.create_buffer()
    }

    fn bind_buffer(&self, target: u32, buffer: Option<&WebGlBuffer>) {
        self.gl.bind_buffer(target, buffer);
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.gl.buffer_data_with_u8_array(target, data, usage);
    }

    fn create_shader(&self, kind: u32) -> Option<WebGlShader> {
        self.gl.create_shader(kind)
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        self.gl.shader_source(shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        self.gl.compile_shader(shader);
    }

    fn shader_compiled(&self, shader: &WebGlShader) -> bool {
        self.gl
            .get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.gl.get_shader_info_log(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        self.gl.delete_shader(Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.gl.create_program()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        self.gl.link_program(program);
    }

    fn program_linked(&self, program: &WebGlProgram) -> bool {
        self.gl
            .get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.gl.get_program_info_log(program).unwrap_or_default()
    }

    fn delete_program(&self, program: &WebGlProgram) {
        self.gl.delete_program(Some(program));
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        self.gl.use_program(program);
    }

    fn active_uniform_count(&self, program: &WebGlProgram) -> u32 {
        self.gl
            .get_program_parameter(program, GL::ACTIVE_UNIFORMS)
            .as_f64()
            .unwrap_or(0.0) as u32
    }

    fn active_uniform(&self, program: &WebGlProgram, index: u32) -> Option<ActiveInfo> {
        self.gl
            .get_active_uniform(program, index)
            .map(|info| ActiveInfo::new(info.name(), info.size(), info.type_()))
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn active_attribute_count(&self, program: &WebGlProgram) -> u32 {
        self.gl
            .get_program_parameter(program, GL::ACTIVE_ATTRIBUTES)
            .as_f64()
            .unwrap_or(0.0) as u32
    }

    fn active_attribute(&self, program: &WebGlProgram, index: u32) -> Option<ActiveInfo> {
        self.gl
            .get_active_attrib(program, index)
            .map(|info| ActiveInfo::new(info.name(), info.size(), info.type_()))
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        self.gl.get_attrib_location(program, name)
    }

    fn uniform1f(&self, location: &WebGlUniformLocation, value: f32) {
        self.gl.uniform1f(Some(location), value);
    }

    fn uniform1i(&self, location: &WebGlUniformLocation, value: i32) {
        self.gl.uniform1i(Some(location), value);
    }

    fn uniform_fv(&self, location: &WebGlUniformLocation, arity: u8, values: &[f32]) {
        let loc = Some(location);
        match arity {
            1 => self.gl.uniform1fv_with_f32_array(loc, values),
            2 => self.gl.uniform2fv_with_f32_array(loc, values),
            3 => self.gl.uniform3fv_with_f32_array(loc, values),
            4 => self.gl.uniform4fv_with_f32_array(loc, values),
            _ => warn!("no float uniform upload of width {arity}"),
        }
    }

    fn uniform_iv(&self, location: &WebGlUniformLocation, arity: u8, values: &[i32]) {
        let loc = Some(location);
        match arity {
            1 => self.gl.uniform1iv_with_i32_array(loc, values),
            2 => self.gl.uniform2iv_with_i32_array(loc, values),
            3 => self.gl.uniform3iv_with_i32_array(loc, values),
            4 => self.gl.uniform4iv_with_i32_array(loc, values),
            _ => warn!("no int uniform upload of width {arity}"),
        }
    }

    fn uniform_matrix_fv(&self, location: &WebGlUniformLocation, dim: u8, values: &[f32]) {
        let loc = Some(location);
        match dim {
            2 => self.gl.uniform_matrix2fv_with_f32_array(loc, false, values),
            3 => self.gl.uniform_matrix3fv_with_f32_array(loc, false, values),
            4 => self.gl.uniform_matrix4fv_with_f32_array(loc, false, values),
            _ => warn!("no matrix uniform upload of dimension {dim}"),
        }
    }

    fn active_texture(&self, unit: u32) {
        self.gl.active_texture(unit);
    }

    fn bind_texture(&self, target: u32, texture: Option<&WebGlTexture>) {
        self.gl.bind_texture(target, texture);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.gl.enable_vertex_attrib_array(index);
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.gl.disable_vertex_attrib_array(index);
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        element_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.gl
            .vertex_attrib_pointer_with_i32(index, size, element_type, normalized, stride, offset);
    }

    fn vertex_attrib4fv(&self, index: u32, values: &[f32; 4]) {
        self.gl.vertex_attrib4fv_with_f32_array(index, values);
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.gl.draw_arrays(mode, first, count);
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.gl.draw_elements_with_i32(mode, count, element_type, offset);
    }
}
