#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use starfield_gl::{ActiveInfo, RenderContext};

/// Every call the marshalling layer makes, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BindBuffer(u32, Option<u32>),
    BufferData { target: u32, bytes: Vec<u8>, usage: u32 },
    UseProgram(Option<u32>),
    Uniform1f(String, f32),
    Uniform1i(String, i32),
    UniformFv(String, u8, Vec<f32>),
    UniformIv(String, u8, Vec<i32>),
    UniformMatrixFv(String, u8, Vec<f32>),
    ActiveTexture(u32),
    BindTexture(u32, Option<u32>),
    EnableAttrib(u32),
    DisableAttrib(u32),
    AttribPointer { index: u32, size: i32, element_type: u32, normalized: bool },
    Attrib4fv(u32, [f32; 4]),
    DrawArrays(u32, i32, i32),
    DrawElements(u32, i32, u32),
    DeleteShader(u32),
    DeleteProgram(u32),
}

/// A context that hands out integer handles and records what it is asked to
/// do. Uniform locations are the names they were looked up with.
#[derive(Default)]
pub struct RecordingContext {
    pub calls: RefCell<Vec<Call>>,
    pub uniforms: Vec<ActiveInfo>,
    pub attributes: Vec<ActiveInfo>,
    pub compile_error: Option<String>,
    pub link_error: Option<String>,
    /// Uniforms reported active but without a location.
    pub unlocated_uniforms: Vec<String>,
    /// Attributes reported active but at location -1.
    pub dropped_attributes: Vec<String>,
    next_handle: Cell<u32>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, uniforms: Vec<ActiveInfo>) -> Self {
        self.uniforms = uniforms;
        self
    }

    /// Active attributes get locations in the order given.
    pub fn with_attributes(mut self, names: &[&str]) -> Self {
        self.attributes = names
            .iter()
            .map(|name| ActiveInfo::new(*name, 1, starfield_gl::consts::FLOAT_VEC4))
            .collect();
        self
    }

    pub fn without_location(mut self, uniform: &str) -> Self {
        self.unlocated_uniforms.push(uniform.to_string());
        self
    }

    pub fn dropping_attribute(mut self, name: &str) -> Self {
        self.dropped_attributes.push(name.to_string());
        self
    }

    pub fn failing_compile(mut self, log: &str) -> Self {
        self.compile_error = Some(log.to_string());
        self
    }

    pub fn failing_link(mut self, log: &str) -> Self {
        self.link_error = Some(log.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn handle(&self) -> u32 {
        let h = self.next_handle.get() + 1;
        self.next_handle.set(h);
        h
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl RenderContext for RecordingContext {
    type Buffer = u32;
    type Texture = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn create_buffer(&self) -> Option<u32> {
        Some(self.handle())
    }

    fn bind_buffer(&self, target: u32, buffer: Option<&u32>) {
        self.record(Call::BindBuffer(target, buffer.copied()));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.record(Call::BufferData {
            target,
            bytes: data.to_vec(),
            usage,
        });
    }

    fn create_shader(&self, _kind: u32) -> Option<u32> {
        Some(self.handle())
    }

    fn shader_source(&self, _shader: &u32, _source: &str) {}

    fn compile_shader(&self, _shader: &u32) {}

    fn shader_compiled(&self, _shader: &u32) -> bool {
        self.compile_error.is_none()
    }

    fn shader_info_log(&self, _shader: &u32) -> String {
        self.compile_error.clone().unwrap_or_default()
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Option<u32> {
        Some(self.handle())
    }

    fn attach_shader(&self, _program: &u32, _shader: &u32) {}

    fn link_program(&self, _program: &u32) {}

    fn program_linked(&self, _program: &u32) -> bool {
        self.link_error.is_none()
    }

    fn program_info_log(&self, _program: &u32) -> String {
        self.link_error.clone().unwrap_or_default()
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
    }

    fn use_program(&self, program: Option<&u32>) {
        self.record(Call::UseProgram(program.copied()));
    }

    fn active_uniform_count(&self, _program: &u32) -> u32 {
        self.uniforms.len() as u32
    }

    fn active_uniform(&self, _program: &u32, index: u32) -> Option<ActiveInfo> {
        self.uniforms.get(index as usize).cloned()
    }

    fn uniform_location(&self, _program: &u32, name: &str) -> Option<String> {
        if self.unlocated_uniforms.iter().any(|u| u == name) {
            return None;
        }
        Some(name.to_string())
    }

    fn active_attribute_count(&self, _program: &u32) -> u32 {
        self.attributes.len() as u32
    }

    fn active_attribute(&self, _program: &u32, index: u32) -> Option<ActiveInfo> {
        self.attributes.get(index as usize).cloned()
    }

    fn attrib_location(&self, _program: &u32, name: &str) -> i32 {
        if self.dropped_attributes.iter().any(|a| a == name) {
            return -1;
        }
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map_or(-1, |i| i as i32)
    }

    fn uniform1f(&self, location: &String, value: f32) {
        self.record(Call::Uniform1f(location.clone(), value));
    }

    fn uniform1i(&self, location: &String, value: i32) {
        self.record(Call::Uniform1i(location.clone(), value));
    }

    fn uniform_fv(&self, location: &String, arity: u8, values: &[f32]) {
        self.record(Call::UniformFv(location.clone(), arity, values.to_vec()));
    }

    fn uniform_iv(&self, location: &String, arity: u8, values: &[i32]) {
        self.record(Call::UniformIv(location.clone(), arity, values.to_vec()));
    }

    fn uniform_matrix_fv(&self, location: &String, dim: u8, values: &[f32]) {
        self.record(Call::UniformMatrixFv(location.clone(), dim, values.to_vec()));
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: u32, texture: Option<&u32>) {
        self.record(Call::BindTexture(target, texture.copied()));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::DisableAttrib(index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        element_type: u32,
        normalized: bool,
        _stride: i32,
        _offset: i32,
    ) {
        self.record(Call::AttribPointer {
            index,
            size,
            element_type,
            normalized,
        });
    }

    fn vertex_attrib4fv(&self, index: u32, values: &[f32; 4]) {
        self.record(Call::Attrib4fv(index, *values));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays(mode, first, count));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, _offset: i32) {
        self.record(Call::DrawElements(mode, count, element_type));
    }
}
