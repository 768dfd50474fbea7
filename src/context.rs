//! The immediate-mode graphics surface the marshalling layer drives.
//!
//! Method names follow the WebGL calls they stand for. Enum arguments are raw
//! GL codes (see [`crate::consts`]).

/// Metadata the context reports for one active uniform or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveInfo {
    pub name: String,
    pub size: i32,
    pub type_code: u32,
}

impl ActiveInfo {
    pub fn new(name: impl Into<String>, size: i32, type_code: u32) -> Self {
        Self {
            name: name.into(),
            size,
            type_code,
        }
    }
}

pub trait RenderContext {
    type Buffer: Clone;
    type Texture: Clone;
    type Shader;
    type Program;
    type UniformLocation: Clone;

    // Buffers
    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn bind_buffer(&self, target: u32, buffer: Option<&Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

    // Shaders and programs
    fn create_shader(&self, kind: u32) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compiled(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_linked(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;
    fn delete_program(&self, program: &Self::Program);
    fn use_program(&self, program: Option<&Self::Program>);

    // Introspection
    fn active_uniform_count(&self, program: &Self::Program) -> u32;
    fn active_uniform(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn active_attribute_count(&self, program: &Self::Program) -> u32;
    fn active_attribute(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;
    /// Negative when the attribute is not active.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> i32;

    // Uniform uploads. `arity` is the vector width (1..=4), `dim` the matrix
    // dimension (2..=4).
    fn uniform1f(&self, location: &Self::UniformLocation, value: f32);
    fn uniform1i(&self, location: &Self::UniformLocation, value: i32);
    fn uniform_fv(&self, location: &Self::UniformLocation, arity: u8, values: &[f32]);
    fn uniform_iv(&self, location: &Self::UniformLocation, arity: u8, values: &[i32]);
    fn uniform_matrix_fv(&self, location: &Self::UniformLocation, dim: u8, values: &[f32]);

    // Textures
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<&Self::Texture>);

    // Vertex attributes
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        element_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib4fv(&self, index: u32, values: &[f32; 4]);

    // Draws
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
}
