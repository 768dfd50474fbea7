use thiserror::Error;

/// Errors raised while marshalling geometry, building setters or linking
/// programs. All of them surface at setup time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlError {
    /// Attribute data has an ambiguous or inconsistent shape.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A uniform or buffer element kind the layer does not know about.
    #[error("unsupported type: 0x{code:x}")]
    UnsupportedType { code: u32 },
    #[error("could not compile shader: {0}")]
    ShaderCompile(String),
    #[error("program failed to link: {0}")]
    ProgramLink(String),
    /// The context refused to allocate an object.
    #[error("failed to create {0}")]
    Resource(&'static str),
    /// A setter was handed a value it cannot upload.
    #[error("uniform `{name}` cannot take {got}")]
    UniformValue { name: String, got: &'static str },
}

pub type Result<T> = std::result::Result<T, GlError>;

impl GlError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        GlError::Configuration(msg.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GlError> for wasm_bindgen::JsValue {
    fn from(err: GlError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
