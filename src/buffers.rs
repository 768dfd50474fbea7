//! Geometry marshalling: turns named vertex-data descriptions into GPU buffers
//! and per-attribute binding descriptors.

use std::borrow::Cow;
use std::collections::BTreeMap;

use log::debug;

use crate::consts;
use crate::context::RenderContext;
use crate::error::{GlError, Result};

/// Reserved field holding element indices.
pub const INDICES: &str = "indices";

/// Fields consulted, in order, when the element count has to be derived from
/// vertex data.
pub const POSITION_KEYS: [&str; 3] = ["position", "positions", "a_position"];

const ATTRIB_PREFIX: &str = "a_";

/// Numeric storage format of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
}

impl ElementType {
    pub fn gl_code(self) -> u32 {
        match self {
            ElementType::I8 => consts::BYTE,
            ElementType::U8 => consts::UNSIGNED_BYTE,
            ElementType::I16 => consts::SHORT,
            ElementType::U16 => consts::UNSIGNED_SHORT,
            ElementType::I32 => consts::INT,
            ElementType::U32 => consts::UNSIGNED_INT,
            ElementType::F32 => consts::FLOAT,
        }
    }

    pub fn from_gl_code(code: u32) -> Result<Self> {
        Ok(match code {
            consts::BYTE => ElementType::I8,
            consts::UNSIGNED_BYTE => ElementType::U8,
            consts::SHORT => ElementType::I16,
            consts::UNSIGNED_SHORT => ElementType::U16,
            consts::INT => ElementType::I32,
            consts::UNSIGNED_INT => ElementType::U32,
            consts::FLOAT => ElementType::F32,
            _ => return Err(GlError::UnsupportedType { code }),
        })
    }

    /// 8-bit integer data is rescaled to [-1,1] / [0,1] on read.
    pub fn is_normalized(self) -> bool {
        matches!(self, ElementType::I8 | ElementType::U8)
    }
}

/// Vertex data already laid out in its final storage format.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

impl TypedArray {
    /// Converts plain numbers into `ty`. Integer targets truncate toward zero;
    /// values that do not fit the type are rejected.
    pub fn from_numbers(ty: ElementType, data: &[f64]) -> Result<Self> {
        Ok(match ty {
            ElementType::I8 => TypedArray::I8(integers(ty, data)?),
            ElementType::U8 => TypedArray::U8(integers(ty, data)?),
            ElementType::I16 => TypedArray::I16(integers(ty, data)?),
            ElementType::U16 => TypedArray::U16(integers(ty, data)?),
            ElementType::I32 => TypedArray::I32(integers(ty, data)?),
            ElementType::U32 => TypedArray::U32(integers(ty, data)?),
            ElementType::F32 => TypedArray::F32(data.iter().map(|&v| v as f32).collect()),
        })
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TypedArray::I8(_) => ElementType::I8,
            TypedArray::U8(_) => ElementType::U8,
            TypedArray::I16(_) => ElementType::I16,
            TypedArray::U16(_) => ElementType::U16,
            TypedArray::I32(_) => ElementType::I32,
            TypedArray::U32(_) => ElementType::U32,
            TypedArray::F32(_) => ElementType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedArray::I8(v) => v.len(),
            TypedArray::U8(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::U16(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::U32(v) => v.len(),
            TypedArray::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TypedArray::I8(v) => bytemuck::cast_slice(v.as_slice()),
            TypedArray::U8(v) => v.as_slice(),
            TypedArray::I16(v) => bytemuck::cast_slice(v.as_slice()),
            TypedArray::U16(v) => bytemuck::cast_slice(v.as_slice()),
            TypedArray::I32(v) => bytemuck::cast_slice(v.as_slice()),
            TypedArray::U32(v) => bytemuck::cast_slice(v.as_slice()),
            TypedArray::F32(v) => bytemuck::cast_slice(v.as_slice()),
        }
    }
}

fn integers<T: TryFrom<i64>>(ty: ElementType, data: &[f64]) -> Result<Vec<T>> {
    data.iter()
        .map(|&v| {
            let whole = v.trunc();
            if !whole.is_finite() {
                return Err(GlError::config(format!("{v} is not a valid {ty:?} value")));
            }
            T::try_from(whole as i64)
                .map_err(|_| GlError::config(format!("{v} is out of range for {ty:?}")))
        })
        .collect()
}

macro_rules! typed_array_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<Vec<$ty>> for TypedArray {
            fn from(v: Vec<$ty>) -> Self {
                TypedArray::$variant(v)
            }
        })*
    };
}

typed_array_from!(I8 => i8, U8 => u8, I16 => i16, U16 => u16, I32 => i32, U32 => u32, F32 => f32);

/// Plain numbers plus the metadata needed to lay them out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeData {
    pub data: Vec<f64>,
    pub num_components: Option<usize>,
    pub element_type: Option<ElementType>,
}

impl AttributeData {
    pub fn new(data: impl Into<Vec<f64>>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn components(mut self, n: usize) -> Self {
        self.num_components = Some(n);
        self
    }

    pub fn element_type(mut self, ty: ElementType) -> Self {
        self.element_type = Some(ty);
        self
    }
}

/// One named vertex-data description.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSource {
    /// Bare numbers; every property is inferred.
    Sequence(Vec<f64>),
    Described(AttributeData),
    /// Pre-built storage, uploaded without conversion.
    Typed {
        array: TypedArray,
        num_components: Option<usize>,
    },
    /// Constant attribute value shared by every vertex.
    Constant(Vec<f32>),
}

impl AttributeSource {
    pub fn len(&self) -> usize {
        match self {
            AttributeSource::Sequence(v) => v.len(),
            AttributeSource::Described(d) => d.data.len(),
            AttributeSource::Typed { array, .. } => array.len(),
            AttributeSource::Constant(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn explicit_components(&self) -> Option<usize> {
        match self {
            AttributeSource::Described(d) => d.num_components,
            AttributeSource::Typed { num_components, .. } => *num_components,
            _ => None,
        }
    }
}

impl From<Vec<f64>> for AttributeSource {
    fn from(v: Vec<f64>) -> Self {
        AttributeSource::Sequence(v)
    }
}

impl From<AttributeData> for AttributeSource {
    fn from(d: AttributeData) -> Self {
        AttributeSource::Described(d)
    }
}

impl From<TypedArray> for AttributeSource {
    fn from(array: TypedArray) -> Self {
        AttributeSource::Typed {
            array,
            num_components: None,
        }
    }
}

/// Named vertex-data descriptions, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexArrays {
    fields: Vec<(String, AttributeSource)>,
}

impl VertexArrays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, source: impl Into<AttributeSource>) -> Self {
        self.insert(name, source);
        self
    }

    /// Replaces an existing field in place, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<AttributeSource>) {
        let name = name.into();
        let source = source.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = source,
            None => self.fields.push((name, source)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSource> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSource)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shader attribute name -> field name in a [`VertexArrays`].
pub type AttribMapping = BTreeMap<String, String>;

/// A vertex buffer plus the format the shader reads it with.
#[derive(Debug, Clone, PartialEq)]
pub struct AttribBinding<B> {
    pub buffer: B,
    pub num_components: usize,
    pub element_type: ElementType,
    pub normalize: bool,
    pub stride: i32,
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttribInfo<B> {
    Buffer(AttribBinding<B>),
    Constant(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuffer<B> {
    pub buffer: B,
    pub element_type: ElementType,
}

/// Everything a draw call needs from the geometry side.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferInfo<B> {
    pub attribs: BTreeMap<String, AttribInfo<B>>,
    pub indices: Option<IndexBuffer<B>>,
    pub num_elements: usize,
}

/// Guesses the component count from a field name and checks it against the
/// data length.
pub fn guess_num_components(name: &str, len: usize) -> Result<usize> {
    let n = if name.contains("coord") {
        2
    } else if name.contains("color") {
        4
    } else {
        3
    };
    if len % n != 0 {
        return Err(GlError::config(format!(
            "can not guess numComponents for `{name}` (length {len}); specify it"
        )));
    }
    Ok(n)
}

pub fn resolve_component_count(name: &str, source: &AttributeSource) -> Result<usize> {
    let len = source.len();
    if let AttributeSource::Constant(v) = source {
        return Ok(v.len());
    }
    match source.explicit_components() {
        Some(0) => Err(GlError::config(format!("`{name}` has zero components"))),
        Some(n) if len % n != 0 => Err(GlError::config(format!(
            "numComponents {n} not correct for length {len} of `{name}`"
        ))),
        Some(n) => Ok(n),
        None => guess_num_components(name, len),
    }
}

pub fn resolve_element_type(name: &str, source: &AttributeSource) -> ElementType {
    let default = if name == INDICES {
        ElementType::U16
    } else {
        ElementType::F32
    };
    match source {
        AttributeSource::Described(d) => d.element_type.unwrap_or(default),
        AttributeSource::Typed { array, .. } => array.element_type(),
        AttributeSource::Constant(_) => ElementType::F32,
        AttributeSource::Sequence(_) => default,
    }
}

/// Maps every field except [`INDICES`] to the attribute `a_<field>`.
pub fn build_attrib_mapping<'a>(field_names: impl IntoIterator<Item = &'a str>) -> AttribMapping {
    field_names
        .into_iter()
        .filter(|name| *name != INDICES)
        .map(|name| (format!("{ATTRIB_PREFIX}{name}"), name.to_string()))
        .collect()
}

fn make_typed_array<'a>(name: &str, source: &'a AttributeSource) -> Result<Cow<'a, TypedArray>> {
    let ty = resolve_element_type(name, source);
    match source {
        AttributeSource::Typed { array, .. } => Ok(Cow::Borrowed(array)),
        AttributeSource::Sequence(data) => TypedArray::from_numbers(ty, data).map(Cow::Owned),
        AttributeSource::Described(d) => TypedArray::from_numbers(ty, &d.data).map(Cow::Owned),
        AttributeSource::Constant(_) => Err(GlError::config(format!(
            "`{name}` is a constant and has no buffer data"
        ))),
    }
}

/// Allocates a buffer on `target` and fills it with `array`.
pub fn create_buffer_from_typed_array<C: RenderContext>(
    ctx: &C,
    array: &TypedArray,
    target: u32,
) -> Result<C::Buffer> {
    let buffer = ctx.create_buffer().ok_or(GlError::Resource("buffer"))?;
    ctx.bind_buffer(target, Some(&buffer));
    ctx.buffer_data(target, array.as_bytes(), consts::STATIC_DRAW);
    Ok(buffer)
}

pub fn create_attribs_from_arrays<C: RenderContext>(
    ctx: &C,
    arrays: &VertexArrays,
    mapping: &AttribMapping,
) -> Result<BTreeMap<String, AttribInfo<C::Buffer>>> {
    let mut attribs = BTreeMap::new();
    for (attrib_name, field) in mapping {
        let source = arrays.get(field).ok_or_else(|| {
            GlError::config(format!("attribute `{attrib_name}` maps to missing field `{field}`"))
        })?;
        if let AttributeSource::Constant(value) = source {
            if value.is_empty() || value.len() > 4 {
                return Err(GlError::config(format!(
                    "constant `{field}` must have 1 to 4 components, got {}",
                    value.len()
                )));
            }
            attribs.insert(attrib_name.clone(), AttribInfo::Constant(value.clone()));
            continue;
        }

        let num_components = resolve_component_count(field, source)?;
        let array = make_typed_array(field, source)?;
        let element_type = array.element_type();
        let normalize = element_type.is_normalized();
        let buffer = create_buffer_from_typed_array(ctx, &array, consts::ARRAY_BUFFER)?;
        debug!("{attrib_name}: {element_type:?}/{num_components} normalize={normalize}");
        attribs.insert(
            attrib_name.clone(),
            AttribInfo::Buffer(AttribBinding {
                buffer,
                num_components,
                element_type,
                normalize,
                stride: 0,
                offset: 0,
            }),
        );
    }
    Ok(attribs)
}

/// Derives the draw count from the first position-like field, or the first
/// field when none is present.
pub fn num_elements_from_non_indexed(arrays: &VertexArrays) -> Result<usize> {
    let key = POSITION_KEYS
        .iter()
        .copied()
        .find(|k| arrays.contains(k))
        .or_else(|| arrays.names().next())
        .ok_or_else(|| GlError::config("no vertex data to count elements from"))?;
    let source = arrays
        .get(key)
        .ok_or_else(|| GlError::config(format!("missing field `{key}`")))?;
    if let AttributeSource::Constant(_) = source {
        return Err(GlError::config(format!(
            "cannot count elements from constant `{key}`"
        )));
    }
    let num_components = resolve_component_count(key, source)?;
    Ok(source.len() / num_components)
}

/// Uploads every mapped field and resolves the element count. Without an
/// explicit `mapping` each field `f` binds to attribute `a_f`.
pub fn create_buffer_info_from_arrays<C: RenderContext>(
    ctx: &C,
    arrays: &VertexArrays,
    mapping: Option<&AttribMapping>,
) -> Result<BufferInfo<C::Buffer>> {
    let default_mapping;
    let mapping = match mapping {
        Some(m) => m,
        None => {
            default_mapping = build_attrib_mapping(arrays.names());
            &default_mapping
        }
    };
    let attribs = create_attribs_from_arrays(ctx, arrays, mapping)?;

    let (indices, num_elements) = match arrays.get(INDICES) {
        Some(source) => {
            let array = make_typed_array(INDICES, source)?;
            let buffer = create_buffer_from_typed_array(ctx, &array, consts::ELEMENT_ARRAY_BUFFER)?;
            let index = IndexBuffer {
                buffer,
                element_type: array.element_type(),
            };
            (Some(index), array.len())
        }
        None => (None, num_elements_from_non_indexed(arrays)?),
    };

    debug!(
        "buffer info: {} attribs, {} elements, indexed={}",
        attribs.len(),
        num_elements,
        indices.is_some()
    );
    Ok(BufferInfo {
        attribs,
        indices,
        num_elements,
    })
}
