//! Uniform setter factory.
//!
//! Every active uniform on a linked program becomes a [`UniformSetter`] whose
//! upload path (scalar, vector, matrix or sampler) is fixed when the program
//! is introspected, so per-frame calls only match on the value.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use log::{debug, info};

use crate::consts;
use crate::context::{ActiveInfo, RenderContext};
use crate::error::{GlError, Result};

const ARRAY_SUFFIX: &str = "[0]";

/// Hands out texture units for one program, in declaration order.
#[derive(Debug, Default)]
pub struct TextureUnitAllocator {
    next: u32,
}

impl TextureUnitAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `count` contiguous units.
    pub fn allocate(&mut self, count: u32) -> Range<u32> {
        let start = self.next;
        self.next += count;
        start..self.next
    }

    /// Number of units handed out so far.
    pub fn used(&self) -> u32 {
        self.next
    }
}

/// Resolved upload path of one uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    /// Float vector of the given width.
    FloatVec(u8),
    Int,
    IntVec(u8),
    /// Booleans of the given width; uploaded as integers.
    Bool(u8),
    /// Square float matrix of the given dimension.
    Matrix(u8),
    Sampler { target: u32, units: Range<u32> },
}

impl UniformKind {
    fn from_info(
        info: &ActiveInfo,
        is_array: bool,
        units: &mut TextureUnitAllocator,
    ) -> Result<Self> {
        Ok(match info.type_code {
            consts::FLOAT => UniformKind::Float,
            consts::FLOAT_VEC2 => UniformKind::FloatVec(2),
            consts::FLOAT_VEC3 => UniformKind::FloatVec(3),
            consts::FLOAT_VEC4 => UniformKind::FloatVec(4),
            consts::INT => UniformKind::Int,
            consts::INT_VEC2 => UniformKind::IntVec(2),
            consts::INT_VEC3 => UniformKind::IntVec(3),
            consts::INT_VEC4 => UniformKind::IntVec(4),
            consts::BOOL => UniformKind::Bool(1),
            consts::BOOL_VEC2 => UniformKind::Bool(2),
            consts::BOOL_VEC3 => UniformKind::Bool(3),
            consts::BOOL_VEC4 => UniformKind::Bool(4),
            consts::FLOAT_MAT2 => UniformKind::Matrix(2),
            consts::FLOAT_MAT3 => UniformKind::Matrix(3),
            consts::FLOAT_MAT4 => UniformKind::Matrix(4),
            consts::SAMPLER_2D | consts::SAMPLER_CUBE => {
                let count = if is_array { info.size.max(1) as u32 } else { 1 };
                UniformKind::Sampler {
                    target: bind_point_for_sampler(info.type_code),
                    units: units.allocate(count),
                }
            }
            code => return Err(GlError::UnsupportedType { code }),
        })
    }
}

fn bind_point_for_sampler(type_code: u32) -> u32 {
    if type_code == consts::SAMPLER_CUBE {
        consts::TEXTURE_CUBE_MAP
    } else {
        consts::TEXTURE_2D
    }
}

/// Introspected facts about one active uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDescriptor {
    /// Name with any `[0]` suffix removed.
    pub name: String,
    pub kind: UniformKind,
    pub is_array: bool,
    pub size: i32,
}

impl UniformDescriptor {
    fn resolve(info: &ActiveInfo, units: &mut TextureUnitAllocator) -> Result<Self> {
        let suffixed = info.name.ends_with(ARRAY_SUFFIX);
        let is_array = suffixed && info.size > 1;
        let name = info
            .name
            .strip_suffix(ARRAY_SUFFIX)
            .unwrap_or(&info.name)
            .to_string();
        let kind = UniformKind::from_info(info, is_array, units)?;
        Ok(Self {
            name,
            kind,
            is_array,
            size: info.size,
        })
    }
}

/// A value handed to a uniform setter. `T` is the context's texture handle.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue<T> {
    Float(f32),
    /// Vectors, matrices (column-major) and float arrays.
    Floats(Vec<f32>),
    Int(i32),
    Ints(Vec<i32>),
    Bool(bool),
    Bools(Vec<bool>),
    Texture(T),
    Textures(Vec<T>),
}

impl<T> UniformValue<T> {
    fn describe(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "a float",
            UniformValue::Floats(_) => "a float list",
            UniformValue::Int(_) => "an int",
            UniformValue::Ints(_) => "an int list",
            UniformValue::Bool(_) => "a bool",
            UniformValue::Bools(_) => "a bool list",
            UniformValue::Texture(_) => "a texture",
            UniformValue::Textures(_) => "a texture list",
        }
    }

    fn as_ints(&self) -> Option<Vec<i32>> {
        match self {
            UniformValue::Int(v) => Some(vec![*v]),
            UniformValue::Ints(v) => Some(v.clone()),
            UniformValue::Bool(b) => Some(vec![i32::from(*b)]),
            UniformValue::Bools(v) => Some(v.iter().map(|b| i32::from(*b)).collect()),
            _ => None,
        }
    }
}

impl<T> From<f32> for UniformValue<T> {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl<T> From<i32> for UniformValue<T> {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl<T> From<bool> for UniformValue<T> {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl<T> From<Vec<f32>> for UniformValue<T> {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::Floats(v)
    }
}

impl<T, const N: usize> From<[f32; N]> for UniformValue<T> {
    fn from(v: [f32; N]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl<T> From<glam::Vec3> for UniformValue<T> {
    fn from(v: glam::Vec3) -> Self {
        UniformValue::Floats(v.to_array().to_vec())
    }
}

impl<T> From<glam::Vec4> for UniformValue<T> {
    fn from(v: glam::Vec4) -> Self {
        UniformValue::Floats(v.to_array().to_vec())
    }
}

impl<T> From<glam::Mat4> for UniformValue<T> {
    fn from(m: glam::Mat4) -> Self {
        UniformValue::Floats(m.to_cols_array().to_vec())
    }
}

/// Uniform name -> value, applied with [`apply_uniforms`].
pub type Uniforms<T> = BTreeMap<String, UniformValue<T>>;

/// Uploads values to one uniform location.
pub struct UniformSetter<C: RenderContext> {
    pub descriptor: UniformDescriptor,
    location: C::UniformLocation,
}

impl<C: RenderContext> UniformSetter<C> {
    pub fn set(&self, ctx: &C, value: &UniformValue<C::Texture>) -> Result<()> {
        let loc = &self.location;
        let d = &self.descriptor;
        match (&d.kind, value) {
            (UniformKind::Float, UniformValue::Float(v)) if !d.is_array => ctx.uniform1f(loc, *v),
            (UniformKind::Float, UniformValue::Float(v)) => ctx.uniform_fv(loc, 1, &[*v]),
            (UniformKind::Float, UniformValue::Floats(v)) => ctx.uniform_fv(loc, 1, v),
            (UniformKind::FloatVec(n), UniformValue::Floats(v)) => ctx.uniform_fv(loc, *n, v),
            (UniformKind::Matrix(n), UniformValue::Floats(v)) => ctx.uniform_matrix_fv(loc, *n, v),
            (UniformKind::Int, UniformValue::Int(v)) if !d.is_array => ctx.uniform1i(loc, *v),
            (UniformKind::Int, v) => ctx.uniform_iv(loc, 1, &self.ints(v)?),
            (UniformKind::IntVec(n), v) | (UniformKind::Bool(n), v) => {
                ctx.uniform_iv(loc, *n, &self.ints(v)?)
            }
            (UniformKind::Sampler { target, units }, UniformValue::Texture(t)) if !d.is_array => {
                ctx.uniform1i(loc, units.start as i32);
                ctx.active_texture(consts::TEXTURE0 + units.start);
                ctx.bind_texture(*target, Some(t));
            }
            (UniformKind::Sampler { target, units }, UniformValue::Textures(ts)) if d.is_array => {
                if ts.len() > units.len() {
                    return Err(self.mismatch(value));
                }
                let indices: Vec<i32> = units.clone().map(|u| u as i32).collect();
                ctx.uniform_iv(loc, 1, &indices);
                for (unit, texture) in units.clone().zip(ts) {
                    ctx.active_texture(consts::TEXTURE0 + unit);
                    ctx.bind_texture(*target, Some(texture));
                }
            }
            _ => return Err(self.mismatch(value)),
        }
        Ok(())
    }

    fn ints(&self, value: &UniformValue<C::Texture>) -> Result<Vec<i32>> {
        value.as_ints().ok_or_else(|| self.mismatch(value))
    }

    fn mismatch(&self, value: &UniformValue<C::Texture>) -> GlError {
        GlError::UniformValue {
            name: self.descriptor.name.clone(),
            got: value.describe(),
        }
    }
}

/// Bare uniform name -> setter.
pub type UniformSetters<C> = HashMap<String, UniformSetter<C>>;

/// Builds a setter for every active uniform of `program`. Texture units are
/// assigned from zero in the order the context reports samplers.
pub fn create_uniform_setters<C: RenderContext>(
    ctx: &C,
    program: &C::Program,
) -> Result<UniformSetters<C>> {
    let mut units = TextureUnitAllocator::new();
    let mut setters = HashMap::new();
    let count = ctx.active_uniform_count(program);

    for index in 0..count {
        let Some(info) = ctx.active_uniform(program, index) else {
            break;
        };
        let descriptor = UniformDescriptor::resolve(&info, &mut units)?;
        // Members of uniform blocks are active but have no location.
        let Some(location) = ctx.uniform_location(program, &info.name) else {
            debug!("uniform {} has no location; skipped", descriptor.name);
            continue;
        };
        debug!("uniform {}: {:?}", descriptor.name, descriptor.kind);
        setters.insert(
            descriptor.name.clone(),
            UniformSetter {
                descriptor,
                location,
            },
        );
    }

    info!(
        "created {} uniform setters ({} texture units)",
        setters.len(),
        units.used()
    );
    Ok(setters)
}

/// Invokes the matching setter for every name in each value map, in order.
/// Names the program does not use are skipped.
pub fn apply_uniforms<C: RenderContext>(
    ctx: &C,
    setters: &UniformSetters<C>,
    values: &[&Uniforms<C::Texture>],
) -> Result<()> {
    for uniforms in values {
        for (name, value) in uniforms.iter() {
            if let Some(setter) = setters.get(name) {
                setter.set(ctx, value)?;
            }
        }
    }
    Ok(())
}
