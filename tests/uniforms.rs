mod common;

use common::{Call, RecordingContext};
use starfield_gl::consts;
use starfield_gl::uniforms::UniformKind;
use starfield_gl::{
    apply_uniforms, create_uniform_setters, ActiveInfo, GlError, UniformValue, Uniforms,
};

const PROGRAM: u32 = 1;

fn uniforms(values: Vec<(&str, UniformValue<u32>)>) -> Uniforms<u32> {
    values.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn samplers_take_consecutive_units() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_diffuse", 1, consts::SAMPLER_2D),
        ActiveInfo::new("u_shadow[0]", 3, consts::SAMPLER_2D),
        ActiveInfo::new("u_sky", 1, consts::SAMPLER_CUBE),
    ]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();

    assert_eq!(
        setters["u_diffuse"].descriptor.kind,
        UniformKind::Sampler {
            target: consts::TEXTURE_2D,
            units: 0..1,
        }
    );
    assert_eq!(
        setters["u_shadow"].descriptor.kind,
        UniformKind::Sampler {
            target: consts::TEXTURE_2D,
            units: 1..4,
        }
    );
    assert_eq!(
        setters["u_sky"].descriptor.kind,
        UniformKind::Sampler {
            target: consts::TEXTURE_CUBE_MAP,
            units: 4..5,
        }
    );
}

#[test]
fn each_program_starts_at_unit_zero() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![ActiveInfo::new("u_tex", 1, consts::SAMPLER_2D)]);
    let first = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    let second = create_uniform_setters(&ctx, &2).unwrap();
    assert_eq!(first["u_tex"].descriptor.kind, second["u_tex"].descriptor.kind);
}

#[test]
fn sampler_setter_binds_its_unit() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_a", 1, consts::SAMPLER_2D),
        ActiveInfo::new("u_b", 1, consts::SAMPLER_CUBE),
    ]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();

    setters["u_b"].set(&ctx, &UniformValue::Texture(42)).unwrap();

    assert_eq!(
        ctx.calls(),
        vec![
            Call::Uniform1i("u_b".into(), 1),
            Call::ActiveTexture(consts::TEXTURE0 + 1),
            Call::BindTexture(consts::TEXTURE_CUBE_MAP, Some(42)),
        ]
    );
}

#[test]
fn sampler_array_binds_every_texture() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_first", 1, consts::SAMPLER_2D),
        ActiveInfo::new("u_layers[0]", 2, consts::SAMPLER_2D),
    ]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();

    setters["u_layers"]
        .set(&ctx, &UniformValue::Textures(vec![7, 8]))
        .unwrap();

    assert_eq!(
        ctx.calls(),
        vec![
            Call::UniformIv("u_layers[0]".into(), 1, vec![1, 2]),
            Call::ActiveTexture(consts::TEXTURE0 + 1),
            Call::BindTexture(consts::TEXTURE_2D, Some(7)),
            Call::ActiveTexture(consts::TEXTURE0 + 2),
            Call::BindTexture(consts::TEXTURE_2D, Some(8)),
        ]
    );
}

#[test]
fn too_many_textures_for_sampler_array() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![ActiveInfo::new("u_layers[0]", 2, consts::SAMPLER_2D)]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    let err = setters["u_layers"]
        .set(&ctx, &UniformValue::Textures(vec![1, 2, 3]))
        .unwrap_err();
    assert!(matches!(err, GlError::UniformValue { .. }));
}

#[test]
fn float_arrays_use_vector_upload() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_weights[0]", 4, consts::FLOAT),
        ActiveInfo::new("u_time", 1, consts::FLOAT),
    ]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();

    apply_uniforms(
        &ctx,
        &setters,
        &[&uniforms(vec![
            ("u_weights", UniformValue::Floats(vec![0.1, 0.2, 0.3, 0.4])),
            ("u_time", UniformValue::Float(2.0)),
        ])],
    )
    .unwrap();

    assert_eq!(
        ctx.calls(),
        vec![
            Call::Uniform1f("u_time".into(), 2.0),
            Call::UniformFv("u_weights[0]".into(), 1, vec![0.1, 0.2, 0.3, 0.4]),
        ]
    );
}

#[test]
fn upload_paths_by_kind() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_color", 1, consts::FLOAT_VEC4),
        ActiveInfo::new("u_count", 1, consts::INT),
        ActiveInfo::new("u_cell", 1, consts::INT_VEC2),
        ActiveInfo::new("u_flags", 1, consts::BOOL_VEC3),
        ActiveInfo::new("u_enabled", 1, consts::BOOL),
        ActiveInfo::new("u_normal", 1, consts::FLOAT_MAT3),
        ActiveInfo::new("u_world", 1, consts::FLOAT_MAT4),
    ]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    let set = |name: &str, value: UniformValue<u32>| setters[name].set(&ctx, &value).unwrap();

    set("u_color", [1.0f32, 0.5, 0.25, 1.0].into());
    set("u_count", UniformValue::Int(3));
    set("u_cell", UniformValue::Ints(vec![4, 5]));
    set("u_flags", UniformValue::Bools(vec![true, false, true]));
    set("u_enabled", UniformValue::Bool(true));
    set("u_normal", UniformValue::Floats(vec![1.0; 9]));
    set("u_world", glam::Mat4::IDENTITY.into());

    assert_eq!(
        ctx.calls(),
        vec![
            Call::UniformFv("u_color".into(), 4, vec![1.0, 0.5, 0.25, 1.0]),
            Call::Uniform1i("u_count".into(), 3),
            Call::UniformIv("u_cell".into(), 2, vec![4, 5]),
            Call::UniformIv("u_flags".into(), 3, vec![1, 0, 1]),
            Call::UniformIv("u_enabled".into(), 1, vec![1]),
            Call::UniformMatrixFv("u_normal".into(), 3, vec![1.0; 9]),
            Call::UniformMatrixFv(
                "u_world".into(),
                4,
                glam::Mat4::IDENTITY.to_cols_array().to_vec()
            ),
        ]
    );
}

#[test]
fn block_members_without_location_are_skipped() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![
            ActiveInfo::new("u_time", 1, consts::FLOAT),
            ActiveInfo::new("Lights.color", 1, consts::FLOAT_VEC3),
        ])
        .without_location("Lights.color");
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    assert_eq!(setters.len(), 1);
    assert!(setters.contains_key("u_time"));
}

#[test]
fn unknown_names_are_ignored() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![ActiveInfo::new("u_time", 1, consts::FLOAT)]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();

    apply_uniforms(
        &ctx,
        &setters,
        &[&uniforms(vec![("u_optimized_out", UniformValue::Float(1.0))])],
    )
    .unwrap();

    assert!(ctx.calls().is_empty());
}

#[test]
fn value_maps_apply_in_order() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![ActiveInfo::new("u_time", 1, consts::FLOAT)]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    let early = uniforms(vec![("u_time", UniformValue::Float(1.0))]);
    let late = uniforms(vec![("u_time", UniformValue::Float(2.0))]);

    apply_uniforms(&ctx, &setters, &[&early, &late]).unwrap();

    assert_eq!(
        ctx.calls(),
        vec![
            Call::Uniform1f("u_time".into(), 1.0),
            Call::Uniform1f("u_time".into(), 2.0),
        ]
    );
}

#[test]
fn unsupported_uniform_type_is_fatal() {
    let ctx = RecordingContext::new().with_uniforms(vec![
        ActiveInfo::new("u_time", 1, consts::FLOAT),
        ActiveInfo::new("u_volume", 1, 0x8B5F),
    ]);
    let err = create_uniform_setters(&ctx, &PROGRAM).err().unwrap();
    assert_eq!(err, GlError::UnsupportedType { code: 0x8B5F });
    assert!(err.to_string().contains("0x8b5f"));
}

#[test]
fn wrong_value_shape_is_reported() {
    let ctx = RecordingContext::new()
        .with_uniforms(vec![ActiveInfo::new("u_world", 1, consts::FLOAT_MAT4)]);
    let setters = create_uniform_setters(&ctx, &PROGRAM).unwrap();
    let err = setters["u_world"]
        .set(&ctx, &UniformValue::Int(1))
        .unwrap_err();
    assert_eq!(
        err,
        GlError::UniformValue {
            name: "u_world".into(),
            got: "an int"
        }
    );
}
