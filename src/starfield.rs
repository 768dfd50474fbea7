//! The star field: pairs of triangles orbiting the origin, each spinning
//! faster the further out it sits.

use glam::{Mat4, Vec3};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::attributes::{draw_buffer_info, set_buffers_and_attributes};
use crate::buffers::{AttributeData, BufferInfo, VertexArrays};
use crate::config::StarFieldConfig;
use crate::consts;
use crate::context::RenderContext;
use crate::error::Result;
use crate::program::ProgramInfo;
use crate::uniforms::{apply_uniforms, UniformValue, Uniforms};

pub const STAR_VERTEX_SHADER: &str = include_str!("../shaders/star.vert");
pub const STAR_FRAGMENT_SHADER: &str = include_str!("../shaders/star.frag");

const TIME_SCALE: f64 = 0.0001;
const TIME_OFFSET: f64 = 5.0;
const SPIN_FACTOR: f32 = 3.0;

/// Two crossed triangles in the YZ plane.
pub fn star_geometry() -> VertexArrays {
    #[rustfmt::skip]
    let position = vec![
        0.0, 3.0, 0.0,
        0.0, 0.0, 2.0,
        0.0, 0.0, -2.0,
        0.0, -1.0, 0.0,
        0.0, 2.0, -2.0,
        0.0, 2.0, 2.0,
    ];
    VertexArrays::new()
        .with("position", AttributeData::new(position).components(3))
        .with(
            "texcoord",
            AttributeData::new(vec![0.5, 0.0, 1.0, 1.0, 0.0, 1.0]).components(2),
        )
        .with(
            "normal",
            AttributeData::new(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).components(3),
        )
}

/// Angular speed increment for a star at `radius`. Radii that sit exactly on
/// a band edge fall through to the outermost rate.
pub fn sector_speed(radius: f32) -> f32 {
    let divisor = if radius > 0.0 && radius < 10.0 {
        1_000_000.0
    } else if radius > 10.0 && radius < 25.0 {
        100_000.0
    } else if radius > 25.0 && radius < 40.0 {
        80_000.0
    } else if radius > 40.0 && radius < 70.0 {
        70_000.0
    } else if radius > 70.0 && radius < 100.0 {
        65_000.0
    } else {
        60_000.0
    };
    radius / divisor
}

/// Maps a frame timestamp in milliseconds to the animation clock.
pub fn frame_time(time_ms: f64) -> f32 {
    (time_ms * TIME_SCALE + TIME_OFFSET) as f32
}

pub struct Star<T> {
    pub radius: f32,
    pub x_rotation: f32,
    pub y_rotation: f32,
    pub material: Uniforms<T>,
}

impl<T> Star<T> {
    fn random(rng: &mut SmallRng, config: &StarFieldConfig) -> Self {
        let radius = rng.gen::<f32>() * config.max_radius;
        let x_rotation = rng.gen::<f32>() * std::f32::consts::PI;
        let shininess = rng.gen::<f32>() * config.max_shininess;

        let mut material = Uniforms::new();
        material.insert("u_specular".into(), UniformValue::from([1.0f32, 1.0, 1.0, 1.0]));
        material.insert("u_shininess".into(), UniformValue::Float(shininess));
        Self {
            radius,
            x_rotation,
            y_rotation: 0.0,
            material,
        }
    }

    pub fn advance(&mut self) {
        self.x_rotation += sector_speed(self.radius) * SPIN_FACTOR;
    }

    /// Orbit rotation followed by the push out to `radius`.
    pub fn world_matrix(&self, time: f32) -> Mat4 {
        Mat4::from_rotation_x(self.x_rotation * time)
            * Mat4::from_rotation_y(self.y_rotation * time)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.radius))
    }
}

/// The camera's placement in world space and its view-projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCamera {
    pub camera: Mat4,
    pub view_projection: Mat4,
}

pub struct StarField<T> {
    config: StarFieldConfig,
    stars: Vec<Star<T>>,
    shared: Uniforms<T>,
    per_object: Uniforms<T>,
}

impl<T> StarField<T> {
    pub fn new(config: &StarFieldConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let stars = (0..config.star_count)
            .map(|_| Star::random(&mut rng, config))
            .collect();
        log::info!("Spawned {} stars (seed {seed})", config.star_count);
        Self {
            config: config.clone(),
            stars,
            shared: Uniforms::new(),
            per_object: Uniforms::new(),
        }
    }

    pub fn stars(&self) -> &[Star<T>] {
        &self.stars
    }

    pub fn camera(&self, aspect: f32) -> FrameCamera {
        let projection = Mat4::perspective_rh_gl(
            self.config.fov_degrees.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        );
        let eye = Vec3::from(self.config.camera_position);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        FrameCamera {
            camera: view.inverse(),
            view_projection: projection * view,
        }
    }

    /// Advances every star one step and draws it.
    pub fn draw<C>(
        &mut self,
        ctx: &C,
        program: &ProgramInfo<C>,
        buffers: &BufferInfo<C::Buffer>,
        aspect: f32,
        time_ms: f64,
    ) -> Result<()>
    where
        C: RenderContext<Texture = T>,
    {
        let time = frame_time(time_ms);
        let frame = self.camera(aspect);

        ctx.use_program(Some(&program.program));
        set_buffers_and_attributes(ctx, &program.attrib_setters, buffers);

        self.shared.insert("u_viewInverse".into(), UniformValue::from(frame.camera));
        apply_uniforms(ctx, &program.uniform_setters, &[&self.shared])?;

        for star in self.stars.iter_mut() {
            star.advance();
            let world = star.world_matrix(time);
            self.per_object.insert("u_world".into(), UniformValue::from(world));
            self.per_object.insert(
                "u_worldViewProjection".into(),
                UniformValue::from(frame.view_projection * world),
            );
            self.per_object.insert(
                "u_worldInverseTranspose".into(),
                UniformValue::from(world.inverse().transpose()),
            );

            apply_uniforms(
                ctx,
                &program.uniform_setters,
                &[&self.per_object, &star.material],
            )?;
            draw_buffer_info(ctx, buffers, consts::TRIANGLES);
        }
        Ok(())
    }
}
