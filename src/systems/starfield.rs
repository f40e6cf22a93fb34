//! starfield.rs
//!
//! Random shell of distant points around the whole scene
//! Not parented to the earth group, so the axial tilt doesn't touch it

use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use rand::Rng;

use crate::config::{
    STAR_COUNT, STAR_HUE, STAR_MAX_RADIUS, STAR_MIN_RADIUS, STAR_ROTATION_SPEED, STAR_SATURATION,
};
use crate::systems::FrameSet;

pub struct StarfieldPlugin;

impl Plugin for StarfieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_starfield)
            .add_systems(Update, rotate_starfield.in_set(FrameSet::Kinematics));
    }
}

#[derive(Component)]
pub struct Starfield;

pub struct Star {
    pub position: Vec3,
    pub color: LinearRgba,
}

// uniform direction on the sphere, radius uniform in [min, max)
// https://mathworld.wolfram.com/SpherePointPicking.html
pub fn random_star(rng: &mut impl Rng) -> Star {
    let radius = rng.random_range(STAR_MIN_RADIUS..STAR_MAX_RADIUS);
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();

    let position = Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    );

    let lightness = rng.random::<f32>();
    let color = Color::hsl(STAR_HUE, STAR_SATURATION, lightness).to_linear();

    Star { position, color }
}

// point cloud mesh, one vertex per star
fn create_star_mesh(stars: &[Star]) -> Mesh {
    let positions: Vec<[f32; 3]> = stars.iter().map(|star| star.position.to_array()).collect();
    let colors: Vec<[f32; 4]> = stars.iter().map(|star| star.color.to_f32_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);

    mesh
}

fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::rng();
    let stars: Vec<Star> = (0..STAR_COUNT).map(|_| random_star(&mut rng)).collect();

    commands.spawn((
        Mesh3d(meshes.add(create_star_mesh(&stars))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Starfield,
    ));
}

// slow independent spin, purely cosmetic
fn rotate_starfield(
    time: Res<Time>,
    mut starfield: Query<&mut Transform, With<Starfield>>,
) {
    let delta_rotation = Quat::from_rotation_y(STAR_ROTATION_SPEED * time.delta_secs());

    if let Ok(mut transform) = starfield.single_mut() {
        transform.rotation = transform.rotation * delta_rotation;
    }
}
