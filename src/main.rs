use bevy::prelude::*;

mod config;
mod systems;

use config::{CAMERA_MAX_RADIUS, CAMERA_MIN_RADIUS, CAMERA_START_RADIUS};
use systems::FramePlugin;
use systems::bodies::BodiesPlugin;
use systems::camera::OrbitCamera;
use systems::earth::EarthPlugin;
use systems::starfield::StarfieldPlugin;
use systems::ui::HudPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Earth".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((FramePlugin, EarthPlugin, StarfieldPlugin, BodiesPlugin, HudPlugin))
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
        .add_systems(Startup, setup)
        .run()
}

// spawn camera
fn setup(mut commands: Commands) {
    let rig = OrbitCamera::new(CAMERA_START_RADIUS, 0.5)
        .with_target(Vec3::ZERO)
        .with_zoom_limits(CAMERA_MIN_RADIUS, CAMERA_MAX_RADIUS);

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(rig.calculate_position()).looking_at(rig.target, Vec3::Y),
        rig,
    ));
}
