use bevy::prelude::*;
use bevy::asset::AssetLoadFailedEvent;

pub mod materials;

use materials::{
    CloudMaterial, CloudUniform, FresnelMaterial, FresnelUniform, SurfaceMaterial, SurfaceUniform,
    clear_failed_texture,
};
use crate::config::{
    ATMOSPHERE_SCALE, AXIAL_TILT_DEG, BUMP_SCALE, CLOUD_OPACITY, CLOUD_ROTATION_SPEED, CLOUD_SCALE,
    EARTH_BUMP_TEXTURE, EARTH_CLOUDS_ALPHA_TEXTURE, EARTH_CLOUDS_TEXTURE, EARTH_DIFFUSE_TEXTURE,
    EARTH_LIGHTS_TEXTURE, EARTH_SPECULAR_TEXTURE, FACING_COLOR, FRESNEL_BIAS, FRESNEL_POWER,
    FRESNEL_SCALE, GLOBE_DETAIL, LIGHTS_SCALE, RIM_COLOR, SUN_ILLUMINANCE, SUN_POSITION,
    SURFACE_SCALE,
};
use crate::systems::FrameSet;

pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<SurfaceMaterial>::default())
            .add_plugins(MaterialPlugin::<CloudMaterial>::default())
            .add_plugins(MaterialPlugin::<FresnelMaterial>::default())
            .add_systems(Startup, spawn_globe)
            .add_systems(Update, (
                fallback_failed_textures,
                spin_clouds.in_set(FrameSet::Kinematics),
            ));
    }
}

// tilted root, every shell and orbiting body hangs off this
#[derive(Component)]
pub struct EarthGroup;

/// Shells drawn around the globe center, listed back to front
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneLayer {
    Surface,
    Lights,
    Clouds,
    Atmosphere,
}

impl SceneLayer {
    pub const ALL: [SceneLayer; 4] = [
        SceneLayer::Surface,
        SceneLayer::Lights,
        SceneLayer::Clouds,
        SceneLayer::Atmosphere,
    ];

    pub fn scale(self) -> f32 {
        match self {
            SceneLayer::Surface => SURFACE_SCALE,
            SceneLayer::Lights => LIGHTS_SCALE,
            SceneLayer::Clouds => CLOUD_SCALE,
            SceneLayer::Atmosphere => ATMOSPHERE_SCALE,
        }
    }

    // position in the blend order, later layers draw over earlier ones
    pub fn depth_bias(self) -> f32 {
        Self::ALL.iter().position(|layer| *layer == self).unwrap_or_default() as f32
    }

    pub fn name(self) -> &'static str {
        match self {
            SceneLayer::Surface => "surface",
            SceneLayer::Lights => "night lights",
            SceneLayer::Clouds => "clouds",
            SceneLayer::Atmosphere => "atmosphere",
        }
    }
}

pub fn sun_direction() -> Vec3 {
    Vec3::from(SUN_POSITION).normalize()
}

pub fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut surface_materials: ResMut<Assets<SurfaceMaterial>>,
    mut cloud_materials: ResMut<Assets<CloudMaterial>>,
    mut fresnel_materials: ResMut<Assets<FresnelMaterial>>,
    asset_server: Res<AssetServer>,
) -> Result {
    let sun_direction = sun_direction();

    // one shared shape for every shell
    let globe = meshes.add(Sphere::new(1.0).mesh().ico(GLOBE_DETAIL)?);

    let group = commands
        .spawn((
            EarthGroup,
            Transform::from_rotation(Quat::from_rotation_z(AXIAL_TILT_DEG.to_radians())),
            Visibility::default(),
        ))
        .id();

    let surface = surface_materials.add(SurfaceMaterial {
        day_texture: Some(asset_server.load(EARTH_DIFFUSE_TEXTURE)),
        specular_map: Some(asset_server.load(EARTH_SPECULAR_TEXTURE)),
        bump_map: Some(asset_server.load(EARTH_BUMP_TEXTURE)),
        surface_uniform: SurfaceUniform {
            sun_direction,
            bump_scale: BUMP_SCALE,
        },
    });

    let lights = standard_materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(asset_server.load(EARTH_LIGHTS_TEXTURE)),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        depth_bias: SceneLayer::Lights.depth_bias(),
        ..default()
    });

    let clouds = cloud_materials.add(CloudMaterial {
        cloud_texture: Some(asset_server.load(EARTH_CLOUDS_TEXTURE)),
        alpha_mask: Some(asset_server.load(EARTH_CLOUDS_ALPHA_TEXTURE)),
        cloud_uniform: CloudUniform {
            sun_direction,
            opacity: CLOUD_OPACITY,
        },
    });

    let glow = fresnel_materials.add(FresnelMaterial {
        fresnel_uniform: FresnelUniform {
            rim_color: LinearRgba::from(Srgba::hex(RIM_COLOR)?).to_vec4(),
            facing_color: LinearRgba::from(Srgba::hex(FACING_COLOR)?).to_vec4(),
            bias: FRESNEL_BIAS,
            scale: FRESNEL_SCALE,
            power: FRESNEL_POWER,
            _padding: 0.0,
        },
    });

    for layer in SceneLayer::ALL {
        let mut shell = commands.spawn((
            Mesh3d(globe.clone()),
            Transform::from_scale(Vec3::splat(layer.scale())),
            layer,
            ChildOf(group),
        ));

        match layer {
            SceneLayer::Surface => shell.insert(MeshMaterial3d(surface.clone())),
            SceneLayer::Lights => shell.insert(MeshMaterial3d(lights.clone())),
            SceneLayer::Clouds => shell.insert(MeshMaterial3d(clouds.clone())),
            SceneLayer::Atmosphere => shell.insert(MeshMaterial3d(glow.clone())),
        };

        debug!("Spawned {} shell at scale {}", layer.name(), layer.scale());
    }

    // sun light, fixed
    commands.spawn((
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(Vec3::from(SUN_POSITION)).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    Ok(())
}

// a missing texture should not take the layer down with it
// drop the handle so the material binds the fallback image instead
fn fallback_failed_textures(
    mut failures: EventReader<AssetLoadFailedEvent<Image>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut surface_materials: ResMut<Assets<SurfaceMaterial>>,
    mut cloud_materials: ResMut<Assets<CloudMaterial>>,
) {
    for failure in failures.read() {
        let cleared = clear_failed_texture(&mut surface_materials, failure.id)
            + clear_failed_texture(&mut cloud_materials, failure.id)
            + clear_failed_texture(&mut standard_materials, failure.id);

        warn!(
            "Texture {} failed to load ({}), {} material slot(s) now untextured",
            failure.path, failure.error, cleared
        );
    }
}

// cosmetic drift, the one place a per-frame increment is fine
fn spin_clouds(
    time: Res<Time>,
    mut layers: Query<(&SceneLayer, &mut Transform)>,
) {
    let delta_rotation = Quat::from_rotation_y(CLOUD_ROTATION_SPEED * time.delta_secs());

    for (layer, mut transform) in layers.iter_mut() {
        if *layer == SceneLayer::Clouds {
            transform.rotation = transform.rotation * delta_rotation;
        }
    }
}
