//! bodies.rs
//!
//! The things orbiting the globe: a blinking marker, an airplane and the ISS
//! Primitive bodies are spawned on startup, modelled ones once their glTF arrives
//! Until then they simply don't exist, so nothing else has to special-case them

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy::asset::LoadState;
use bevy::gltf::Gltf;

use crate::config::{
    AIRPLANE_HEADING, AIRPLANE_MODEL, AIRPLANE_ORBIT_PERIOD, AIRPLANE_ORBIT_RADIUS, AIRPLANE_SCALE,
    HALO_MAJOR_RADIUS, HALO_MINOR_RADIUS, ISS_MODEL, ISS_ORBIT_AMPLITUDE, ISS_ORBIT_PERIOD,
    ISS_ORBIT_RADIUS, ISS_PHASE, ISS_SCALE, MARKER_BLINK_INTERVAL, MARKER_ORBIT_PERIOD,
    MARKER_ORBIT_RADIUS, MARKER_SIZE,
};
use crate::systems::FrameSet;
use crate::systems::earth::{EarthGroup, spawn_globe};
use crate::systems::orbit::{Blink, Orbit, update_blink, update_orbits};
use crate::systems::picking::HitSphere;

pub struct BodiesPlugin;

impl Plugin for BodiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelRequests>()
            .add_systems(Startup, (spawn_marker.after(spawn_globe), request_models))
            .add_systems(Update, (
                poll_models,
                update_orbits,
                update_blink,
            ).chain().in_set(FrameSet::Kinematics));
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Marker,
    Airplane,
    Iss,
}

// static description of a body
pub struct BodySpec {
    pub orbit: Orbit,
    pub hit_radius: f32,
    pub blink: Option<Blink>,
    // (path, uniform scale) for bodies that come from a model file
    pub model: Option<(&'static str, f32)>,
}

impl BodyKind {
    pub const ALL: [BodyKind; 3] = [BodyKind::Marker, BodyKind::Airplane, BodyKind::Iss];

    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Marker => "Marker",
            BodyKind::Airplane => "X-15",
            BodyKind::Iss => "ISS",
        }
    }

    pub fn spec(self) -> BodySpec {
        match self {
            BodyKind::Marker => BodySpec {
                orbit: Orbit::new(MARKER_ORBIT_RADIUS, MARKER_ORBIT_PERIOD),
                hit_radius: MARKER_SIZE * 1.2,
                blink: Some(Blink { interval: MARKER_BLINK_INTERVAL }),
                model: None,
            },
            BodyKind::Airplane => BodySpec {
                orbit: Orbit::new(AIRPLANE_ORBIT_RADIUS, AIRPLANE_ORBIT_PERIOD)
                    .facing(AIRPLANE_HEADING),
                hit_radius: HALO_MAJOR_RADIUS,
                blink: None,
                model: Some((AIRPLANE_MODEL, AIRPLANE_SCALE)),
            },
            BodyKind::Iss => BodySpec {
                orbit: Orbit::new(ISS_ORBIT_RADIUS, ISS_ORBIT_PERIOD)
                    .with_phase(ISS_PHASE)
                    .inclined(ISS_ORBIT_AMPLITUDE),
                hit_radius: 0.1,
                blink: None,
                model: Some((ISS_MODEL, ISS_SCALE)),
            },
        }
    }
}

/// Where an asynchronous model load stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Loading,
    Attached(Entity),
    Failed,
}

pub struct ModelRequest {
    pub kind: BodyKind,
    pub handle: Handle<Gltf>,
    pub state: ModelState,
}

#[derive(Resource, Default)]
pub struct ModelRequests(pub Vec<ModelRequest>);

/// What one poll of the asset server means for a pending model
#[derive(Debug, PartialEq, Eq)]
pub enum LoadProgress {
    Pending,
    Ready,
    Failed(String),
}

pub fn load_progress(state: Option<LoadState>) -> LoadProgress {
    match state {
        Some(LoadState::Loaded) => LoadProgress::Ready,
        Some(LoadState::Failed(error)) => LoadProgress::Failed(error.to_string()),
        Some(LoadState::NotLoaded) | Some(LoadState::Loading) | None => LoadProgress::Pending,
    }
}

// the components every body carries, minus its visuals
fn body_bundle(kind: BodyKind, group: Entity, scale: f32) -> impl Bundle {
    let spec = kind.spec();
    let t0 = spec.orbit.position(0.0);

    (
        kind,
        spec.orbit,
        HitSphere { radius: spec.hit_radius },
        Transform::from_translation(t0).with_scale(Vec3::splat(scale)),
        ChildOf(group),
    )
}

fn spawn_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    group: Query<Entity, With<EarthGroup>>,
) -> Result {
    let group = group.single()?;
    let kind = BodyKind::Marker;

    let mut marker = commands.spawn((
        body_bundle(kind, group, 1.0),
        Mesh3d(meshes.add(Sphere::new(MARKER_SIZE).mesh().ico(8)?)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Srgba::hex("ff0000")?.into(),
            unlit: true,
            ..default()
        })),
        Visibility::Inherited,
    ));

    if let Some(blink) = kind.spec().blink {
        marker.insert(blink);
    }

    Ok(())
}

// kick off every model load, poll_models picks them up later
fn request_models(
    mut requests: ResMut<ModelRequests>,
    asset_server: Res<AssetServer>,
) {
    for kind in BodyKind::ALL {
        let Some((path, _)) = kind.spec().model else {
            continue;
        };

        info!("Loading {} model from {}", kind.name(), path);
        requests.0.push(ModelRequest {
            kind,
            handle: asset_server.load(path),
            state: ModelState::Loading,
        });
    }
}

fn poll_models(
    mut commands: Commands,
    mut requests: ResMut<ModelRequests>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    group: Query<Entity, With<EarthGroup>>,
) {
    let Ok(group) = group.single() else {
        return;
    };

    for request in requests.0.iter_mut() {
        advance_request(
            request,
            |handle| load_progress(asset_server.get_load_state(handle)),
            |handle| {
                gltfs.get(handle).and_then(|gltf| {
                    gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned())
                })
            },
            |kind, scene| {
                let scale = kind.spec().model.map_or(1.0, |(_, scale)| scale);
                let body = commands
                    .spawn((body_bundle(kind, group, scale), SceneRoot(scene)))
                    .id();

                if kind == BodyKind::Airplane {
                    spawn_halo(&mut commands, body, scale, &mut meshes, &mut materials);
                }
                body
            },
        );
    }
}

/// Moves one request along, attaching the body once its scene is available
///
/// Settled requests (attached or failed) are left alone, so a failed model
/// is reported once and never retried
pub fn advance_request(
    request: &mut ModelRequest,
    progress: impl FnOnce(&Handle<Gltf>) -> LoadProgress,
    scene_of: impl FnOnce(&Handle<Gltf>) -> Option<Handle<Scene>>,
    attach: impl FnOnce(BodyKind, Handle<Scene>) -> Entity,
) {
    if request.state != ModelState::Loading {
        return;
    }

    let kind = request.kind;
    match progress(&request.handle) {
        LoadProgress::Pending => {}
        LoadProgress::Failed(error) => {
            error!("Failed to load {} model: {}", kind.name(), error);
            request.state = ModelState::Failed;
        }
        LoadProgress::Ready => {
            let Some(scene) = scene_of(&request.handle) else {
                error!("{} model has no scene to show", kind.name());
                request.state = ModelState::Failed;
                return;
            };

            let body = attach(kind, scene);
            info!("{} model attached", kind.name());
            request.state = ModelState::Attached(body);
        }
    }
}

// glow ring so the plane stays visible at globe scale
fn spawn_halo(
    commands: &mut Commands,
    body: Entity,
    body_scale: f32,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let halo_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Add,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Torus::new(
            HALO_MAJOR_RADIUS - HALO_MINOR_RADIUS,
            HALO_MAJOR_RADIUS + HALO_MINOR_RADIUS,
        ))),
        MeshMaterial3d(halo_material),
        // undo the model scale so the ring keeps its size in globe units
        Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2))
            .with_scale(Vec3::splat(1.0 / body_scale)),
        ChildOf(body),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_marker_blinks() {
        for kind in BodyKind::ALL {
            assert_eq!(kind.spec().blink.is_some(), kind == BodyKind::Marker);
        }
    }

    #[test]
    fn modelled_bodies_have_paths() {
        assert!(BodyKind::Marker.spec().model.is_none());
        assert_eq!(BodyKind::Airplane.spec().model.map(|(path, _)| path), Some(AIRPLANE_MODEL));
        assert_eq!(BodyKind::Iss.spec().model.map(|(path, _)| path), Some(ISS_MODEL));
    }

    #[test]
    fn iss_orbit_is_inclined_and_offset() {
        let orbit = BodyKind::Iss.spec().orbit;
        let start = orbit.position(0.0);
        // phase of pi puts it on the far side at t = 0
        assert!((start.x + ISS_ORBIT_RADIUS).abs() < 1e-4);
        assert!(orbit.position(ISS_ORBIT_PERIOD * 0.75).y.abs() > 0.2);
    }

    #[test]
    fn pending_until_loaded() {
        assert_eq!(load_progress(None), LoadProgress::Pending);
        assert_eq!(load_progress(Some(LoadState::NotLoaded)), LoadProgress::Pending);
        assert_eq!(load_progress(Some(LoadState::Loading)), LoadProgress::Pending);
        assert_eq!(load_progress(Some(LoadState::Loaded)), LoadProgress::Ready);
    }

    #[test]
    fn failed_load_reports_error() {
        use std::path::PathBuf;
        use std::sync::Arc;

        use bevy::asset::AssetLoadError;
        use bevy::asset::io::AssetReaderError;

        let error = AssetLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from(
            "glb/missing.glb",
        )));
        let progress = load_progress(Some(LoadState::Failed(Arc::new(error))));
        assert!(matches!(progress, LoadProgress::Failed(message) if message.contains("missing.glb")));
    }

    #[test]
    fn failed_model_stays_absent_and_is_not_retried() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        world.insert_resource(ModelRequests(vec![ModelRequest {
            kind: BodyKind::Airplane,
            handle: Handle::default(),
            state: ModelState::Loading,
        }]));

        let poll_failing = |mut commands: Commands, mut requests: ResMut<ModelRequests>| {
            let mut polled = 0;
            for request in requests.0.iter_mut() {
                advance_request(
                    request,
                    |_| {
                        polled += 1;
                        LoadProgress::Failed("Path not found: glb/missing.glb".to_string())
                    },
                    |_| None,
                    |kind, scene| commands.spawn((kind, SceneRoot(scene))).id(),
                );
            }
            polled
        };

        assert_eq!(world.run_system_once(poll_failing).unwrap(), 1);
        assert_eq!(world.resource::<ModelRequests>().0[0].state, ModelState::Failed);

        // settled, the next frame doesn't look again
        assert_eq!(world.run_system_once(poll_failing).unwrap(), 0);
        assert_eq!(world.resource::<ModelRequests>().0[0].state, ModelState::Failed);

        let mut bodies = world.query::<&BodyKind>();
        assert_eq!(bodies.iter(&world).count(), 0);
    }

    #[test]
    fn loaded_model_without_scene_fails() {
        let mut request = ModelRequest {
            kind: BodyKind::Iss,
            handle: Handle::default(),
            state: ModelState::Loading,
        };
        advance_request(
            &mut request,
            |_| LoadProgress::Ready,
            |_| None,
            |_, _| unreachable!("nothing to attach"),
        );
        assert_eq!(request.state, ModelState::Failed);
    }

    #[test]
    fn ready_model_is_attached() {
        let mut request = ModelRequest {
            kind: BodyKind::Iss,
            handle: Handle::default(),
            state: ModelState::Loading,
        };
        let body = Entity::from_raw(7);
        advance_request(
            &mut request,
            |_| LoadProgress::Ready,
            |_| Some(Handle::default()),
            |kind, _| {
                assert_eq!(kind, BodyKind::Iss);
                body
            },
        );
        assert_eq!(request.state, ModelState::Attached(body));
    }

    #[test]
    fn absent_bodies_are_skipped() {
        use bevy::ecs::system::RunSystemOnce;

        // only the marker exists, models haven't arrived
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        let marker = world
            .spawn((BodyKind::Marker.spec().orbit, Transform::default()))
            .id();

        world.run_system_once(update_orbits).unwrap();
        let pos = world.get::<Transform>(marker).unwrap().translation;
        assert!((pos.length() - MARKER_ORBIT_RADIUS).abs() < 1e-4);
    }
}
