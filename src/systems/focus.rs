//! focus.rs
//!
//! Camera focus state machine
//! FREE: the orbit rig drives the camera
//! FOCUSED: the camera trails a body, eased every frame
//! The pose from before focusing is kept inside the focused state and put back verbatim on release

use bevy::prelude::*;

use crate::config::{FOCUS_SMOOTHING, FOCUS_STANDOFF};
use crate::systems::bodies::BodyKind;
use crate::systems::camera::OrbitCamera;
use crate::systems::earth::EarthGroup;
use crate::systems::picking::{HitSphere, cursor_to_ndc, nearest_hit, ray_from_ndc};

/// Camera position plus the point it looks at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum CameraMode {
    #[default]
    Free,
    Focused { body: Entity, saved: CameraPose },
}

/// What a click did to the camera mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FocusChange {
    Unchanged,
    Entered(Entity),
    Retargeted(Entity),
}

#[derive(Resource, Debug, Default)]
pub struct FocusController {
    mode: CameraMode,
}

impl FocusController {
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_focused(&self) -> bool {
        matches!(self.mode, CameraMode::Focused { .. })
    }

    pub fn focused_body(&self) -> Option<Entity> {
        match self.mode {
            CameraMode::Focused { body, .. } => Some(body),
            CameraMode::Free => None,
        }
    }

    /// Feed a click result in. `current` is only stored when leaving FREE
    pub fn click(&mut self, hit: Option<Entity>, current: CameraPose) -> FocusChange {
        let Some(hit) = hit else {
            return FocusChange::Unchanged;
        };

        match self.mode {
            CameraMode::Free => {
                self.mode = CameraMode::Focused { body: hit, saved: current };
                FocusChange::Entered(hit)
            }
            CameraMode::Focused { body, .. } if body == hit => FocusChange::Unchanged,
            CameraMode::Focused { saved, .. } => {
                // keep the first free view to return to
                self.mode = CameraMode::Focused { body: hit, saved };
                FocusChange::Retargeted(hit)
            }
        }
    }

    /// Back to FREE, handing back the pose saved on entry
    pub fn release(&mut self) -> Option<CameraPose> {
        match std::mem::take(&mut self.mode) {
            CameraMode::Focused { saved, .. } => Some(saved),
            CameraMode::Free => None,
        }
    }
}

/// Where the camera wants to be for a body at `target`,
/// pushed out from the scene origin by the stand-off distance
pub fn focus_position(target: Vec3) -> Vec3 {
    let outward = target.try_normalize().unwrap_or(Vec3::Z);
    target + outward * FOCUS_STANDOFF
}

/// One smoothing step toward the focus position, look-at snaps
pub fn follow_step(current: Vec3, target: Vec3) -> CameraPose {
    CameraPose {
        position: current.lerp(focus_position(target), FOCUS_SMOOTHING),
        look_at: target,
    }
}

// "return to free view" affordance
#[derive(Component)]
pub struct ResetButton;

pub fn setup_reset_button(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(20.0),
            top: Val::Px(20.0),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
                    Visibility::Hidden,
                    ResetButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("Return to free view"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        });
}

// world position of a body parented under the (root) earth group
fn body_world_position(group: Option<&Transform>, local: &Transform) -> Vec3 {
    match group {
        Some(group) => group.transform_point(local.translation),
        None => local.translation,
    }
}

// the free view as it stands, only meaningful while the rig owns the camera
fn free_pose(transform: &Transform, rig: &OrbitCamera) -> CameraPose {
    CameraPose {
        position: transform.translation,
        look_at: rig.target,
    }
}

pub fn pick_body(
    mut focus: ResMut<FocusController>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform, &Transform, &OrbitCamera)>,
    group: Query<&Transform, (With<EarthGroup>, Without<Camera>)>,
    bodies: Query<(Entity, &Transform, &HitSphere, &BodyKind), Without<Camera>>,
    buttons: Query<&Interaction, With<Button>>,
    mut reset_button: Query<&mut Visibility, With<ResetButton>>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }

    // clicks on UI never reach the scene
    if buttons.iter().any(|interaction| *interaction != Interaction::None) {
        return;
    }

    let (Ok(window), Ok((camera, camera_global, camera_transform, rig))) =
        (windows.single(), cameras.single())
    else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let ndc = cursor_to_ndc(cursor, window.size());
    let Some(ray) = ray_from_ndc(camera, camera_global, ndc) else {
        return;
    };

    let group = group.single().ok();
    let hit = nearest_hit(
        ray,
        bodies.iter().map(|(entity, transform, sphere, _)| {
            (entity, body_world_position(group, transform), sphere.radius)
        }),
    );

    // the snapshot is only taken when leaving free view
    let pose = free_pose(camera_transform, rig);
    let change = focus.click(hit, pose);

    let name = |entity: Entity| {
        bodies.get(entity).map(|(.., kind)| kind.name()).unwrap_or("body")
    };

    match change {
        FocusChange::Entered(entity) => {
            info!("Focusing camera on {}", name(entity));
            if let Ok(mut visibility) = reset_button.single_mut() {
                *visibility = Visibility::Inherited;
            }
        }
        FocusChange::Retargeted(entity) => {
            info!("Switching focus to {}", name(entity));
        }
        FocusChange::Unchanged => {}
    }
}

pub fn release_focus(
    mut focus: ResMut<FocusController>,
    keys: Res<ButtonInput<KeyCode>>,
    pressed: Query<&Interaction, (Changed<Interaction>, With<ResetButton>)>,
    mut cameras: Query<&mut Transform, With<OrbitCamera>>,
    mut reset_button: Query<&mut Visibility, With<ResetButton>>,
) {
    let clicked = pressed.iter().any(|interaction| *interaction == Interaction::Pressed);
    if !clicked && !keys.just_pressed(KeyCode::Escape) {
        return;
    }

    let Some(saved) = focus.release() else {
        return;
    };
    info!("Camera back to free view");

    if let Ok(mut transform) = cameras.single_mut() {
        apply_pose(&mut transform, saved);
    }
    if let Ok(mut visibility) = reset_button.single_mut() {
        *visibility = Visibility::Hidden;
    }
}

pub fn follow_focused(
    focus: Res<FocusController>,
    group: Query<&Transform, (With<EarthGroup>, Without<OrbitCamera>)>,
    bodies: Query<&Transform, (With<HitSphere>, Without<OrbitCamera>)>,
    mut cameras: Query<&mut Transform, (With<OrbitCamera>, Without<HitSphere>, Without<EarthGroup>)>,
) {
    let Some(body) = focus.focused_body() else {
        return;
    };
    let (Ok(local), Ok(mut transform)) = (bodies.get(body), cameras.single_mut()) else {
        return;
    };

    let target = body_world_position(group.single().ok(), local);
    let pose = follow_step(transform.translation, target);
    apply_pose(&mut transform, pose);
}

fn apply_pose(transform: &mut Transform, pose: CameraPose) {
    transform.translation = pose.position;
    transform.look_at(pose.look_at, Vec3::Y);
}
