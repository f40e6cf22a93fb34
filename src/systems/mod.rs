use bevy::prelude::*;

pub mod bodies;
pub mod camera;
pub mod earth;
pub mod focus;
pub mod orbit;
pub mod picking;
pub mod starfield;
pub mod ui;

/// Per-frame order: pose bodies, then move the camera, then refresh the HUD.
/// Rendering happens after `Update` in bevy's own schedules
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Kinematics,
    Camera,
    Hud,
}

pub struct FramePlugin;

impl Plugin for FramePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, (
                FrameSet::Kinematics,
                FrameSet::Camera,
                FrameSet::Hud,
            ).chain())
           .init_resource::<focus::FocusController>()
           .add_systems(Update, (
                camera::update_free_camera,
                focus::pick_body,
                focus::release_focus,
                focus::follow_focused,
            ).chain().in_set(FrameSet::Camera));
    }
}
