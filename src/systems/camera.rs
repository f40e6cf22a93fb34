use bevy::prelude::*;
use bevy::input::mouse::MouseWheel;

use crate::config::{CAMERA_MAX_RADIUS, CAMERA_MIN_RADIUS, CAMERA_START_RADIUS, CAMERA_ZOOM_STEP};
use crate::systems::focus::FocusController;

// free-view camera rig, only drives the camera while nothing is focused
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub radius: f32,
    pub speed: f32,
    pub angle: f32,
    pub v_angle: f32,
    pub is_dragging: bool,
    pub target: Vec3,

    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: CAMERA_START_RADIUS,
            speed: 0.5,
            angle: std::f32::consts::FRAC_PI_2,
            v_angle: 0.0,
            is_dragging: false,
            target: Vec3::ZERO,

            min_radius: CAMERA_MIN_RADIUS,
            max_radius: CAMERA_MAX_RADIUS,
        }
    }
}

impl OrbitCamera {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self {
            radius,
            speed,
            ..default()
        }
    }

    // set target point for the camera to orbit
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn with_zoom_limits(mut self, min_radius: f32, max_radius: f32) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    // calculate world position from spherical coordinates
    // https://en.wikipedia.org/wiki/Spherical_coordinate_system#Cartesian_coordinates
    pub fn calculate_position(&self) -> Vec3 {
        let x = self.radius * self.v_angle.cos() * self.angle.cos();
        let y = self.radius * self.v_angle.sin();
        let z = self.radius * self.v_angle.cos() * self.angle.sin();

        self.target + Vec3::new(x, y, z)
    }

    pub fn orbit_by(&mut self, delta: Vec2) {
        self.angle += delta.x * self.speed * 0.01;
        self.v_angle += delta.y * self.speed * 0.01;
        // clamp pitch
        self.v_angle = self.v_angle.clamp(-1.5, 1.5);
    }

    pub fn zoom_by(&mut self, steps: f32) {
        self.radius -= steps * CAMERA_ZOOM_STEP;
        self.radius = self.radius.clamp(self.min_radius, self.max_radius);
    }
}

pub fn update_free_camera(
    focus: Res<FocusController>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<CursorMoved>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    // track the button even while focused, a release can land in that window
    let dragging = mouse_buttons.pressed(MouseButton::Right);
    for (_, mut camera) in camera_query.iter_mut() {
        camera.is_dragging = dragging;
    }

    // focused camera is owned by the focus systems
    if focus.is_focused() {
        mouse_motion.clear();
        scroll_events.clear();
        return;
    }

    for (mut transform, mut camera) in camera_query.iter_mut() {
        // update camera angles
        if camera.is_dragging {
            for motion in mouse_motion.read() {
                if let Some(delta) = motion.delta {
                    camera.orbit_by(delta);
                }
            }
        }

        // handle mouse scroll
        for scroll in scroll_events.read() {
            camera.zoom_by(scroll.y);
        }

        // update camera position/orientation
        transform.translation = camera.calculate_position();
        transform.look_at(camera.target, Vec3::Y);
    }

    // drop unread motion so it doesn't pile up between drags
    mouse_motion.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::focus::CameraPose;

    #[test]
    fn default_rig_sits_on_positive_z() {
        let camera = OrbitCamera::new(3.0, 0.5);
        let pos = camera.calculate_position();
        assert!(pos.x.abs() < 1e-5);
        assert!(pos.y.abs() < 1e-5);
        assert!((pos.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut camera = OrbitCamera::new(3.0, 0.5).with_zoom_limits(1.5, 4.0);
        camera.zoom_by(100.0);
        assert_eq!(camera.radius, 1.5);
        camera.zoom_by(-100.0);
        assert_eq!(camera.radius, 4.0);

        camera.orbit_by(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.v_angle, 1.5);
    }

    #[test]
    fn drag_released_while_focused_does_not_stick() {
        use bevy::ecs::system::RunSystemOnce;
        use bevy::input::mouse::MouseWheel;

        let mut world = World::new();
        world.init_resource::<Events<CursorMoved>>();
        world.init_resource::<Events<MouseWheel>>();
        world.init_resource::<FocusController>();
        world.init_resource::<ButtonInput<MouseButton>>();

        let camera = world.spawn((Transform::default(), OrbitCamera::default())).id();
        let body = world.spawn_empty().id();

        // right button goes down in free view
        world.resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Right);
        world.run_system_once(update_free_camera).unwrap();
        assert!(world.get::<OrbitCamera>(camera).unwrap().is_dragging);

        // a body gets focused, then the button comes up
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 3.0),
            look_at: Vec3::ZERO,
        };
        world.resource_mut::<FocusController>().click(Some(body), pose);
        {
            let mut buttons = world.resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            buttons.release(MouseButton::Right);
        }
        world.run_system_once(update_free_camera).unwrap();

        // back to free view, cursor moves with no button held
        world.resource_mut::<FocusController>().release();
        world.resource_mut::<ButtonInput<MouseButton>>().clear();
        let angle = world.get::<OrbitCamera>(camera).unwrap().angle;
        world.send_event(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(500.0, 300.0),
            delta: Some(Vec2::new(100.0, 0.0)),
        });
        world.run_system_once(update_free_camera).unwrap();

        let rig = world.get::<OrbitCamera>(camera).unwrap();
        assert!(!rig.is_dragging);
        assert_eq!(rig.angle, angle);
    }

    #[test]
    fn target_offsets_position() {
        let camera = OrbitCamera::new(2.0, 0.5).with_target(Vec3::X);
        assert!((camera.calculate_position() - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-5);
    }
}
