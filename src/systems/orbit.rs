//! orbit.rs
//!
//! Closed-form orbit poses for every body in the scene.
//! Everything here is recomputed from absolute elapsed time each frame,
//! nothing is integrated, so poses never drift with frame rate

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::config::EARTH_RADIUS_KM;

/// Shape of the path in the body's parent frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitPlane {
    /// flat circle in the XZ plane
    Equatorial,
    /// circle in XZ with a vertical bob of `amplitude * sin(angle)`
    Inclined { amplitude: f32 },
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Orbit {
    pub radius: f32,
    pub period: f64, // seconds
    pub phase: f32,
    pub plane: OrbitPlane,
    // yaw = heading - angle, keeps the model's forward axis on the tangent
    // depends on how the asset was authored
    pub heading: Option<f32>,
}

impl Orbit {
    pub fn new(radius: f32, period: f64) -> Self {
        Self {
            radius,
            period,
            phase: 0.0,
            plane: OrbitPlane::Equatorial,
            heading: None,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn inclined(mut self, amplitude: f32) -> Self {
        self.plane = OrbitPlane::Inclined { amplitude };
        self
    }

    pub fn facing(mut self, heading: f32) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn angle(&self, t: f64) -> f32 {
        orbit_angle(t, self.period, self.phase)
    }

    pub fn position(&self, t: f64) -> Vec3 {
        let angle = self.angle(t);
        let y = match self.plane {
            OrbitPlane::Equatorial => 0.0,
            OrbitPlane::Inclined { amplitude } => amplitude * angle.sin(),
        };

        Vec3::new(self.radius * angle.cos(), y, self.radius * angle.sin())
    }

    /// Yaw that keeps the body tangent to its path, if it has a calibration
    pub fn yaw(&self, t: f64) -> Option<f32> {
        self.heading.map(|heading| heading - self.angle(t))
    }

    // scene units per second along the circle
    pub fn speed(&self) -> f32 {
        TAU * self.radius / self.period as f32
    }

    pub fn speed_kmh(&self) -> f32 {
        self.speed() * EARTH_RADIUS_KM * 3600.0
    }
}

/// Angle along the orbit at time `t`, in radians
/// Uses euclidean remainder so negative times wrap the same way
pub fn orbit_angle(t: f64, period: f64, phase: f32) -> f32 {
    let fraction = t.rem_euclid(period) / period;
    (fraction * std::f64::consts::TAU) as f32 + phase
}

/// Toggles visibility on an independent timer
#[derive(Component, Clone, Copy, Debug)]
pub struct Blink {
    pub interval: f64, // seconds
}

/// Visible during even intervals, hidden during odd ones
pub fn blink_visible(t: f64, interval: f64) -> bool {
    (t / interval).floor().rem_euclid(2.0) == 0.0
}

pub fn update_orbits(
    time: Res<Time>,
    mut bodies: Query<(&Orbit, &mut Transform)>,
) {
    let t = time.elapsed_secs_f64();

    for (orbit, mut transform) in bodies.iter_mut() {
        transform.translation = orbit.position(t);

        if let Some(yaw) = orbit.yaw(t) {
            transform.rotation = Quat::from_rotation_y(yaw);
        }
    }
}

pub fn update_blink(
    time: Res<Time>,
    mut bodies: Query<(&Blink, &mut Visibility)>,
) {
    let t = time.elapsed_secs_f64();

    for (blink, mut visibility) in bodies.iter_mut() {
        let next = if blink_visible(t, blink.interval) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        // avoid tripping change detection every frame
        visibility.set_if_neq(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::f32::consts::{FRAC_PI_2, PI};
    use std::time::Duration;

    const EPS: f32 = 1e-4;

    #[test]
    fn angle_is_periodic() {
        for t in [0.0, 0.37, 2.5, 9.99, 123.4, -4.2] {
            let a = orbit_angle(t, 10.0, 0.3);
            let b = orbit_angle(t + 10.0, 10.0, 0.3);
            assert!((a - b).abs() < EPS, "t={t}: {a} vs {b}");
        }
    }

    #[test]
    fn quarter_period_lands_on_positive_z() {
        let orbit = Orbit::new(1.005, 10.0);
        let pos = orbit.position(2.5);

        assert!((orbit.angle(2.5) - FRAC_PI_2).abs() < EPS);
        assert!(pos.x.abs() < EPS);
        assert!(pos.y.abs() < EPS);
        assert!((pos.z - 1.005).abs() < EPS);
    }

    #[test]
    fn position_stays_on_circle_for_any_step() {
        let orbit = Orbit::new(1.005, 10.0).with_phase(0.7);

        for step in [0.016, 0.1, 0.333] {
            let mut t = 0.0;
            while t < 25.0 {
                let pos = orbit.position(t);
                assert!(pos.y.abs() < EPS);
                assert!((pos.xz().length() - 1.005).abs() < EPS);
                t += step;
            }
        }
    }

    #[test]
    fn inclined_orbit_bobs_vertically() {
        let orbit = Orbit::new(1.25, 30.0).inclined(0.25);

        let top = orbit.position(7.5);
        assert!((top.y - 0.25).abs() < EPS);
        assert!((top.z - 1.25).abs() < EPS);

        let bottom = orbit.position(22.5);
        assert!((bottom.y + 0.25).abs() < EPS);

        // horizontal projection still on the circle
        for i in 0..30 {
            let pos = orbit.position(i as f64);
            assert!((pos.xz().length() - 1.25).abs() < EPS);
        }
    }

    #[test]
    fn heading_follows_tangent() {
        let orbit = Orbit::new(1.0, 10.0).facing(FRAC_PI_2);
        assert!((orbit.yaw(0.0).unwrap() - FRAC_PI_2).abs() < EPS);
        assert!((orbit.yaw(5.0).unwrap() - (FRAC_PI_2 - PI)).abs() < EPS);
        assert!(Orbit::new(1.0, 10.0).yaw(5.0).is_none());
    }

    #[test]
    fn blink_flips_every_interval() {
        assert!(blink_visible(0.0, 1.0));
        assert!(blink_visible(0.999, 1.0));
        assert!(!blink_visible(1.0, 1.0));
        assert!(!blink_visible(1.999, 1.0));
        assert!(blink_visible(2.0, 1.0));
        assert!(!blink_visible(3.0, 1.0));

        // sampled at ~60fps, exactly one flip per second
        let mut flips = 0;
        let mut last = blink_visible(0.0, 1.0);
        for frame in 1..=600 {
            let now = blink_visible(frame as f64 / 60.0 + 0.001, 1.0);
            if now != last {
                flips += 1;
                last = now;
            }
        }
        assert_eq!(flips, 10);
    }

    #[test]
    fn speed_in_kmh() {
        let orbit = Orbit::new(1.0, 3600.0);
        assert!((orbit.speed_kmh() - TAU * EARTH_RADIUS_KM).abs() < 0.5);
    }

    #[test]
    fn system_poses_bodies_from_elapsed_time() {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_to(Duration::from_millis(2500));
        world.insert_resource(time);

        let body = world
            .spawn((
                Orbit::new(1.005, 10.0).facing(FRAC_PI_2),
                Transform::default(),
                Blink { interval: 1.0 },
                Visibility::Inherited,
            ))
            .id();

        world.run_system_once(update_orbits).unwrap();
        world.run_system_once(update_blink).unwrap();

        let transform = world.get::<Transform>(body).unwrap();
        assert!((transform.translation - Vec3::new(0.0, 0.0, 1.005)).length() < EPS);
        assert_eq!(world.get::<Visibility>(body), Some(&Visibility::Inherited));

        let mut time = world.resource_mut::<Time>();
        time.advance_to(Duration::from_millis(3500));
        world.run_system_once(update_blink).unwrap();
        assert_eq!(world.get::<Visibility>(body), Some(&Visibility::Hidden));
    }
}
