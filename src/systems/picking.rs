//! picking.rs
//!
//! Pointer to world ray, and ray vs body hit tests
//! Bodies are tested against a bounding sphere instead of their meshes,
//! models arrive late and the sphere is good enough at this scale

use bevy::prelude::*;

/// Bounding sphere used for click hit tests
#[derive(Component, Clone, Copy, Debug)]
pub struct HitSphere {
    pub radius: f32,
}

// viewport pixels to normalized device coordinates
// (0, 0) is top-left in bevy window space, y flips
pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        2.0 * cursor.x / viewport.x - 1.0,
        -(2.0 * cursor.y / viewport.y) + 1.0,
    )
}

/// Cast a world space ray through the given NDC point
pub fn ray_from_ndc(camera: &Camera, camera_transform: &GlobalTransform, ndc: Vec2) -> Option<Ray3d> {
    // reverse-z, near plane sits at 1
    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    let direction = Dir3::new(far - near).ok()?;

    Some(Ray3d::new(near, direction))
}

/// Ray parameter of the first hit in front of the origin, if any
// https://en.wikipedia.org/wiki/Line%E2%80%93sphere_intersection
pub fn ray_sphere_distance(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(*ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let (t_near, t_far) = (-b - sqrt_disc, -b + sqrt_disc);

    // origin inside the sphere counts as a hit at the exit point
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        Some(t_far)
    } else {
        None
    }
}

/// Closest candidate under the ray, ties go to the first one seen
pub fn nearest_hit<T>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (T, Vec3, f32)>,
) -> Option<T> {
    candidates
        .into_iter()
        .filter_map(|(id, center, radius)| {
            ray_sphere_distance(ray, center, radius).map(|t| (id, t))
        })
        .fold(None, |best: Option<(T, f32)>, (id, t)| match best {
            Some((_, best_t)) if best_t <= t => best,
            _ => Some((id, t)),
        })
        .map(|(id, _)| id)
}
