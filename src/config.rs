use std::f32::consts::{FRAC_PI_2, PI};

// Earth measurements
// scene is in earth radii, km only used for display
pub const EARTH_RADIUS_KM: f32 = 6378.0;
pub const AXIAL_TILT_DEG: f32 = -23.4;
pub const GLOBE_DETAIL: u32 = 12;

// shell scales relative to the surface
pub const SURFACE_SCALE: f32 = 1.0;
pub const LIGHTS_SCALE: f32 = 1.0;
pub const CLOUD_SCALE: f32 = 1.003;
pub const ATMOSPHERE_SCALE: f32 = 1.01;

pub const BUMP_SCALE: f32 = 0.04;
pub const CLOUD_OPACITY: f32 = 0.8;

// fresnel rim glow
pub const RIM_COLOR: &str = "#0088ff";
pub const FACING_COLOR: &str = "#000000";
pub const FRESNEL_BIAS: f32 = 0.1;
pub const FRESNEL_SCALE: f32 = 1.0;
pub const FRESNEL_POWER: f32 = 4.0;

// Rotation speeds (radians per second)
pub const CLOUD_ROTATION_SPEED: f32 = 0.138;
pub const STAR_ROTATION_SPEED: f32 = -0.012;

// starfield
pub const STAR_COUNT: usize = 2000;
pub const STAR_MIN_RADIUS: f32 = 25.0;
pub const STAR_MAX_RADIUS: f32 = 50.0;
pub const STAR_HUE: f32 = 216.0;
pub const STAR_SATURATION: f32 = 0.2;

// sun
pub const SUN_POSITION: [f32; 3] = [-2.0, 0.5, 1.5];
pub const SUN_ILLUMINANCE: f32 = 3_000.0;

// orbiting bodies
pub const MARKER_SIZE: f32 = 0.05;
pub const MARKER_ORBIT_RADIUS: f32 = 1.005;
pub const MARKER_ORBIT_PERIOD: f64 = 10.0;
pub const MARKER_BLINK_INTERVAL: f64 = 1.0;

pub const AIRPLANE_SCALE: f32 = 0.03;
pub const AIRPLANE_ORBIT_RADIUS: f32 = 1.005;
pub const AIRPLANE_ORBIT_PERIOD: f64 = 10.0;
pub const AIRPLANE_HEADING: f32 = FRAC_PI_2;
pub const HALO_MAJOR_RADIUS: f32 = 0.08;
pub const HALO_MINOR_RADIUS: f32 = 0.02;

pub const ISS_SCALE: f32 = 0.005;
pub const ISS_ORBIT_RADIUS: f32 = 1.25;
pub const ISS_ORBIT_PERIOD: f64 = 30.0;
pub const ISS_ORBIT_AMPLITUDE: f32 = 0.25;
pub const ISS_PHASE: f32 = PI;

// camera
pub const CAMERA_START_RADIUS: f32 = 3.0;
pub const CAMERA_MIN_RADIUS: f32 = 1.2;
pub const CAMERA_MAX_RADIUS: f32 = 20.0;
pub const CAMERA_ZOOM_STEP: f32 = 0.1;
pub const FOCUS_STANDOFF: f32 = 0.3;
pub const FOCUS_SMOOTHING: f32 = 0.1;

// Asset paths
pub const EARTH_DIFFUSE_TEXTURE: &str = "textures/00_earthmap1k.jpg";
pub const EARTH_SPECULAR_TEXTURE: &str = "textures/02_earthspec1k.jpg";
pub const EARTH_BUMP_TEXTURE: &str = "textures/01_earthbump1k.jpg";
pub const EARTH_LIGHTS_TEXTURE: &str = "textures/03_earthlights1k.jpg";
pub const EARTH_CLOUDS_TEXTURE: &str = "textures/04_earthcloudmap.jpg";
pub const EARTH_CLOUDS_ALPHA_TEXTURE: &str = "textures/05_earthcloudmaptrans.jpg";
pub const AIRPLANE_MODEL: &str = "glb/north_american_x-15_plane.glb";
pub const ISS_MODEL: &str = "glb/iss.glb";

#[cfg(test)]
mod tests {
    use super::*;

    // the layout documented in assets/README.md
    #[test]
    fn asset_paths_follow_layout() {
        let textures = [
            EARTH_DIFFUSE_TEXTURE,
            EARTH_SPECULAR_TEXTURE,
            EARTH_BUMP_TEXTURE,
            EARTH_LIGHTS_TEXTURE,
            EARTH_CLOUDS_TEXTURE,
            EARTH_CLOUDS_ALPHA_TEXTURE,
        ];
        for path in textures {
            assert!(path.starts_with("textures/") && path.ends_with(".jpg"), "{path}");
        }
        for path in [AIRPLANE_MODEL, ISS_MODEL] {
            assert!(path.starts_with("glb/") && path.ends_with(".glb"), "{path}");
        }
    }
}
