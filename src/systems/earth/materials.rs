use bevy::prelude::*;
use bevy::render::render_resource::*;
use bevy::reflect::TypePath;
use bevy::asset::Asset;

use crate::systems::earth::SceneLayer;

// sun direction data (needs to be in a struct)
// vec3 + f32 packs into one 16-byte row
// https://www.w3.org/TR/WGSL/#address-space-layout-constraints
#[derive(ShaderType, Clone, Copy, Debug)]
#[repr(C)]
pub struct SurfaceUniform {
    pub sun_direction: Vec3,
    pub bump_scale: f32,
}

#[derive(ShaderType, Clone, Copy, Debug)]
#[repr(C)]
pub struct CloudUniform {
    pub sun_direction: Vec3,
    pub opacity: f32,
}

// rim glow parameters
// https://en.wikipedia.org/wiki/Schlick%27s_approximation
#[derive(ShaderType, Clone, Copy, Debug)]
#[repr(C)]
pub struct FresnelUniform {
    pub rim_color: Vec4,
    pub facing_color: Vec4,
    pub bias: f32,
    pub scale: f32,
    pub power: f32,
    pub _padding: f32,
}

// diffuse + bump + specular
// texture slots are optional so a failed load can fall back to the default image
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SurfaceMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub day_texture: Option<Handle<Image>>,
    #[texture(2)]
    #[sampler(3)]
    pub specular_map: Option<Handle<Image>>,
    #[texture(4)]
    #[sampler(5)]
    pub bump_map: Option<Handle<Image>>,
    #[uniform(6)]
    pub surface_uniform: SurfaceUniform,
}

impl Material for SurfaceMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/surface.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }
}

// cloud material, colour map + separate alpha mask
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct CloudMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub cloud_texture: Option<Handle<Image>>,
    #[texture(2)]
    #[sampler(3)]
    pub alpha_mask: Option<Handle<Image>>,
    #[uniform(4)]
    pub cloud_uniform: CloudUniform,
}

impl Material for CloudMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/clouds.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn depth_bias(&self) -> f32 {
        SceneLayer::Clouds.depth_bias()
    }
}

// view dependent rim glow for the atmosphere shell
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct FresnelMaterial {
    #[uniform(0)]
    pub fresnel_uniform: FresnelUniform,
}

impl Material for FresnelMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/fresnel.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn depth_bias(&self) -> f32 {
        SceneLayer::Atmosphere.depth_bias()
    }
}

/// Materials whose textures can be dropped when their image fails to load
pub trait TextureSlots {
    fn texture_slots(&mut self) -> Vec<&mut Option<Handle<Image>>>;
}

impl TextureSlots for SurfaceMaterial {
    fn texture_slots(&mut self) -> Vec<&mut Option<Handle<Image>>> {
        vec![&mut self.day_texture, &mut self.specular_map, &mut self.bump_map]
    }
}

impl TextureSlots for CloudMaterial {
    fn texture_slots(&mut self) -> Vec<&mut Option<Handle<Image>>> {
        vec![&mut self.cloud_texture, &mut self.alpha_mask]
    }
}

impl TextureSlots for StandardMaterial {
    fn texture_slots(&mut self) -> Vec<&mut Option<Handle<Image>>> {
        vec![&mut self.base_color_texture, &mut self.emissive_texture]
    }
}

/// Clear every slot pointing at `failed`, returns how many were cleared
pub fn clear_failed_texture<M: Asset + TextureSlots>(
    materials: &mut Assets<M>,
    failed: AssetId<Image>,
) -> usize {
    let mut cleared = 0;

    for (_, material) in materials.iter_mut() {
        for slot in material.texture_slots() {
            if slot.as_ref().is_some_and(|handle| handle.id() == failed) {
                *slot = None;
                cleared += 1;
            }
        }
    }

    cleared
}
