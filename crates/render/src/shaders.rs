//! Embedded WGSL shader library.
//!
//! Every stage declares the same `Globals` block at group 0, binding 0, and
//! the vertex stages emit the varyings the fragment stages read:
//! location 0 normal, 1 light vector, 2 color, 3 world position.

use crate::stage::{ShaderStage, StageKind};
use facet_common::{FragmentShader, VertexShader};

/// Vertex stage: model/view/projection transform with a point light vector.
pub const LAMBERT_VERT: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    model_inv_tr: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) light_vec: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) world_pos: vec3<f32>,
};

const LIGHT_POS: vec3<f32> = vec3<f32>(5.0, 5.0, 3.0);

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = globals.model * vec4<f32>(in.position, 1.0);

    var out: VertexOutput;
    out.normal = (globals.model_inv_tr * vec4<f32>(in.normal, 0.0)).xyz;
    out.light_vec = LIGHT_POS - world.xyz;
    out.color = in.color * globals.color;
    out.world_pos = world.xyz;
    out.clip_position = globals.view_proj * world;
    return out;
}
"#;

/// Vertex stage: pushes vertices along their normal with a travelling sine.
pub const WAVE_VERT: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    model_inv_tr: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) light_vec: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) world_pos: vec3<f32>,
};

const LIGHT_POS: vec3<f32> = vec3<f32>(5.0, 5.0, 3.0);
const AMPLITUDE: f32 = 0.15;
const FREQUENCY: f32 = 4.0;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let phase = globals.time * 2.0 + in.position.y * FREQUENCY;
    let displaced = in.position + in.normal * sin(phase) * AMPLITUDE;
    let world = globals.model * vec4<f32>(displaced, 1.0);

    var out: VertexOutput;
    out.normal = (globals.model_inv_tr * vec4<f32>(in.normal, 0.0)).xyz;
    out.light_vec = LIGHT_POS - world.xyz;
    out.color = in.color * globals.color;
    out.world_pos = world.xyz;
    out.clip_position = globals.view_proj * world;
    return out;
}
"#;

/// Fragment stage: diffuse term plus a constant ambient floor.
pub const LAMBERT_FRAG: &str = r#"
struct FragmentInput {
    @location(0) normal: vec3<f32>,
    @location(1) light_vec: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) world_pos: vec3<f32>,
};

@fragment
fn fs_main(in: FragmentInput) -> @location(0) vec4<f32> {
    let diffuse = clamp(dot(normalize(in.normal), normalize(in.light_vec)), 0.0, 1.0);
    let ambient = 0.2;
    return vec4<f32>(in.color.rgb * (diffuse + ambient), in.color.a);
}
"#;

/// Fragment stage: scrolling 3D gradient noise over lambert shading, with
/// per-frame static grain on top.
pub const PERLIN_STATIC_FRAG: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    model_inv_tr: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct FragmentInput {
    @location(0) normal: vec3<f32>,
    @location(1) light_vec: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) world_pos: vec3<f32>,
};

fn gradient(p: vec3<f32>) -> vec3<f32> {
    let q = vec3<f32>(
        dot(p, vec3<f32>(127.1, 311.7, 74.7)),
        dot(p, vec3<f32>(269.5, 183.3, 246.1)),
        dot(p, vec3<f32>(113.5, 271.9, 124.6)),
    );
    return -1.0 + 2.0 * fract(sin(q) * 43758.5453);
}

fn fade(t: vec3<f32>) -> vec3<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

fn corner(cell: vec3<f32>, local: vec3<f32>, offset: vec3<f32>) -> f32 {
    return dot(gradient(cell + offset), local - offset);
}

fn perlin(p: vec3<f32>) -> f32 {
    let cell = floor(p);
    let local = fract(p);
    let u = fade(local);

    let x00 = mix(corner(cell, local, vec3<f32>(0.0, 0.0, 0.0)), corner(cell, local, vec3<f32>(1.0, 0.0, 0.0)), u.x);
    let x10 = mix(corner(cell, local, vec3<f32>(0.0, 1.0, 0.0)), corner(cell, local, vec3<f32>(1.0, 1.0, 0.0)), u.x);
    let x01 = mix(corner(cell, local, vec3<f32>(0.0, 0.0, 1.0)), corner(cell, local, vec3<f32>(1.0, 0.0, 1.0)), u.x);
    let x11 = mix(corner(cell, local, vec3<f32>(0.0, 1.0, 1.0)), corner(cell, local, vec3<f32>(1.0, 1.0, 1.0)), u.x);
    return mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z);
}

fn grain(p: vec3<f32>) -> f32 {
    return fract(sin(dot(p, vec3<f32>(12.9898, 78.233, 45.164))) * 43758.5453);
}

@fragment
fn fs_main(in: FragmentInput) -> @location(0) vec4<f32> {
    let p = in.world_pos * 3.0 + vec3<f32>(0.0, globals.time * 0.5, 0.0);
    let n = perlin(p) * 0.5 + 0.5;
    let noise = grain(in.world_pos + vec3<f32>(globals.time)) * 0.25;
    let diffuse = clamp(dot(normalize(in.normal), normalize(in.light_vec)), 0.0, 1.0);
    let shade = (diffuse + 0.2) * (0.5 + n);
    return vec4<f32>(in.color.rgb * shade + vec3<f32>(noise), in.color.a);
}
"#;

/// Fragment stage: bright core where the surface faces the light, widening
/// and narrowing with time.
pub const PULSING_GLOW_FRAG: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    model_inv_tr: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct FragmentInput {
    @location(0) normal: vec3<f32>,
    @location(1) light_vec: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) world_pos: vec3<f32>,
};

const GLOW: vec3<f32> = vec3<f32>(1.0, 0.95, 0.8);

@fragment
fn fs_main(in: FragmentInput) -> @location(0) vec4<f32> {
    let pulse = 0.5 + 0.5 * sin(globals.time * 3.0);
    let facing = abs(dot(normalize(in.normal), normalize(in.light_vec)));
    let core = pow(facing, 2.0 + 6.0 * pulse);
    let rgb = mix(in.color.rgb * 0.3, GLOW, core);
    return vec4<f32>(rgb, in.color.a);
}
"#;

pub fn vertex_stage(selector: VertexShader) -> ShaderStage {
    let (label, source) = match selector {
        VertexShader::Lambert => ("lambert_vert", LAMBERT_VERT),
        VertexShader::Wave => ("wave_vert", WAVE_VERT),
    };
    ShaderStage {
        kind: StageKind::Vertex,
        label,
        source,
    }
}

pub fn fragment_stage(selector: FragmentShader) -> ShaderStage {
    let (label, source) = match selector {
        FragmentShader::Lambert => ("lambert_frag", LAMBERT_FRAG),
        FragmentShader::PerlinStatic => ("perlin_static_frag", PERLIN_STATIC_FRAG),
        FragmentShader::PulsingGlow => ("pulsing_glow_frag", PULSING_GLOW_FRAG),
    };
    ShaderStage {
        kind: StageKind::Fragment,
        label,
        source,
    }
}

/// The stage pair for a panel selection.
pub fn stages(vertex: VertexShader, fragment: FragmentShader) -> [ShaderStage; 2] {
    [vertex_stage(vertex), fragment_stage(fragment)]
}

/// Every stage in the library, for one-time validation at startup.
pub fn all_stages() -> Vec<ShaderStage> {
    VertexShader::ALL
        .into_iter()
        .map(vertex_stage)
        .chain(FragmentShader::ALL.into_iter().map(fragment_stage))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::{Uniform, UniformSet};

    #[test]
    fn every_stage_declares_its_entry_point() {
        for stage in all_stages() {
            assert!(stage.declares_entry_point(), "{}", stage.label);
        }
    }

    #[test]
    fn library_covers_every_selector() {
        assert_eq!(all_stages().len(), 5);
        let [v, f] = stages(VertexShader::Wave, FragmentShader::Lambert);
        assert_eq!(v.kind, StageKind::Vertex);
        assert_eq!(f.kind, StageKind::Fragment);
        assert_eq!(v.label, "wave_vert");
    }

    #[test]
    fn lambert_pair_reads_no_time() {
        let [v, f] = stages(VertexShader::Lambert, FragmentShader::Lambert);
        let set = UniformSet::scan([v.source, f.source]);
        assert!(set.contains(Uniform::ViewProj));
        assert!(set.contains(Uniform::Color));
        assert!(!set.contains(Uniform::Time));
    }

    #[test]
    fn animated_stages_read_time() {
        for stage in [
            vertex_stage(VertexShader::Wave),
            fragment_stage(FragmentShader::PerlinStatic),
            fragment_stage(FragmentShader::PulsingGlow),
        ] {
            assert!(
                UniformSet::scan([stage.source]).contains(Uniform::Time),
                "{}",
                stage.label
            );
        }
    }

    #[test]
    fn vertex_stages_declare_all_attributes() {
        for v in VertexShader::ALL {
            let src = vertex_stage(v).source;
            for (name, loc) in crate::uniforms::VERTEX_ATTRIBUTES {
                assert!(src.contains(&format!("@location({loc}) {name}:")));
            }
        }
    }
}
