//! Static WGSL for instanced quad rendering.
//!
//! One shader serves all three populations. Foliage instances set the
//! billboard flag and render as screen-facing circular sprites (the quad is
//! offset in clip space, so sprite size is screen-constant); ornaments and
//! cards render as world-oriented quads rotated by their per-instance
//! quaternion.

pub const SHADER_SRC: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    time: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) billboard: f32,
};

fn rotate_by_quat(v: vec3<f32>, q: vec4<f32>) -> vec3<f32> {
    let u = q.xyz;
    return v + 2.0 * cross(u, cross(u, v) + q.w * v);
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) scale: f32,
    @location(2) color: vec3<f32>,
    @location(3) billboard: f32,
    @location(4) rotation: vec4<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = quad_vertices[vertex_index];

    var out: VertexOutput;
    if billboard > 0.5 {
        var clip_pos = uniforms.view_proj * vec4<f32>(position, 1.0);
        clip_pos.x += corner.x * scale * clip_pos.w;
        clip_pos.y += corner.y * scale * clip_pos.w;
        out.clip_position = clip_pos;
    } else {
        let local = vec3<f32>(corner.x, corner.y * 1.2, 0.0) * scale * 0.5;
        let world = position + rotate_by_quat(local, rotation);
        out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    }

    out.color = color;
    out.uv = corner;
    out.billboard = billboard;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if in.billboard > 0.5 {
        let dist = length(in.uv);
        if dist > 1.0 {
            discard;
        }
        let alpha = 1.0 - smoothstep(0.4, 1.0, dist);
        return vec4<f32>(in.color * alpha, alpha);
    }
    return vec4<f32>(in.color, 1.0);
}
"#;
