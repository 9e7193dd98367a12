/// WGSL shader for Blinn-Phong meshes lit by a single point light.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) diffuse: vec4<f32>,
    @location(8) ambient: vec4<f32>,
    @location(9) specular: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) diffuse: vec4<f32>,
    @location(4) ambient: vec4<f32>,
    @location(5) specular: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = vertex.color;
    out.diffuse = instance.diffuse;
    out.ambient = instance.ambient;
    out.specular = instance.specular;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let base = in.color.rgb;
    var rgb = in.ambient.rgb * base;

    // w = 0 means the scene has no light.
    if (uniforms.light_position.w > 0.0) {
        let l = normalize(uniforms.light_position.xyz - in.world_position);
        let v = normalize(uniforms.camera_position.xyz - in.world_position);
        let h = normalize(l + v);
        let lambert = max(dot(n, l), 0.0);
        rgb += in.diffuse.rgb * uniforms.light_diffuse.rgb * base * lambert;
        if (lambert > 0.0) {
            let spec = pow(max(dot(n, h), 0.0), max(in.specular.w, 1.0));
            rgb += in.specular.rgb * uniforms.light_specular.rgb * spec;
        }
    }
    return vec4<f32>(rgb, in.color.a * in.diffuse.a);
}
"#;
