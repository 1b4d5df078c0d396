use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to compile shader `{label}`: {message}")]
    Compile { label: String, message: String },
}

/// Compiles a WGSL program, failing instead of handing back a broken module.
pub fn compile_program(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

pub(crate) const SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = globals.view_proj * object.model * vec4<f32>(input.position, 1.0);
    out.normal = normalize((object.model * vec4<f32>(input.normal, 0.0)).xyz);
    out.color = input.color;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.4, 1.0, 0.3));
    let shade = 0.7 + 0.3 * max(dot(normalize(input.normal), light_dir), 0.0);
    return vec4<f32>(input.color * shade, 1.0);
}
"#;
