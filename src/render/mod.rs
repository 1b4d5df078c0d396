mod native;
mod shader;

pub use native::Renderer;
pub use shader::{compile_program, ShaderError};
