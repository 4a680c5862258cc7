pub mod config;
pub mod context;
pub mod error;
pub mod flag;
pub mod renderer;

pub use config::Config;
pub use context::GpuContext;
pub use error::{InitError, ShaderError};
pub use renderer::Renderer;
