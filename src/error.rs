use gfx_hal::{device, pso, window, UnsupportedBackend};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::renderer::ShaderStage;

// Every one of these ends the program.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to initialize graphics backend: {0:?}")]
    Backend(UnsupportedBackend),

    #[error("failed to create surface: {0:?}")]
    Surface(window::InitError),

    #[error("no adapter with a graphics queue that can present to the window")]
    NoAdapter,

    #[error("failed to open device: {0:?}")]
    Device(device::CreationError),

    #[error("render thread exited before finishing initialization")]
    RenderThread,
}

impl From<winit::error::OsError> for InitError {
    fn from(err: winit::error::OsError) -> Self {
        InitError::Window(err.to_string())
    }
}

impl InitError {
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Window(_) => 1,
            InitError::Backend(_) => 2,
            InitError::Surface(_) => 3,
            InitError::NoAdapter => 4,
            InitError::Device(_) => 5,
            InitError::RenderThread => 6,
        }
    }
}

// Logged only, rendering continues without a pipeline.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to open shader file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{stage} shader error:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("invalid SPIR-V for {stage} shader: {source}")]
    Spirv {
        stage: ShaderStage,
        #[source]
        source: io::Error,
    },

    #[error("failed to create {stage} shader module: {error:?}")]
    Module {
        stage: ShaderStage,
        error: device::ShaderError,
    },

    #[error("shader program not linked, {failed} stage(s) failed")]
    Unlinked { failed: usize },

    #[error("shader linking error: {0:?}")]
    Pipeline(pso::CreationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_init_error() -> Vec<InitError> {
        vec![
            InitError::Window("no display".to_owned()),
            InitError::Backend(UnsupportedBackend),
            InitError::Surface(window::InitError::UnsupportedWindowHandle),
            InitError::NoAdapter,
            InitError::Device(device::CreationError::InitializationFailed),
            InitError::RenderThread,
        ]
    }

    #[test]
    fn init_failures_exit_nonzero_and_distinct() {
        let errors = every_init_error();
        for err in &errors {
            // No wildcard: a new variant must be added to the list above.
            match err {
                InitError::Window(_)
                | InitError::Backend(_)
                | InitError::Surface(_)
                | InitError::NoAdapter
                | InitError::Device(_)
                | InitError::RenderThread => {}
            }
        }

        let codes: Vec<i32> = errors.iter().map(InitError::exit_code).collect();
        for (i, code) in codes.iter().enumerate() {
            assert_ne!(*code, 0, "{} exits with 0", errors[i]);
            assert!(!codes[i + 1..].contains(code), "{} shares exit code {}", errors[i], code);
        }
    }

    #[test]
    fn window_failure_keeps_os_message() {
        let err = InitError::Window("no display".to_owned());
        assert_eq!(err.to_string(), "failed to create window: no display");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn compile_error_names_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: syntax error".to_owned(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Fragment shader error:"));
        assert!(message.ends_with("syntax error"));
    }
}
