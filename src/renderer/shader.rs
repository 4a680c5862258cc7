use gfx_hal::{prelude::*, pso, Backend};
use log::debug;
use std::fmt;
use std::fs::read_to_string;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::ShaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn glsl_type(self) -> glsl_to_spirv::ShaderType {
        match self {
            ShaderStage::Vertex => glsl_to_spirv::ShaderType::Vertex,
            ShaderStage::Fragment => glsl_to_spirv::ShaderType::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex"),
            ShaderStage::Fragment => f.write_str("Fragment"),
        }
    }
}

pub fn read_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_owned(),
        source,
    })
}

pub fn compile(source: &str, stage: ShaderStage) -> Result<Vec<u32>, ShaderError> {
    let mut file = glsl_to_spirv::compile(source, stage.glsl_type())
        .map_err(|log| ShaderError::Compile { stage, log })?;

    let mut buf = vec![];
    file.read_to_end(&mut buf)
        .map_err(|source| ShaderError::Spirv { stage, source })?;
    pso::read_spirv(Cursor::new(&buf[..])).map_err(|source| ShaderError::Spirv { stage, source })
}

fn compile_file(path: &str, stage: ShaderStage) -> Result<Vec<u32>, ShaderError> {
    let spirv = compile(&read_source(path)?, stage)?;
    debug!("compiled {} shader {} ({} words)", stage, path, spirv.len());
    Ok(spirv)
}

// Both stages are always attempted so one failure cannot hide the other's log.
pub fn compile_stages(
    vs_path: &str,
    fs_path: &str,
) -> Result<(Vec<u32>, Vec<u32>), Vec<ShaderError>> {
    let vs = compile_file(vs_path, ShaderStage::Vertex);
    let fs = compile_file(fs_path, ShaderStage::Fragment);
    match (vs, fs) {
        (Ok(vs), Ok(fs)) => Ok((vs, fs)),
        (vs, fs) => Err(vs.err().into_iter().chain(fs.err()).collect()),
    }
}

pub fn create_module<B: Backend>(
    device: &B::Device,
    spirv: &[u32],
    stage: ShaderStage,
) -> Result<B::ShaderModule, ShaderError> {
    unsafe { device.create_shader_module(spirv) }
        .map_err(|error| ShaderError::Module { stage, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader_path(name: &str) -> String {
        format!("{}/shaders/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn bundled_shaders_compile() {
        for (name, stage) in &[
            ("vertexShader.glsl", ShaderStage::Vertex),
            ("fragmentShader.glsl", ShaderStage::Fragment),
        ] {
            let source = read_source(shader_path(name)).unwrap();
            let spirv = compile(&source, *stage).unwrap();
            // SPIR-V magic number
            assert_eq!(spirv[0], 0x0723_0203);
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_source("shaders/doesNotExist.glsl").unwrap_err();
        match err {
            ShaderError::Io { path, .. } => {
                assert_eq!(path, Path::new("shaders/doesNotExist.glsl"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn broken_source_is_a_compile_error() {
        let err = compile("#version 450\nvoid main() { undeclared = 1; }\n", ShaderStage::Fragment)
            .unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    fn scratch_shader(name: &str, source: &str) -> String {
        let path = std::env::temp_dir().join(format!("austrian-flag-{}-{}", std::process::id(), name));
        std::fs::write(&path, source).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn both_broken_stages_are_reported() {
        let vs = scratch_shader("broken.vert", "#version 450\nvoid main() { nope = 1; }\n");
        let fs = scratch_shader("broken.frag", "#version 450\nvoid main() { nope = 2; }\n");

        let errors = compile_stages(&vs, &fs).unwrap_err();
        let stages: Vec<ShaderStage> = errors
            .iter()
            .map(|err| match err {
                ShaderError::Compile { stage, .. } => *stage,
                other => panic!("unexpected error: {}", other),
            })
            .collect();
        assert_eq!(stages, vec![ShaderStage::Vertex, ShaderStage::Fragment]);
    }

    #[test]
    fn missing_vertex_file_still_compiles_fragment() {
        let fs = scratch_shader("broken-only.frag", "#version 450\nvoid main() { nope = 2; }\n");

        let errors = compile_stages("shaders/doesNotExist.glsl", &fs).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ShaderError::Io { .. }));
        assert!(matches!(
            errors[1],
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn single_broken_stage_yields_one_error() {
        let fs = scratch_shader("broken-single.frag", "#version 450\nvoid main() { nope = 2; }\n");

        let errors = compile_stages(&shader_path("vertexShader.glsl"), &fs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Fragment shader error:"));
    }

    #[test]
    fn bundled_stages_compile_together() {
        let (vs, fs) = compile_stages(
            &shader_path("vertexShader.glsl"),
            &shader_path("fragmentShader.glsl"),
        )
        .unwrap();
        assert!(!vs.is_empty() && !fs.is_empty());
    }

    #[test]
    fn empty_source_does_not_compile() {
        assert!(compile("", ShaderStage::Vertex).is_err());
    }
}
