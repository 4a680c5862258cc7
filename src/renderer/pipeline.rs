use gfx_hal::{pass::Subpass, prelude::*, pso, Backend};
use log::{error, info};
use std::iter;
use std::mem::ManuallyDrop;
use std::ops::Range;
use std::ptr;

use super::shader::{self, ShaderStage};
use super::vertex::Vertex;
use crate::error::ShaderError;

const ENTRY_NAME: &str = "main";

pub struct Pipeline<'a, B: Backend> {
    device: &'a B::Device,
    pub pipeline: ManuallyDrop<B::GraphicsPipeline>,
    pub pipeline_layout: ManuallyDrop<B::PipelineLayout>,
}

impl<'a, B: Backend> Pipeline<'a, B> {
    pub fn new(
        device: &'a B::Device,
        vs_path: &str,
        fs_path: &str,
        render_pass: &B::RenderPass,
    ) -> Result<Self, ShaderError> {
        let (vs_spirv, fs_spirv) = shader::compile_stages(vs_path, fs_path).map_err(|errors| {
            for err in &errors {
                error!("{}", err);
            }
            ShaderError::Unlinked {
                failed: errors.len(),
            }
        })?;

        let (vs_module, fs_module) = match (
            shader::create_module::<B>(device, &vs_spirv, ShaderStage::Vertex),
            shader::create_module::<B>(device, &fs_spirv, ShaderStage::Fragment),
        ) {
            (Ok(vs), Ok(fs)) => (vs, fs),
            (vs, fs) => {
                let mut failed = 0;
                for module in vec![vs, fs] {
                    match module {
                        Ok(module) => unsafe { device.destroy_shader_module(module) },
                        Err(err) => {
                            error!("{}", err);
                            failed += 1;
                        }
                    }
                }
                return Err(ShaderError::Unlinked { failed });
            }
        };

        let pipeline_layout = unsafe {
            device.create_pipeline_layout(
                iter::empty::<B::DescriptorSetLayout>(),
                iter::empty::<(pso::ShaderStageFlags, Range<u32>)>(),
            )
        }
        .expect("Can't create pipeline layout");

        let linked = Self::link(device, &vs_module, &fs_module, render_pass, &pipeline_layout);

        // Shader modules are not needed once the pipeline exists.
        unsafe {
            device.destroy_shader_module(vs_module);
            device.destroy_shader_module(fs_module);
        }

        match linked {
            Ok(pipeline) => {
                info!("linked shader program: {} + {}", vs_path, fs_path);
                Ok(Pipeline {
                    device,
                    pipeline: ManuallyDrop::new(pipeline),
                    pipeline_layout: ManuallyDrop::new(pipeline_layout),
                })
            }
            Err(err) => {
                unsafe { device.destroy_pipeline_layout(pipeline_layout) };
                Err(ShaderError::Pipeline(err))
            }
        }
    }

    fn link(
        device: &B::Device,
        vs_module: &B::ShaderModule,
        fs_module: &B::ShaderModule,
        render_pass: &B::RenderPass,
        pipeline_layout: &B::PipelineLayout,
    ) -> Result<B::GraphicsPipeline, pso::CreationError> {
        let shader_entries = pso::GraphicsShaderSet {
            vertex: pso::EntryPoint {
                entry: ENTRY_NAME,
                module: vs_module,
                specialization: pso::Specialization::default(),
            },
            hull: None,
            domain: None,
            geometry: None,
            fragment: Some(pso::EntryPoint {
                entry: ENTRY_NAME,
                module: fs_module,
                specialization: pso::Specialization::default(),
            }),
        };

        let subpass = Subpass {
            index: 0,
            main_pass: render_pass,
        };

        let mut pipeline_desc = pso::GraphicsPipelineDesc::new(
            shader_entries,
            pso::Primitive::TriangleList,
            pso::Rasterizer::FILL,
            pipeline_layout,
            subpass,
        );
        pipeline_desc.blender.targets.push(pso::ColorBlendDesc {
            mask: pso::ColorMask::ALL,
            blend: Some(pso::BlendState::ALPHA),
        });
        pipeline_desc.vertex_buffers.push(pso::VertexBufferDesc {
            binding: 0,
            stride: Vertex::STRIDE,
            rate: pso::VertexInputRate::Vertex,
        });
        pipeline_desc.attributes.extend_from_slice(&Vertex::attributes(0));

        unsafe { device.create_graphics_pipeline(&pipeline_desc, None) }
    }
}

impl<'a, B: Backend> Drop for Pipeline<'a, B> {
    fn drop(&mut self) {
        unsafe {
            self.device
                .destroy_graphics_pipeline(ManuallyDrop::into_inner(ptr::read(&self.pipeline)));
            self.device
                .destroy_pipeline_layout(ManuallyDrop::into_inner(ptr::read(
                    &self.pipeline_layout,
                )));
        }
    }
}
