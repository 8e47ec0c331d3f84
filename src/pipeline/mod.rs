//! The pipeline module exposes the [`PipelineBuilder`](crate::PipelineBuilder), used to describe graphics pipelines,
//! and the compiled [`Pipeline`] objects the render graph creates from those descriptions.
//!
//! Pipelines are declared on the [`RenderGraphCompiler`](crate::RenderGraphCompiler) before it is built. The compiler
//! creates each pipeline for the subpass that uses it, so the subpass index never has to be given by hand.
//!
//! # Example
//! ```ignore
//! use subpass_graph::prelude::*;
//!
//! // Note that `load_spirv_binary()` does not ship with this crate.
//! let vertex = ShaderCreateInfo::from_spirv(vk::ShaderStageFlags::VERTEX, load_spirv_binary("shader.vert.spv"));
//! let fragment = ShaderCreateInfo::from_spirv(vk::ShaderStageFlags::FRAGMENT, load_spirv_binary("shader.frag.spv"));
//!
//! let pci = PipelineBuilder::new("sample")
//!     // One vertex binding at binding 0. We have to specify this before adding attributes
//!     .vertex_input(0, vk::VertexInputRate::VERTEX)
//!     // Equivalent of `layout (location = 0) in vec3 position;`
//!     .vertex_attribute(0, 0, vk::Format::R32G32B32_SFLOAT)?
//!     // Equivalent of `layout (location = 1) in vec2 uv;`
//!     .vertex_attribute(0, 1, vk::Format::R32G32_SFLOAT)?
//!     .depth(true, true, vk::CompareOp::LESS)
//!     .descriptor_set_layout(set_layout)
//!     .attach_shader(vertex)
//!     .attach_shader(fragment)
//!     .build();
//!
//! let pipeline = compiler.add_graphics_pipeline(pci);
//! ```

use std::ffi::CString;

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;
use crate::graph::pass::SubpassId;
use crate::pipeline::pipeline_layout::PipelineLayout;
use crate::pipeline::shader::ShaderModule;
use crate::PipelineCreateInfo;

pub mod builder;
pub mod create_info;
pub mod pipeline_layout;
pub mod shader;

/// Opaque handle to a pipeline declared on a [`RenderGraphCompiler`](crate::RenderGraphCompiler).
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct PipelineId {
    index: usize,
}

impl PipelineId {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
        }
    }

    /// Index of this pipeline in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A fully built Vulkan pipeline together with its layout. This is a managed resource owned by the render graph,
/// so it cannot be manually cloned or dropped.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Pipeline<D: DeviceInterface> {
    #[derivative(Debug = "ignore")]
    device: D,
    handle: vk::Pipeline,
    layout: PipelineLayout<D>,
    subpass: SubpassId,
}

impl<D: DeviceInterface + Clone> Pipeline<D> {
    /// Create the pipeline described by `info` for subpass `subpass` of `render_pass`.
    /// Shader modules only live for the duration of this call.
    pub(crate) fn create(
        device: &D,
        info: &PipelineCreateInfo,
        render_pass: vk::RenderPass,
        subpass: SubpassId,
        samples: vk::SampleCountFlags,
        color_attachments: usize,
    ) -> Result<Self> {
        let layout = PipelineLayout::new(device.clone(), &info.layout)?;
        let state = info.build_inner(samples, color_attachments);
        if state.blend_attachment_count() != color_attachments {
            warn!(
                "Pipeline {} has {} blend attachments, but subpass {} has {} color attachments",
                info.name,
                state.blend_attachment_count(),
                subpass.index(),
                color_attachments
            );
        }

        let modules = info
            .shaders
            .iter()
            .map(|shader| ShaderModule::new(device, shader))
            .collect::<Result<Vec<_>>>()?;

        let entry = CString::new("main")?;
        let stages = modules
            .iter()
            .map(|module| {
                vk::PipelineShaderStageCreateInfo::builder()
                    .name(&entry)
                    .stage(module.stage())
                    .module(module.handle())
                    .build()
            })
            .collect::<Vec<_>>();

        // SAFETY: The layout handle stays valid until `layout` is dropped, which only happens together with self.
        let pci = state.to_vk(&stages, unsafe { layout.handle() }, render_pass, subpass.index());
        let handle = device.create_graphics_pipeline(&pci)?;

        #[cfg(feature = "log-objects")]
        trace!("Created new VkPipeline {handle:p}");

        // Shader modules are destroyed here, they are not needed once the pipeline exists.
        drop(modules);

        Ok(Self {
            device: device.clone(),
            handle,
            layout,
            subpass,
        })
    }
}

impl<D: DeviceInterface> Pipeline<D> {
    /// Get unsafe access to the underlying `VkPipeline` handle.
    /// # Safety
    /// The handle must not be destroyed, and must not be used after the render graph is dropped.
    pub unsafe fn handle(&self) -> vk::Pipeline {
        self.handle
    }

    /// Get unsafe access to the underlying `VkPipelineLayout` handle, needed to bind descriptor sets and push constants.
    /// # Safety
    /// The handle must not be destroyed, and must not be used after the render graph is dropped.
    pub unsafe fn layout(&self) -> vk::PipelineLayout {
        self.layout.handle()
    }

    /// The subpass this pipeline was created for.
    pub fn subpass(&self) -> SubpassId {
        self.subpass
    }
}

impl<D: DeviceInterface> Drop for Pipeline<D> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkPipeline {:p}", self.handle);
        // The layout field is dropped after this, so the pipeline goes first.
        self.device.destroy_pipeline(self.handle);
    }
}
