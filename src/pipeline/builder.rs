//! The pipeline builder is used to easily create graphics pipeline configurations correctly.

use std::collections::HashMap;

use anyhow::Result;
use ash::vk;

use crate::pipeline::create_info::blend_attachment_none;
use crate::pipeline::pipeline_layout::PushConstantRange;
use crate::util::byte_size::ByteSize;
use crate::{Error, PipelineCreateInfo, ShaderCreateInfo};

/// Used to facilitate creating a graphics pipeline configuration. For an example, please check the
/// [`pipeline`](crate::pipeline) module level documentation.
///
/// For information on each method, please check the Vulkan spec for
/// [`VkGraphicsPipelineCreateInfo`](https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/VkGraphicsPipelineCreateInfo.html).
/// Viewport and scissor are always dynamic, and the sample count follows the render graph settings.
#[derive(Debug)]
pub struct PipelineBuilder {
    inner: PipelineCreateInfo,
    vertex_binding_offsets: HashMap<u32, u32>,
}

impl PipelineBuilder {
    /// Create a new empty pipeline with default settings for everything.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: PipelineCreateInfo {
                name: name.into(),
                layout: Default::default(),
                vertex_input_bindings: vec![],
                vertex_attributes: vec![],
                shaders: vec![],
                input_assembly: vk::PipelineInputAssemblyStateCreateInfo {
                    topology: vk::PrimitiveTopology::TRIANGLE_LIST,
                    primitive_restart_enable: vk::FALSE,
                    ..Default::default()
                },
                depth_stencil: vk::PipelineDepthStencilStateCreateInfo {
                    depth_test_enable: vk::FALSE,
                    depth_write_enable: vk::FALSE,
                    depth_compare_op: vk::CompareOp::LESS,
                    depth_bounds_test_enable: vk::FALSE,
                    stencil_test_enable: vk::FALSE,
                    min_depth_bounds: 0.0,
                    max_depth_bounds: 1.0,
                    ..Default::default()
                },
                rasterizer: vk::PipelineRasterizationStateCreateInfo {
                    depth_clamp_enable: vk::FALSE,
                    rasterizer_discard_enable: vk::FALSE,
                    polygon_mode: vk::PolygonMode::FILL,
                    cull_mode: vk::CullModeFlags::BACK,
                    front_face: vk::FrontFace::COUNTER_CLOCKWISE,
                    depth_bias_enable: vk::FALSE,
                    line_width: 1.0,
                    ..Default::default()
                },
                blend_attachments: vec![],
                dynamic_states: vec![],
            },
            vertex_binding_offsets: Default::default(),
        }
    }

    /// Add a vertex input binding. These are the binding indices for `vkCmdBindVertexBuffers`
    pub fn vertex_input(mut self, binding: u32, rate: vk::VertexInputRate) -> Self {
        self.vertex_binding_offsets.insert(binding, 0);
        self.inner.vertex_input_bindings.push(vk::VertexInputBindingDescription {
            binding,
            stride: 0,
            input_rate: rate,
        });
        self
    }

    /// Add a vertex attribute to the specified binding.
    /// Doing this will automatically calculate offsets and sizes, so make sure to add these in order of declaration in
    /// the shader.
    /// # Errors
    /// - Fails if the binding was not declared with [`PipelineBuilder::vertex_input`].
    /// - Fails if the size of `format` is unknown.
    pub fn vertex_attribute(mut self, binding: u32, location: u32, format: vk::Format) -> Result<Self> {
        let size = format.byte_size().ok_or(Error::UnsupportedVertexFormat(format))? as u32;
        let offset = self
            .vertex_binding_offsets
            .get_mut(&binding)
            .ok_or(Error::NoVertexBinding)?;
        self.inner.vertex_attributes.push(vk::VertexInputAttributeDescription {
            location,
            binding,
            format,
            offset: *offset,
        });
        *offset += size;
        for descr in &mut self.inner.vertex_input_bindings {
            if descr.binding == binding {
                descr.stride += size;
            }
        }

        Ok(self)
    }

    /// Add a shader to the pipeline. A pipeline has one shader per stage, so attaching a second shader for the same
    /// stage replaces the first one.
    pub fn attach_shader(mut self, info: ShaderCreateInfo) -> Self {
        match self.inner.shaders.iter_mut().find(|shader| shader.stage() == info.stage()) {
            Some(existing) => *existing = info,
            None => self.inner.shaders.push(info),
        }
        self
    }

    /// Set the primitive topology.
    pub fn topology(mut self, topology: vk::PrimitiveTopology) -> Self {
        self.inner.input_assembly.topology = topology;
        self
    }

    /// Set depth testing mode.
    pub fn depth_test(mut self, enable: bool) -> Self {
        self.inner.depth_stencil.depth_test_enable = vk::Bool32::from(enable);
        self
    }

    /// Set depth write mode.
    pub fn depth_write(mut self, enable: bool) -> Self {
        self.inner.depth_stencil.depth_write_enable = vk::Bool32::from(enable);
        self
    }

    /// Set the depth compare operation.
    pub fn depth_op(mut self, op: vk::CompareOp) -> Self {
        self.inner.depth_stencil.depth_compare_op = op;
        self
    }

    /// Enable the depth bounds test with the given bounds.
    pub fn depth_bounds(mut self, min: f32, max: f32) -> Self {
        self.inner.depth_stencil.depth_bounds_test_enable = vk::TRUE;
        self.inner.depth_stencil.min_depth_bounds = min;
        self.inner.depth_stencil.max_depth_bounds = max;
        self
    }

    /// Configure all depth state in one call.
    pub fn depth(self, test: bool, write: bool, op: vk::CompareOp) -> Self {
        self.depth_test(test).depth_write(write).depth_op(op)
    }

    /// Add a dynamic state to the pipeline. Viewport and scissor are always dynamic.
    pub fn dynamic_state(mut self, state: vk::DynamicState) -> Self {
        self.inner.dynamic_states.push(state);
        self
    }

    /// Set the polygon mode.
    pub fn polygon_mode(mut self, mode: vk::PolygonMode) -> Self {
        self.inner.rasterizer.polygon_mode = mode;
        self
    }

    /// Set the face culling mask.
    pub fn cull_mask(mut self, cull: vk::CullModeFlags) -> Self {
        self.inner.rasterizer.cull_mode = cull;
        self
    }

    /// Set the front face.
    pub fn front_face(mut self, face: vk::FrontFace) -> Self {
        self.inner.rasterizer.front_face = face;
        self
    }

    /// Add a blend attachment, but with no blending enabled. If no blend attachment is added at all, one of these
    /// is used for every color attachment of the subpass.
    pub fn blend_attachment_none(mut self) -> Self {
        self.inner.blend_attachments.push(blend_attachment_none());
        self
    }

    /// Add an additive blend attachment, writing to each color component.
    pub fn blend_additive_unmasked(
        mut self,
        src: vk::BlendFactor,
        dst: vk::BlendFactor,
        src_alpha: vk::BlendFactor,
        dst_alpha: vk::BlendFactor,
    ) -> Self {
        self.inner.blend_attachments.push(vk::PipelineColorBlendAttachmentState {
            blend_enable: vk::TRUE,
            src_color_blend_factor: src,
            dst_color_blend_factor: dst,
            color_blend_op: vk::BlendOp::ADD,
            src_alpha_blend_factor: src_alpha,
            dst_alpha_blend_factor: dst_alpha,
            alpha_blend_op: vk::BlendOp::ADD,
            color_write_mask: vk::ColorComponentFlags::RGBA,
        });
        self
    }

    /// Add a descriptor set layout. Sets are numbered in the order they are added.
    pub fn descriptor_set_layout(mut self, layout: vk::DescriptorSetLayout) -> Self {
        self.inner.layout.set_layouts.push(layout);
        self
    }

    /// Add a push constant range to the pipeline layout.
    pub fn push_constants(mut self, range: PushConstantRange) -> Self {
        self.inner.layout.push_constants.push(range);
        self
    }

    /// Build the pipeline create info structure.
    pub fn build(self) -> PipelineCreateInfo {
        self.inner
    }

    /// Obtain the pipeline name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }
}
