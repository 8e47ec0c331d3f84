//! Wrapper structs for pipeline create info objects.

use ash::vk;

use crate::pipeline::pipeline_layout::PipelineLayoutCreateInfo;
use crate::ShaderCreateInfo;

/// Defines a full graphics pipeline. Use the [`PipelineBuilder`](crate::PipelineBuilder) to construct this properly.
///
/// State that depends on the render pass (sample count, subpass index, number of color attachments) is
/// filled in when the render graph is built.
#[derive(Debug, Clone)]
pub struct PipelineCreateInfo {
    /// The shaders used in this pipeline
    pub shaders: Vec<ShaderCreateInfo>,
    pub(crate) name: String,
    pub(crate) layout: PipelineLayoutCreateInfo,
    pub(crate) vertex_input_bindings: Vec<vk::VertexInputBindingDescription>,
    pub(crate) vertex_attributes: Vec<vk::VertexInputAttributeDescription>,
    pub(crate) input_assembly: vk::PipelineInputAssemblyStateCreateInfo,
    pub(crate) depth_stencil: vk::PipelineDepthStencilStateCreateInfo,
    pub(crate) rasterizer: vk::PipelineRasterizationStateCreateInfo,
    pub(crate) blend_attachments: Vec<vk::PipelineColorBlendAttachmentState>,
    pub(crate) dynamic_states: Vec<vk::DynamicState>,
}

/// Every state block of a graphics pipeline, ready to be pointed to by a `VkGraphicsPipelineCreateInfo`.
/// The nested create infos point into the vectors of this struct, so it must not be modified after
/// [`PipelineCreateInfo::build_inner`].
// Some vectors are never read again, they only keep the pointed-to storage alive.
#[allow(dead_code)]
pub(crate) struct PipelineState {
    vk_vertex_inputs: Vec<vk::VertexInputBindingDescription>,
    vk_attributes: Vec<vk::VertexInputAttributeDescription>,
    vk_viewports: Vec<vk::Viewport>,
    vk_scissors: Vec<vk::Rect2D>,
    vk_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState>,
    vk_dynamic_states: Vec<vk::DynamicState>,
    vertex_input_state: vk::PipelineVertexInputStateCreateInfo,
    input_assembly: vk::PipelineInputAssemblyStateCreateInfo,
    viewport_state: vk::PipelineViewportStateCreateInfo,
    rasterizer: vk::PipelineRasterizationStateCreateInfo,
    multisample: vk::PipelineMultisampleStateCreateInfo,
    depth_stencil: vk::PipelineDepthStencilStateCreateInfo,
    blend_state: vk::PipelineColorBlendStateCreateInfo,
    dynamic_state: vk::PipelineDynamicStateCreateInfo,
}

/// Blend state that writes every color component without blending.
pub(crate) fn blend_attachment_none() -> vk::PipelineColorBlendAttachmentState {
    vk::PipelineColorBlendAttachmentState {
        blend_enable: vk::FALSE,
        src_color_blend_factor: vk::BlendFactor::ONE,
        dst_color_blend_factor: vk::BlendFactor::ZERO,
        color_blend_op: vk::BlendOp::ADD,
        src_alpha_blend_factor: vk::BlendFactor::ONE,
        dst_alpha_blend_factor: vk::BlendFactor::ZERO,
        alpha_blend_op: vk::BlendOp::ADD,
        color_write_mask: vk::ColorComponentFlags::RGBA,
    }
}

impl PipelineCreateInfo {
    /// Name of the pipeline, used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout this pipeline will be created with.
    pub fn layout(&self) -> &PipelineLayoutCreateInfo {
        &self.layout
    }

    /// Vertex buffer bindings, with strides computed from the attributes.
    pub fn vertex_input_bindings(&self) -> &[vk::VertexInputBindingDescription] {
        &self.vertex_input_bindings
    }

    /// Vertex attributes, with offsets computed in declaration order.
    pub fn vertex_attributes(&self) -> &[vk::VertexInputAttributeDescription] {
        &self.vertex_attributes
    }

    /// Build the state blocks for a subpass with `color_attachments` color references, rendering with `samples`.
    /// Viewport and scissor are always dynamic. If no blend attachment was declared, every color attachment
    /// gets one without blending.
    pub(crate) fn build_inner(&self, samples: vk::SampleCountFlags, color_attachments: usize) -> PipelineState {
        let vk_vertex_inputs = self.vertex_input_bindings.clone();
        let vk_attributes = self.vertex_attributes.clone();
        // Counts are given even though the state is dynamic.
        let vk_viewports = vec![vk::Viewport::default()];
        let vk_scissors = vec![vk::Rect2D::default()];
        let vk_blend_attachments = if self.blend_attachments.is_empty() {
            vec![blend_attachment_none(); color_attachments]
        } else {
            self.blend_attachments.clone()
        };
        let mut vk_dynamic_states = vec![vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        for state in &self.dynamic_states {
            if !vk_dynamic_states.contains(state) {
                vk_dynamic_states.push(*state);
            }
        }

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(vk_vertex_inputs.as_slice())
            .vertex_attribute_descriptions(vk_attributes.as_slice())
            .build();
        let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
            .viewports(vk_viewports.as_slice())
            .scissors(vk_scissors.as_slice())
            .build();
        let multisample = vk::PipelineMultisampleStateCreateInfo::builder()
            .rasterization_samples(samples)
            .sample_shading_enable(false)
            .build();
        let blend_state = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .attachments(vk_blend_attachments.as_slice())
            .build();
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::builder()
            .dynamic_states(vk_dynamic_states.as_slice())
            .build();

        // Moving the vectors into the struct does not move their heap storage, so the pointers above stay valid.
        PipelineState {
            vk_vertex_inputs,
            vk_attributes,
            vk_viewports,
            vk_scissors,
            vk_blend_attachments,
            vk_dynamic_states,
            vertex_input_state,
            input_assembly: self.input_assembly,
            viewport_state,
            rasterizer: self.rasterizer,
            multisample,
            depth_stencil: self.depth_stencil,
            blend_state,
            dynamic_state,
        }
    }
}

impl PipelineState {
    /// Number of blend attachments, which must match the color attachment count of the subpass.
    pub fn blend_attachment_count(&self) -> usize {
        self.vk_blend_attachments.len()
    }

    pub fn to_vk(
        &self,
        stages: &[vk::PipelineShaderStageCreateInfo],
        layout: vk::PipelineLayout,
        render_pass: vk::RenderPass,
        subpass: u32,
    ) -> vk::GraphicsPipelineCreateInfo {
        vk::GraphicsPipelineCreateInfo {
            s_type: vk::StructureType::GRAPHICS_PIPELINE_CREATE_INFO,
            p_next: std::ptr::null(),
            flags: Default::default(),
            stage_count: stages.len() as u32,
            p_stages: stages.as_ptr(),
            p_vertex_input_state: &self.vertex_input_state,
            p_input_assembly_state: &self.input_assembly,
            p_tessellation_state: std::ptr::null(),
            p_viewport_state: &self.viewport_state,
            p_rasterization_state: &self.rasterizer,
            p_multisample_state: &self.multisample,
            p_depth_stencil_state: &self.depth_stencil,
            p_color_blend_state: &self.blend_state,
            p_dynamic_state: &self.dynamic_state,
            layout,
            render_pass,
            subpass,
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
        }
    }
}
