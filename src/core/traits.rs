//! Defines traits for core

use anyhow::Result;
use ash::vk;

/// Everything the render graph compiler needs from the driver. [`Device`](crate::Device) implements this
/// on top of a real Vulkan device. Any other implementation must hand out handles that stay valid until the
/// matching `destroy_*` call.
pub trait DeviceInterface {
    /// Query the format features supported for `format`.
    fn format_properties(&self, format: vk::Format) -> vk::FormatProperties;

    /// Create a `VkRenderPass`.
    fn create_render_pass(&self, info: &vk::RenderPassCreateInfo) -> Result<vk::RenderPass>;
    /// Destroy a `VkRenderPass` created through [`DeviceInterface::create_render_pass`].
    fn destroy_render_pass(&self, handle: vk::RenderPass);

    /// Create a `VkShaderModule` from SPIR-V code.
    fn create_shader_module(&self, info: &vk::ShaderModuleCreateInfo) -> Result<vk::ShaderModule>;
    /// Destroy a `VkShaderModule`.
    fn destroy_shader_module(&self, handle: vk::ShaderModule);

    /// Create a `VkPipelineLayout`.
    fn create_pipeline_layout(&self, info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout>;
    /// Destroy a `VkPipelineLayout`.
    fn destroy_pipeline_layout(&self, handle: vk::PipelineLayout);

    /// Create a single graphics pipeline.
    fn create_graphics_pipeline(&self, info: &vk::GraphicsPipelineCreateInfo) -> Result<vk::Pipeline>;
    /// Destroy a `VkPipeline`.
    fn destroy_pipeline(&self, handle: vk::Pipeline);
}
