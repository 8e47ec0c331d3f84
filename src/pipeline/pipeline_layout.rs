//! Wrapper structs around `VkPipelineLayout` objects.

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;

/// A fully built Vulkan pipeline layout. Owned by the compiled [`Pipeline`](crate::Pipeline) that uses it.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct PipelineLayout<D: DeviceInterface> {
    #[derivative(Debug = "ignore")]
    device: D,
    handle: vk::PipelineLayout,
}

/// Defines a range of Vulkan push constants.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    /// Shader stages where this push constant range is used
    pub stage_flags: vk::ShaderStageFlags,
    /// Offset into the global push constant block of this range
    pub offset: u32,
    /// Size of this push constant range
    pub size: u32,
}

/// Define a pipeline layout. Descriptor set layouts are created and owned by the application, the layout only
/// references them.
#[derive(Debug, Clone, Default)]
pub struct PipelineLayoutCreateInfo {
    /// Pipeline layout flags
    pub flags: vk::PipelineLayoutCreateFlags,
    /// Descriptor set layouts for this pipeline layout, in set order.
    pub set_layouts: Vec<vk::DescriptorSetLayout>,
    /// Push constant ranges used in this pipeline
    pub push_constants: Vec<PushConstantRange>,
}

impl<D: DeviceInterface> PipelineLayout<D> {
    pub(crate) fn new(device: D, info: &PipelineLayoutCreateInfo) -> Result<Self> {
        let pc = info.push_constants.iter().map(|pc| pc.to_vk()).collect::<Vec<_>>();
        let create_info = vk::PipelineLayoutCreateInfo::builder()
            .flags(info.flags)
            .push_constant_ranges(pc.as_slice())
            .set_layouts(info.set_layouts.as_slice())
            .build();

        let handle = device.create_pipeline_layout(&create_info)?;

        #[cfg(feature = "log-objects")]
        trace!("Created new VkPipelineLayout {handle:p}");

        Ok(Self {
            device,
            handle,
        })
    }

    /// Get unsafe access to the internal `VkPipelineLayout`.
    /// # Safety
    /// Any vulkan calls that mutate this pipeline layout may put the system in an undefined state.
    pub unsafe fn handle(&self) -> vk::PipelineLayout {
        self.handle
    }
}

impl<D: DeviceInterface> Drop for PipelineLayout<D> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkPipelineLayout {:p}", self.handle);
        self.device.destroy_pipeline_layout(self.handle);
    }
}

impl PushConstantRange {
    pub fn to_vk(&self) -> vk::PushConstantRange {
        vk::PushConstantRange {
            stage_flags: self.stage_flags,
            offset: self.offset,
            size: self.size,
        }
    }
}
