use std::ffi::CStr;
use std::ops::Deref;
use std::sync::Arc;

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;
use crate::Error;

#[derive(Derivative)]
#[derivative(Debug)]
struct DeviceInner {
    #[derivative(Debug = "ignore")]
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    #[derivative(Debug = "ignore")]
    handle: ash::Device,
    properties: vk::PhysicalDeviceProperties,
}

/// Wrapper around a `VkDevice` created by the application. Internal state is wrapped in an
/// `Arc<DeviceInner>`, so this is safe to clone.
///
/// The render graph compiler does not own the logical device. Dropping the last copy of a [`Device`]
/// does not call `vkDestroyDevice`, the application stays responsible for that once every
/// compiler using it has been dropped.
#[derive(Debug, Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

impl Device {
    /// Wrap an existing logical device. `physical_device` must be the device `device` was created from.
    pub fn new(instance: &ash::Instance, physical_device: vk::PhysicalDevice, device: &ash::Device) -> Self {
        // SAFETY: physical_device was enumerated from this instance by the caller.
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        // SAFETY: device_name is a null terminated string returned by the Vulkan API.
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };
        info!("Render graph device: {}", name.to_string_lossy());
        Device {
            inner: Arc::new(DeviceInner {
                instance: instance.clone(),
                physical_device,
                handle: device.clone(),
                properties,
            }),
        }
    }

    /// Get unsafe access to the underlying VkDevice handle
    /// # Safety
    /// * The caller should not destroy objects owned by a render graph compiler through this.
    pub unsafe fn handle(&self) -> ash::Device {
        self.inner.handle.clone()
    }

    /// Get the physical device this device was created from.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.inner.physical_device
    }

    /// Get the device properties
    pub fn properties(&self) -> &vk::PhysicalDeviceProperties {
        &self.inner.properties
    }
}

impl Deref for Device {
    type Target = ash::Device;

    fn deref(&self) -> &Self::Target {
        &self.inner.handle
    }
}

impl DeviceInterface for Device {
    fn format_properties(&self, format: vk::Format) -> vk::FormatProperties {
        // SAFETY: The physical device handle is valid as long as the instance is alive.
        unsafe {
            self.inner
                .instance
                .get_physical_device_format_properties(self.inner.physical_device, format)
        }
    }

    fn create_render_pass(&self, info: &vk::RenderPassCreateInfo) -> Result<vk::RenderPass> {
        // SAFETY: All pointers in info point into storage owned by the caller for the duration of this call.
        unsafe { Ok(self.inner.handle.create_render_pass(info, None)?) }
    }

    fn destroy_render_pass(&self, handle: vk::RenderPass) {
        unsafe { self.inner.handle.destroy_render_pass(handle, None) }
    }

    fn create_shader_module(&self, info: &vk::ShaderModuleCreateInfo) -> Result<vk::ShaderModule> {
        unsafe { Ok(self.inner.handle.create_shader_module(info, None)?) }
    }

    fn destroy_shader_module(&self, handle: vk::ShaderModule) {
        unsafe { self.inner.handle.destroy_shader_module(handle, None) }
    }

    fn create_pipeline_layout(&self, info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout> {
        unsafe { Ok(self.inner.handle.create_pipeline_layout(info, None)?) }
    }

    fn destroy_pipeline_layout(&self, handle: vk::PipelineLayout) {
        unsafe { self.inner.handle.destroy_pipeline_layout(handle, None) }
    }

    fn create_graphics_pipeline(&self, info: &vk::GraphicsPipelineCreateInfo) -> Result<vk::Pipeline> {
        let pipelines = unsafe {
            self.inner
                .handle
                .create_graphics_pipelines(vk::PipelineCache::null(), std::slice::from_ref(info), None)
                .map_err(Error::from)?
        };
        pipelines
            .first()
            .copied()
            .ok_or_else(|| anyhow::Error::from(Error::VkError(vk::Result::ERROR_UNKNOWN)))
    }

    fn destroy_pipeline(&self, handle: vk::Pipeline) {
        unsafe { self.inner.handle.destroy_pipeline(handle, None) }
    }
}
