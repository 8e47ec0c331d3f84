use std::io::Cursor;

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;

/// Info required to create a shader. Use [`ShaderCreateInfo::from_spirv`] to construct this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderCreateInfo {
    stage: vk::ShaderStageFlags,
    code: Vec<u32>,
}

impl ShaderCreateInfo {
    /// Load in a spirv binary into a shader create info structure.
    pub fn from_spirv(stage: vk::ShaderStageFlags, code: Vec<u32>) -> Self {
        Self {
            stage,
            code,
        }
    }

    /// Load a spirv binary given as raw bytes, for example the contents of a `.spv` file.
    /// # Errors
    /// - Fails if the byte length is not a multiple of four or the SPIR-V magic number is wrong.
    pub fn from_spirv_bytes(stage: vk::ShaderStageFlags, bytes: &[u8]) -> Result<Self> {
        let code = ash::util::read_spv(&mut Cursor::new(bytes))?;
        Ok(Self::from_spirv(stage, code))
    }

    pub fn stage(&self) -> vk::ShaderStageFlags {
        self.stage
    }

    pub fn code(&self) -> &[u32] {
        self.code.as_slice()
    }
}

/// Shader module that only lives while a pipeline is being created. The module is destroyed on drop.
pub(crate) struct ShaderModule<'d, D: DeviceInterface> {
    device: &'d D,
    handle: vk::ShaderModule,
    stage: vk::ShaderStageFlags,
}

impl<'d, D: DeviceInterface> ShaderModule<'d, D> {
    pub fn new(device: &'d D, info: &ShaderCreateInfo) -> Result<Self> {
        let create_info = vk::ShaderModuleCreateInfo::builder().code(info.code()).build();
        let handle = device.create_shader_module(&create_info)?;

        #[cfg(feature = "log-objects")]
        trace!("Created new VkShaderModule {handle:p}");

        Ok(Self {
            device,
            handle,
            stage: info.stage(),
        })
    }

    pub fn handle(&self) -> vk::ShaderModule {
        self.handle
    }

    pub fn stage(&self) -> vk::ShaderStageFlags {
        self.stage
    }
}

impl<D: DeviceInterface> Drop for ShaderModule<'_, D> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkShaderModule {:p}", self.handle);
        self.device.destroy_shader_module(self.handle);
    }
}
