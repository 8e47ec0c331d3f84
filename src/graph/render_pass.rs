//! Owned `VkRenderPass` wrapper.

use anyhow::Result;
use ash::vk;

use crate::core::traits::DeviceInterface;

/// A compiled render pass. Destroyed when dropped, so it must outlive every pipeline created against it.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct RenderPass<D: DeviceInterface> {
    #[derivative(Debug = "ignore")]
    device: D,
    handle: vk::RenderPass,
}

impl<D: DeviceInterface> RenderPass<D> {
    pub(crate) fn new(
        device: D,
        attachments: &[vk::AttachmentDescription],
        subpasses: &[vk::SubpassDescription],
        dependencies: &[vk::SubpassDependency],
    ) -> Result<Self> {
        let info = vk::RenderPassCreateInfo::builder()
            .attachments(attachments)
            .subpasses(subpasses)
            .dependencies(dependencies)
            .build();
        let handle = device.create_render_pass(&info)?;

        #[cfg(feature = "log-objects")]
        trace!("Created new VkRenderPass {handle:p}");

        Ok(Self {
            device,
            handle,
        })
    }

    /// Get unsafe access to the underlying `VkRenderPass` handle.
    /// # Safety
    /// The handle must not be destroyed, and must not be used after this object is dropped.
    pub unsafe fn handle(&self) -> vk::RenderPass {
        self.handle
    }
}

impl<D: DeviceInterface> Drop for RenderPass<D> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkRenderPass {:p}", self.handle);
        self.device.destroy_render_pass(self.handle);
    }
}
