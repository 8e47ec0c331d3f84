//! Exposes the settings that describe the render target of a render graph.

use ash::vk;

/// Target description used when emitting attachments and pipeline state.
///
/// The extent and color format usually come from the swapchain. When the swapchain is recreated, build a new
/// render graph with updated settings.
#[derive(Debug, Copy, Clone)]
pub struct RenderGraphSettings {
    /// Size of the render target.
    pub extent: vk::Extent2D,
    /// Format of color and resolve attachments.
    pub color_format: vk::Format,
    /// Sample count used for color and depth attachments, and for rasterization. Resolve attachments are always
    /// single sampled.
    pub samples: vk::SampleCountFlags,
    /// Tiling mode the depth attachment format must support.
    pub depth_tiling: vk::ImageTiling,
}

impl Default for RenderGraphSettings {
    fn default() -> Self {
        Self {
            extent: vk::Extent2D {
                width: 800,
                height: 600,
            },
            color_format: vk::Format::B8G8R8A8_SRGB,
            samples: vk::SampleCountFlags::TYPE_1,
            depth_tiling: vk::ImageTiling::OPTIMAL,
        }
    }
}

/// Convenience builder for [`RenderGraphSettings`].
/// # Example
/// ```
/// # use subpass_graph::prelude::*;
/// let settings = RenderGraphBuilder::new()
///     .extent(1280, 720)
///     .color_format(vk::Format::B8G8R8A8_UNORM)
///     .samples(vk::SampleCountFlags::TYPE_4)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RenderGraphBuilder {
    inner: RenderGraphSettings,
}

impl RenderGraphBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the render target size.
    pub fn extent(mut self, width: u32, height: u32) -> Self {
        self.inner.extent = vk::Extent2D {
            width,
            height,
        };
        self
    }

    /// Sets the color attachment format.
    pub fn color_format(mut self, format: vk::Format) -> Self {
        self.inner.color_format = format;
        self
    }

    /// Sets the multisample count.
    pub fn samples(mut self, samples: vk::SampleCountFlags) -> Self {
        self.inner.samples = samples;
        self
    }

    /// Sets the tiling mode depth formats are probed against.
    pub fn depth_tiling(mut self, tiling: vk::ImageTiling) -> Self {
        self.inner.depth_tiling = tiling;
        self
    }

    /// Build the resulting settings.
    pub fn build(self) -> RenderGraphSettings {
        self.inner
    }
}
