//! Render pass compiler for Vulkan
//!
//! This crate turns a declarative description of subpasses, and the attachments they read and write, into a
//! `VkRenderPass` with correct subpass dependencies, plus the graphics pipelines used in each subpass.
//! Synchronization scopes are derived from the role of every attachment, so no stage or access mask is ever
//! written by hand.
//!
//! To get started, the easiest way is to simply
//! ```
//! // Import types under a namespace.
//! use subpass_graph::prelude as sg;
//!
//! // Or, if you dont care about using the types under a namespace
//! use subpass_graph::prelude::*;
//! ```
//!
//! # Example
//!
//! Instance, physical device and logical device creation is left to the caller. Once those exist, wrap them in a
//! [`Device`](crate::Device) and describe the render target.
//! ```ignore
//! use subpass_graph::prelude::*;
//!
//! let device = Device::new(&instance, physical_device, &logical_device);
//! let settings = RenderGraphBuilder::new()
//!     .extent(1920, 1080)
//!     .color_format(vk::Format::B8G8R8A8_SRGB)
//!     .build();
//! let mut compiler = RenderGraphCompiler::new(device, settings);
//! ```
//! Now declare resources, pipelines and subpasses, and build the graph.
//! ```ignore
//! let color = compiler.add_color_resource(vk::AttachmentLoadOp::CLEAR, vk::AttachmentStoreOp::STORE);
//! compiler.set_final_layout(color, vk::ImageLayout::PRESENT_SRC_KHR)?;
//! let pipeline = compiler.add_graphics_pipeline(pci);
//! compiler.add_graphics_subpass(&[], &[color], pipeline, None)?;
//! compiler.build()?;
//! ```
//! For further example code, check out the following modules
//! - [`graph`] for declaring subpasses and building the render pass.
//! - [`pipeline`] for pipeline creation.
//! - [`core`] for the device wrapper and render target settings.
//! - [`util`] for various utilities.

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;

pub mod prelude;
pub use crate::prelude::*;

pub mod core;
pub mod graph;
pub mod pipeline;
pub mod util;
