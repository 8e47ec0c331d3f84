//! Subpasses of the render pass. Each subpass declares the resources it reads and writes, the pipeline it
//! draws with, and the subpass it must run after.
//!
//! # Example
//!
//! Two subpasses that render into the same color target. The second subpass loads what the first one wrote,
//! so it lists the color resource both as input and output.
//! ```ignore
//! use subpass_graph::prelude::*;
//!
//! let color = compiler.add_color_resource(vk::AttachmentLoadOp::CLEAR, vk::AttachmentStoreOp::STORE);
//! let opaque = compiler.add_graphics_pipeline(opaque_pci);
//! let overlay = compiler.add_graphics_pipeline(overlay_pci);
//!
//! let first = compiler.add_graphics_subpass(&[], &[color], opaque, None)?;
//! let _second = compiler.add_graphics_subpass(&[color], &[color], overlay, Some(first))?;
//! ```

use anyhow::Result;
use ash::vk;

use crate::graph::resource::{ResourceId, ResourceType};
use crate::pipeline::PipelineId;
use crate::Error;

/// Kind of work a subpass performs.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum PassType {
    /// Rasterization through a graphics pipeline.
    #[default]
    Graphics,
    /// Compute dispatches.
    Compute,
}

/// Opaque handle to a subpass declared on a [`RenderGraphCompiler`](crate::RenderGraphCompiler).
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubpassId {
    index: usize,
}

/// A declared subpass.
#[derive(Debug, Clone)]
pub struct Subpass {
    pub(crate) index: SubpassId,
    pub(crate) ty: PassType,
    pub(crate) inputs: Vec<ResourceId>,
    pub(crate) outputs: Vec<ResourceId>,
    pub(crate) previous: Option<SubpassId>,
    pub(crate) pipeline: PipelineId,
}

/// Attachment references of one subpass, grouped by role. Owns the arrays a `VkSubpassDescription` points into.
#[derive(Debug, Default, Clone)]
pub(crate) struct SubpassAttachments {
    pub color: Vec<vk::AttachmentReference>,
    pub resolve: Vec<vk::AttachmentReference>,
    pub depth: Option<vk::AttachmentReference>,
}

impl PassType {
    /// Pipeline bind point of this pass type.
    pub fn bind_point(&self) -> vk::PipelineBindPoint {
        match self {
            PassType::Graphics => vk::PipelineBindPoint::GRAPHICS,
            PassType::Compute => vk::PipelineBindPoint::COMPUTE,
        }
    }
}

impl SubpassId {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
        }
    }

    /// Index of the subpass in the render pass. This is the value passed as `subpass` when creating pipelines.
    pub fn index(&self) -> u32 {
        self.index as u32
    }

    pub(crate) fn as_usize(&self) -> usize {
        self.index
    }
}

impl Subpass {
    /// The id of this subpass.
    pub fn id(&self) -> SubpassId {
        self.index
    }

    /// Kind of work done in this subpass.
    pub fn pass_type(&self) -> PassType {
        self.ty
    }

    /// Resources read by this subpass.
    pub fn inputs(&self) -> &[ResourceId] {
        &self.inputs
    }

    /// Resources written by this subpass.
    pub fn outputs(&self) -> &[ResourceId] {
        &self.outputs
    }

    /// The subpass this subpass runs after, or `None` for the first subpass.
    pub fn previous(&self) -> Option<SubpassId> {
        self.previous
    }

    /// The pipeline used in this subpass.
    pub fn pipeline(&self) -> PipelineId {
        self.pipeline
    }

    /// Sort the resources of this subpass into attachment references.
    /// # Errors
    /// - Fails if more than one distinct depth or resolve resource is used.
    /// - Fails if a resolve resource is used without any color resource.
    pub(crate) fn attachments(&self) -> Result<SubpassAttachments> {
        let subpass = self.index.index();
        let mut refs = SubpassAttachments::default();
        let mut resolve: Option<ResourceId> = None;
        let mut depth: Option<(ResourceId, vk::ImageLayout)> = None;

        let inputs = self
            .inputs
            .iter()
            .map(|resource| (resource, vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL));
        let outputs = self
            .outputs
            .iter()
            .map(|resource| (resource, vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL));

        for (&resource, depth_layout) in inputs.chain(outputs) {
            match resource.resource_type() {
                ResourceType::Color => {
                    if !refs.color.iter().any(|r| r.attachment == resource.attachment_index()) {
                        refs.color.push(vk::AttachmentReference {
                            attachment: resource.attachment_index(),
                            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
                        });
                    }
                }
                ResourceType::Resolve => match resolve {
                    Some(existing) if existing != resource => {
                        return Err(Error::MultipleResolveAttachments(subpass).into());
                    }
                    _ => resolve = Some(resource),
                },
                ResourceType::Depth => match depth {
                    Some((existing, _)) if existing != resource => {
                        return Err(Error::MultipleDepthAttachments(subpass).into());
                    }
                    // Outputs come last, so a depth resource that is both read and written ends up writable.
                    _ => depth = Some((resource, depth_layout)),
                },
            }
        }

        if let Some(resolve) = resolve {
            if refs.color.is_empty() {
                return Err(Error::ResolveWithoutColorAttachment(subpass).into());
            }
            // pResolveAttachments runs parallel to pColorAttachments.
            refs.resolve = vec![
                vk::AttachmentReference {
                    attachment: vk::ATTACHMENT_UNUSED,
                    layout: vk::ImageLayout::UNDEFINED,
                };
                refs.color.len()
            ];
            refs.resolve[0] = vk::AttachmentReference {
                attachment: resolve.attachment_index(),
                layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            };
        }

        refs.depth = depth.map(|(resource, layout)| vk::AttachmentReference {
            attachment: resource.attachment_index(),
            layout,
        });
        Ok(refs)
    }
}

impl SubpassAttachments {
    /// Build the subpass description. The returned struct points into `self`, which must outlive it.
    pub fn to_vk(&self, bind_point: vk::PipelineBindPoint) -> vk::SubpassDescription {
        let mut builder = vk::SubpassDescription::builder()
            .pipeline_bind_point(bind_point)
            .color_attachments(&self.color);
        if !self.resolve.is_empty() {
            builder = builder.resolve_attachments(&self.resolve);
        }
        if let Some(depth) = &self.depth {
            builder = builder.depth_stencil_attachment(depth);
        }
        builder.build()
    }
}
