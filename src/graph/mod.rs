//! The render graph describes one `VkRenderPass` as a set of subpasses that read and write attachments.
//! Subpasses are chained by naming the subpass they run after. From this, the
//! [`RenderGraphCompiler`](crate::RenderGraphCompiler) builds a [`DependencyGraph`](dependency_graph::DependencyGraph),
//! checks it has exactly one first and one last subpass, and derives every `VkSubpassDependency` from the roles
//! of the attachments each subpass touches.
//!
//! All resources are declared on the compiler and referenced through opaque [`ResourceId`](resource::ResourceId)s.
//! The actual images are bound later through a framebuffer, using [`ResourceId::attachment_index`](resource::ResourceId::attachment_index).
//!
//! Through the [`GraphViz`](viz::GraphViz) trait, it's possible to export a graphviz-compatible dot file to display
//! the subpass graph.
//!
//! For a full example, see the [`compiler`] module documentation.

pub mod compiler;
pub mod dependency;
pub mod dependency_graph;
pub mod pass;
pub mod render_pass;
pub mod resource;
#[cfg(feature = "graphviz")]
pub mod viz;
