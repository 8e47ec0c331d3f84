//! Synthesis of subpass dependencies.
//!
//! Every subpass dependency is derived from the roles of the resources on both sides of an edge in the subpass
//! graph. The producing side contributes the stages and accesses of its outputs, the consuming side those of its
//! inputs. A dependency therefore only waits on the stages that actually touch attachments, instead of on the
//! whole pipeline.
//!
//! Besides one dependency per edge, two boundary dependencies are emitted: one from `VK_SUBPASS_EXTERNAL` into
//! the first subpass, and one from the last subpass back out to `VK_SUBPASS_EXTERNAL`.

use std::collections::VecDeque;

use anyhow::Result;
use ash::vk;

use crate::graph::dependency_graph::DependencyGraph;
use crate::graph::pass::{Subpass, SubpassId};
use crate::graph::resource::StageAccess;
use crate::util::to_vk::AsVulkanType;
use crate::Error;

/// One side of a subpass dependency.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum SubpassRef {
    /// Commands outside of the render pass.
    External,
    /// A subpass of the render pass.
    Subpass(SubpassId),
}

/// Execution and memory dependency between two subpasses, or between a subpass and the outside of the render pass.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct SubpassDependency {
    /// The producing side.
    pub src: SubpassRef,
    /// The consuming side.
    pub dst: SubpassRef,
    /// Stages and accesses of the producing side that must complete.
    pub src_mask: StageAccess,
    /// Stages and accesses of the consuming side that must wait.
    pub dst_mask: StageAccess,
}

impl SubpassRef {
    fn index(&self) -> u32 {
        match self {
            SubpassRef::External => vk::SUBPASS_EXTERNAL,
            SubpassRef::Subpass(id) => id.index(),
        }
    }
}

impl SubpassDependency {
    /// Whether one side of this dependency lies outside of the render pass.
    pub fn is_boundary(&self) -> bool {
        self.src == SubpassRef::External || self.dst == SubpassRef::External
    }

    /// Dependency from the end of the previous frame into the first subpass.
    pub fn entry(source: &Subpass) -> Self {
        Self {
            src: SubpassRef::External,
            dst: SubpassRef::Subpass(source.id()),
            src_mask: StageAccess::previous_frame(),
            dst_mask: StageAccess::from_resources(source.inputs(), StageAccess::fragment_shader()),
        }
    }

    /// Dependency from the last subpass to whatever consumes the render pass output.
    pub fn exit(sink: &Subpass) -> Self {
        Self {
            src: SubpassRef::Subpass(sink.id()),
            dst: SubpassRef::External,
            src_mask: StageAccess::from_resources(sink.outputs(), StageAccess::fragment_shader()),
            dst_mask: StageAccess::external_consumer(),
        }
    }

    /// Dependency along the graph edge `from -> to`.
    pub fn between(from: &Subpass, to: &Subpass) -> Self {
        Self {
            src: SubpassRef::Subpass(from.id()),
            dst: SubpassRef::Subpass(to.id()),
            src_mask: StageAccess::from_resources(from.outputs(), StageAccess::fragment_shader()),
            dst_mask: StageAccess::from_resources(to.inputs(), StageAccess::fragment_shader()),
        }
    }
}

impl AsVulkanType for SubpassDependency {
    type Output = vk::SubpassDependency;

    fn as_vulkan(&self) -> Self::Output {
        vk::SubpassDependency {
            src_subpass: self.src.index(),
            dst_subpass: self.dst.index(),
            src_stage_mask: self.src_mask.stage,
            dst_stage_mask: self.dst_mask.stage,
            src_access_mask: self.src_mask.access,
            dst_access_mask: self.dst_mask.access,
            dependency_flags: vk::DependencyFlags::empty(),
        }
    }
}

/// Build the subpass graph. Every subpass is a vertex, and every subpass with a previous subpass gets an edge
/// `previous -> subpass`. Previous subpasses always have a lower index, so the graph is acyclic.
pub(crate) fn build_graph(subpasses: &[Subpass]) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new(subpasses.len());
    for subpass in subpasses {
        if let Some(previous) = subpass.previous() {
            graph.add_edge(previous.as_usize(), subpass.id().as_usize())?;
        }
    }
    Ok(graph)
}

/// Find the unique source and sink vertex of the graph.
/// # Errors
/// - Fails if there is not exactly one source, or not exactly one sink.
pub(crate) fn find_endpoints(graph: &DependencyGraph) -> Result<(usize, usize)> {
    let sources = graph.sources();
    let source = match sources.as_slice() {
        [source] => *source,
        [] => return Err(Error::NoSourcePass.into()),
        _ => return Err(Error::MultipleSourcePasses(sources.len()).into()),
    };
    let sinks = graph.sinks();
    let sink = match sinks.as_slice() {
        [sink] => *sink,
        [] => return Err(Error::NoSinkPass.into()),
        _ => return Err(Error::MultipleSinkPasses(sinks.len()).into()),
    };
    Ok((source, sink))
}

/// Emit all dependencies of a validated graph: the entry and exit dependencies, followed by one dependency per edge
/// in breadth-first order from the source.
pub(crate) fn synthesize(
    graph: &DependencyGraph,
    subpasses: &[Subpass],
    source: usize,
    sink: usize,
) -> Result<Vec<SubpassDependency>> {
    let entry = SubpassDependency::entry(&subpasses[source]);
    debug!("Subpass dependency external -> {}: {:?} -> {:?}", source, entry.src_mask, entry.dst_mask);
    let exit = SubpassDependency::exit(&subpasses[sink]);
    debug!("Subpass dependency {} -> external: {:?} -> {:?}", sink, exit.src_mask, exit.dst_mask);

    let mut dependencies = Vec::with_capacity(graph.edge_count() + 2);
    dependencies.push(entry);
    dependencies.push(exit);

    let mut visited = vec![false; graph.vertex_count()];
    let mut queue = VecDeque::from([source]);
    while let Some(from) = queue.pop_front() {
        // A vertex can be queued once per incoming edge, but its outgoing edges are only walked once.
        if std::mem::replace(&mut visited[from], true) {
            continue;
        }
        for to in graph.forward_neighbors(from)? {
            let dependency = SubpassDependency::between(&subpasses[from], &subpasses[to]);
            debug!(
                "Subpass dependency {} -> {}: {:?} -> {:?}",
                from, to, dependency.src_mask, dependency.dst_mask
            );
            dependencies.push(dependency);
            queue.push_back(to);
        }
    }
    Ok(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::pass::PassType;
    use crate::graph::resource::{ResourceId, ResourceType};
    use crate::pipeline::PipelineId;

    fn subpass(index: usize, color: ResourceId) -> Subpass {
        Subpass {
            index: SubpassId::new(index),
            ty: PassType::Graphics,
            inputs: vec![color],
            outputs: vec![color],
            previous: None,
            pipeline: PipelineId::new(index),
        }
    }

    #[test]
    fn diamond_emits_each_edge_once() -> Result<()> {
        let color = ResourceId::new(0, ResourceType::Color);
        let subpasses = (0..5).map(|i| subpass(i, color)).collect::<Vec<_>>();
        // Diamond 0 -> {1, 2} -> 3 with a tail 3 -> 4, so the joining vertex has outgoing edges of its own.
        let mut graph = DependencyGraph::new(5);
        graph.add_edge(0, 1)?;
        graph.add_edge(0, 2)?;
        graph.add_edge(1, 3)?;
        graph.add_edge(2, 3)?;
        graph.add_edge(3, 4)?;

        let (source, sink) = find_endpoints(&graph)?;
        assert_eq!((source, sink), (0, 4));

        let dependencies = synthesize(&graph, &subpasses, source, sink)?;
        assert_eq!(dependencies.len(), 7);
        let edges = dependencies
            .iter()
            .filter(|d| !d.is_boundary())
            .map(|d| (d.src, d.dst))
            .collect::<Vec<_>>();
        let expected = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]
            .into_iter()
            .map(|(from, to)| (SubpassRef::Subpass(SubpassId::new(from)), SubpassRef::Subpass(SubpassId::new(to))))
            .collect::<Vec<_>>();
        assert_eq!(edges, expected);
        Ok(())
    }

    #[test]
    fn cycle_without_exit_has_no_sink() -> Result<()> {
        let mut graph = DependencyGraph::new(3);
        graph.add_edge(0, 1)?;
        graph.add_edge(1, 2)?;
        graph.add_edge(2, 1)?;

        let err = find_endpoints(&graph).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoSinkPass)));
        Ok(())
    }

    #[test]
    fn multiple_sources_are_counted() -> Result<()> {
        let mut graph = DependencyGraph::new(3);
        graph.add_edge(0, 2)?;
        graph.add_edge(1, 2)?;

        let err = find_endpoints(&graph).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MultipleSourcePasses(2))));
        Ok(())
    }
}
