//! Graphviz export of the subpass graph.

use std::fmt::Write;

use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use petgraph::Graph;

use crate::core::traits::DeviceInterface;
use crate::graph::compiler::RenderGraphCompiler;
use crate::graph::dependency::SubpassDependency;
use crate::graph::pass::Subpass;
use crate::graph::resource::ResourceId;

/// Trait that is implemented for the render graph to help with debugging and visualizing the graph.
pub trait GraphViz {
    /// Get the string representation of this graph in `dot` format.
    fn dot(&self) -> Result<String>;
}

fn resource_list(resources: &[ResourceId]) -> Result<String> {
    let mut out = String::new();
    for (i, resource) in resources.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        write!(out, "{:?}#{}", resource.resource_type(), resource.attachment_index())?;
    }
    Ok(out)
}

fn node_label(subpass: &Subpass) -> Result<String> {
    Ok(format!(
        "Subpass {} (pipeline {})\nin: [{}]\nout: [{}]",
        subpass.id().index(),
        subpass.pipeline().index(),
        resource_list(subpass.inputs())?,
        resource_list(subpass.outputs())?
    ))
}

impl<D: DeviceInterface + Clone> GraphViz for RenderGraphCompiler<D> {
    fn dot(&self) -> Result<String> {
        let subpasses = self.subpasses();
        let mut graph = Graph::<String, String>::new();
        let nodes = subpasses
            .iter()
            .map(|subpass| -> Result<NodeIndex> { Ok(graph.add_node(node_label(subpass)?)) })
            .collect::<Result<Vec<_>>>()?;
        for (head, tail) in self.dependency_graph()?.edges() {
            let dependency = SubpassDependency::between(&subpasses[head], &subpasses[tail]);
            graph.add_edge(
                nodes[head],
                nodes[tail],
                format!("{:?} => {:?}", dependency.src_mask.stage, dependency.dst_mask.stage),
            );
        }
        Ok(format!("{}", Dot::new(&graph)))
    }
}
