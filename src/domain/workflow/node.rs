use serde::{Deserialize, Serialize};
use std::fmt;

/// Nodes of the adaptive RAG graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Route,
    Retrieve,
    GradeDocuments,
    WebSearch,
    Generate,
    GradeHallucination,
    GradeAnswer,
    DirectAnswer,
}

impl NodeId {
    /// Entry node of every run
    pub const START: NodeId = NodeId::Route;

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Route => "route",
            NodeId::Retrieve => "retrieve",
            NodeId::GradeDocuments => "grade_documents",
            NodeId::WebSearch => "web_search",
            NodeId::Generate => "generate",
            NodeId::GradeHallucination => "grade_hallucination",
            NodeId::GradeAnswer => "grade_answer",
            NodeId::DirectAnswer => "direct_answer",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Goto(NodeId),
    End,
}
