//! Conditional edges of the graph
//!
//! Edges are pure functions of the state and policy. All I/O happens in the
//! node handlers.

use super::{NodeId, Transition, WorkflowConfig, WorkflowState};
use crate::domain::classification::Route;

/// Pick the transition that follows `node`
pub fn next_transition(node: NodeId, state: &WorkflowState, config: &WorkflowConfig) -> Transition {
    match node {
        NodeId::Route => route_edge(state),
        NodeId::Retrieve => Transition::Goto(NodeId::GradeDocuments),
        NodeId::GradeDocuments => documents_edge(state),
        NodeId::WebSearch => Transition::Goto(NodeId::Generate),
        NodeId::Generate => after_generation(config),
        NodeId::GradeHallucination => hallucination_edge(state, config),
        NodeId::GradeAnswer => answer_edge(state, config),
        NodeId::DirectAnswer => Transition::End,
    }
}

fn route_edge(state: &WorkflowState) -> Transition {
    match state.route {
        Some(Route::Vectorstore) => Transition::Goto(NodeId::Retrieve),
        Some(Route::DirectAnswer) => Transition::Goto(NodeId::DirectAnswer),
        Some(Route::Websearch) | None => Transition::Goto(NodeId::WebSearch),
    }
}

/// Grading always leaves `documents` set, so an empty list means every
/// passage was judged irrelevant
fn documents_edge(state: &WorkflowState) -> Transition {
    if state.has_no_relevant_documents() {
        Transition::Goto(NodeId::WebSearch)
    } else {
        Transition::Goto(NodeId::Generate)
    }
}

fn after_generation(config: &WorkflowConfig) -> Transition {
    if config.check_hallucinations {
        Transition::Goto(NodeId::GradeHallucination)
    } else if config.check_answers {
        Transition::Goto(NodeId::GradeAnswer)
    } else {
        Transition::End
    }
}

fn hallucination_edge(state: &WorkflowState, config: &WorkflowConfig) -> Transition {
    let ungrounded = state.grounded == Some(false);
    if ungrounded && state.generation_attempts < config.max_generation_retries {
        return Transition::Goto(NodeId::Generate);
    }

    if config.check_answers {
        Transition::Goto(NodeId::GradeAnswer)
    } else {
        Transition::End
    }
}

/// Loops back to web search only while both a search and a generation remain
fn answer_edge(state: &WorkflowState, config: &WorkflowConfig) -> Transition {
    let unanswered = state.answers_question == Some(false);
    let can_search = state.search_attempts < config.max_search_retries;
    let can_generate = state.generation_attempts < config.max_generation_retries;
    if unanswered && can_search && can_generate {
        Transition::Goto(NodeId::WebSearch)
    } else {
        Transition::End
    }
}

/// True when entering `node` would push a bounded counter past its maximum
pub fn would_exceed_bound(node: NodeId, state: &WorkflowState, config: &WorkflowConfig) -> bool {
    match node {
        NodeId::Generate | NodeId::DirectAnswer => {
            state.generation_attempts >= config.max_generation_retries
        }
        NodeId::WebSearch => state.search_attempts >= config.max_search_retries,
        _ => false,
    }
}

/// True when the last verdicts accept the current generation
pub fn is_accepted(state: &WorkflowState) -> bool {
    state.generation.is_some()
        && state.grounded != Some(false)
        && state.answers_question != Some(false)
}
