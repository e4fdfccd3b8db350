//! Prompt templates for the classifiers and the generator
//!
//! Templates use `${name}` placeholders.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

pub const ROUTER_SYSTEM: &str = "You are an expert at routing a user question to a vectorstore or web search.
The vectorstore contains ${index_topic}. If the question is about that, the answer must be 'vectorstore'.
Otherwise the answer must be 'websearch'.${direct_answer}
Respond with ONLY ONE WORD.";

pub const ROUTER_DIRECT_ANSWER: &str = "
If the question is small talk or can be answered without looking anything up, the answer must be 'ask'.";

pub const RELEVANCE_SYSTEM: &str = "You are a grader assessing relevance of a retrieved document to a user question.
If the document contains keyword(s) or semantic meaning related to the question, grade it as relevant.
Give a binary score 'yes' or 'no' to indicate whether the document is relevant to the question.
Respond with ONLY ONE WORD.";

pub const RELEVANCE_USER: &str = "Retrieved document: \n\n ${document} \n\n User question: ${question}";

pub const HALLUCINATION_SYSTEM: &str = "You are a grader assessing whether an LLM generation is grounded in / supported by a set of retrieved facts.
Give a binary score 'yes' or 'no'. 'Yes' means that the answer is grounded in / supported by the set of facts.
Respond with ONLY ONE WORD.";

pub const HALLUCINATION_USER: &str = "Set of facts: \n\n ${documents} \n\n LLM generation: ${generation}";

pub const ANSWER_SYSTEM: &str = "You are a grader assessing whether an answer addresses / resolves a question.
Give a binary score 'yes' or 'no'. 'Yes' means that the answer resolves the question.
Respond with ONLY ONE WORD.";

pub const ANSWER_USER: &str = "User question: \n\n ${question} \n\n LLM generation: ${generation}";

pub const GENERATOR_SYSTEM: &str = "You are an assistant for question-answering tasks. Use the following pieces of retrieved context to answer the question. If you don't know the answer, just say that you don't know. Use three sentences maximum and keep the answer concise.";

pub const GENERATOR_USER: &str = "Question: ${question} \nContext: ${context} \nAnswer:";

pub const DIRECT_SYSTEM: &str = "You are an assistant for question-answering tasks. Answer the question from your own knowledge. If you don't know the answer, just say that you don't know. Use three sentences maximum and keep the answer concise.";

/// Substitute `${name}` placeholders in a single pass.
///
/// Inserted values are never scanned again, so placeholders inside passages or
/// questions stay literal. Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let text = render(RELEVANCE_USER, &[("document", "doc"), ("question", "q?")]);
        assert_eq!(text, "Retrieved document: \n\n doc \n\n User question: q?");
    }

    #[test]
    fn test_render_does_not_expand_inserted_values() {
        let text = render(
            HALLUCINATION_USER,
            &[
                ("documents", "Claim: ${generation}"),
                ("generation", "The moon is cheese."),
            ],
        );

        assert_eq!(
            text,
            "Set of facts: \n\n Claim: ${generation} \n\n LLM generation: The moon is cheese."
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("${a} ${b}", &[("a", "1")]), "1 ${b}");
    }
}
