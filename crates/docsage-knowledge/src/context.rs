//! Prompt context assembly.
//!
//! An uploaded document always wins: when its text is present the knowledge
//! base is not searched at all. Otherwise the top chunks from the knowledge
//! base are rendered with their summaries, prefixed by the document overview.

use crate::search::DEFAULT_MAX_RESULTS;
use crate::types::ContextResult;
use docsage_ingest::DocumentChunk;

pub const SOURCE_UPLOADED_PDF: &str = "Uploaded PDF document";
pub const SOURCE_KNOWLEDGE_BASE: &str = "Knowledge base";

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Read side of a knowledge base, as seen by context assembly.
pub trait ContextSource {
    fn is_ready(&self) -> bool;
    fn search_relevant_chunks(&self, query: &str, max_results: usize) -> Vec<DocumentChunk>;
    fn overall_summary(&self) -> String;
}

/// Combine uploaded text and knowledge-base chunks into one context.
pub fn assemble_context<S>(source: &S, query: &str, uploaded_text: Option<&str>) -> ContextResult
where
    S: ContextSource + ?Sized,
{
    let has_knowledge_base = source.is_ready();

    if let Some(uploaded) = uploaded_text.filter(|t| !t.is_empty()) {
        return ContextResult {
            context: uploaded.to_string(),
            sources: vec![SOURCE_UPLOADED_PDF.to_string()],
            has_knowledge_base,
            has_uploaded_pdf: true,
        };
    }

    let mut result = ContextResult {
        has_knowledge_base,
        ..Default::default()
    };
    if !has_knowledge_base {
        return result;
    }

    let chunks = source.search_relevant_chunks(query, DEFAULT_MAX_RESULTS);
    if chunks.is_empty() {
        return result;
    }

    let body = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| render_chunk(i + 1, chunk))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);

    let overview = source.overall_summary();
    result.context = if overview.is_empty() {
        body
    } else {
        format!("Document Overview: {overview}{SECTION_SEPARATOR}{body}")
    };
    result.sources.push(SOURCE_KNOWLEDGE_BASE.to_string());
    result
}

fn render_chunk(position: usize, chunk: &DocumentChunk) -> String {
    let header = match chunk.summary.as_deref() {
        Some(summary) if !summary.is_empty() => format!("[Chunk {position} Summary: {summary}]"),
        _ => format!("[Chunk {position}]"),
    };
    format!("{header}\n{}", chunk.text)
}

/// System prompt for the completion model, grounded in `result`.
pub fn create_system_prompt(result: &ContextResult) -> String {
    if !result.context.is_empty() {
        let sources = result.sources.join(" and ");
        return format!(
            "You are a helpful assistant with access to document content from {sources}.\n\n\
             Here's the relevant information:\n\n\
             {context}\n\n\
             Instructions:\n\
             - Use this information to answer questions about the document(s)\n\
             - If you can't find the answer in the provided content, clearly state this\n\
             - When referencing information, you can mention it comes from the \"{sources}\"\n\
             - Be precise and cite specific parts of the content when relevant\n\
             - If the information is truncated, mention this limitation",
            context = result.context,
        );
    }

    let mut prompt = String::from("You are a helpful assistant.");
    if !result.has_knowledge_base && !result.has_uploaded_pdf {
        prompt.push_str(" You currently have no document loaded and no knowledge base available.");
    } else if !result.has_uploaded_pdf {
        prompt.push_str(
            " You have no uploaded PDF document, and no relevant information was found in the knowledge base for this query.",
        );
    } else {
        prompt.push_str(" No relevant document content was found for this query.");
    }
    prompt
}
