//! Plain text assembly of a processed document.

use crate::model::{Document, PageOutcome};

use super::{PageSeparator, RenderOptions};

/// Assemble the document text.
///
/// Pages appear in the document's order, which is the caller's request order.
/// Lines of a page are separated by one line break; a failed page is replaced
/// by a marker line naming the page and the error, never dropped.
pub fn to_text(doc: &Document, options: &RenderOptions) -> String {
    let blocks: Vec<String> = doc
        .pages
        .iter()
        .map(|outcome| page_block(outcome, options.separator))
        .collect();

    let output = match options.separator {
        PageSeparator::BlankLine => blocks.join("\n\n"),
        PageSeparator::Marker => blocks.join("\n"),
    };

    match options.cleanup {
        Some(ref cleanup) if !cleanup.is_noop() => cleanup.apply(&output),
        _ => output,
    }
}

/// Text of one page, without the separator that precedes the next page.
fn page_block(outcome: &PageOutcome, separator: PageSeparator) -> String {
    let body = match &outcome.result {
        Ok(page) => page.text(),
        Err(e) => format!("[page {} failed: {}]", outcome.page_id, e),
    };

    match separator {
        PageSeparator::BlankLine => body,
        PageSeparator::Marker if body.is_empty() => format!("End of page {}", outcome.page_id),
        PageSeparator::Marker => format!("{}\nEnd of page {}", body, outcome.page_id),
    }
}
