//! Generic page dumps: raw source, re-serialised markup, meta tags, title.

use crate::context::{anchor_hrefs, FetchedPage, HandlerOutput, PageHandler};
use crate::error::Result;
use crate::query::{attr_or_empty, find_all};
use crate::tree::parse_tree;

/// Emits the page content verbatim and ends the branch.
pub struct RawOutput;

impl PageHandler for RawOutput {
    fn name(&self) -> &'static str {
        "source"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        Ok(HandlerOutput::terminal(vec![page.text().into_owned()]))
    }
}

/// Emits the coerced tree as markup and follows every anchor.
pub struct XmlDump;

impl PageHandler for XmlDump {
    fn name(&self) -> &'static str {
        "xmlsource"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let tree = parse_tree(&page.text());
        Ok(HandlerOutput::continue_with(
            vec![tree.to_markup()],
            anchor_hrefs(&tree),
        ))
    }
}

/// Emits one `name: content` line per `<meta>` tag and follows every anchor.
pub struct MetaDump;

impl PageHandler for MetaDump {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let tree = parse_tree(&page.text());
        let emitted = find_all(&tree, "meta")
            .map(|meta| {
                format!(
                    "{}: {}",
                    attr_or_empty(meta, "name"),
                    attr_or_empty(meta, "content")
                )
            })
            .collect();

        Ok(HandlerOutput::continue_with(emitted, anchor_hrefs(&tree)))
    }
}

/// Emits the text of every `<title>` on one line and follows every anchor.
pub struct TitleDump;

impl PageHandler for TitleDump {
    fn name(&self) -> &'static str {
        "title"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let tree = parse_tree(&page.text());
        let title: String = find_all(&tree, "title").map(|t| t.text()).collect();

        Ok(HandlerOutput::continue_with(vec![title], anchor_hrefs(&tree)))
    }
}
