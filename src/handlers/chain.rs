//! Several page handlers run over the same page as one.

use std::sync::Arc;

use crate::context::{FetchedPage, Frontier, HandlerOutput, PageHandler};
use crate::error::Result;

/// Runs every member in order on the same page.
///
/// Emitted lines are joined in member order and continuing frontiers are
/// concatenated. The result is terminal only when every member is terminal.
/// A failing member fails the whole chain.
pub struct Chain(pub Vec<Arc<dyn PageHandler>>);

impl PageHandler for Chain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let mut emitted = Vec::new();
        let mut urls = Vec::new();
        let mut terminal = true;

        for handler in &self.0 {
            let output = handler.handle(page)?;
            log::debug!(
                "{} emitted {} line(s) for {}",
                handler.name(),
                output.emitted.len(),
                page.source_url
            );

            emitted.extend(output.emitted);
            if let Frontier::Continue(next) = output.frontier {
                terminal = false;
                urls.extend(next);
            }
        }

        if terminal {
            Ok(HandlerOutput::terminal(emitted))
        } else {
            Ok(HandlerOutput::continue_with(emitted, urls))
        }
    }
}
