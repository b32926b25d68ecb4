//! Handler families.
//!
//! Every page handler rebuilds its tree from the page content on each call
//! and keeps no state between invocations.

pub mod chain;
pub mod dump;
pub mod search;
pub mod seeds;
pub mod validate;

pub use chain::Chain;
pub use dump::{MetaDump, RawOutput, TitleDump, XmlDump};
pub use search::{ExtractedLink, GoogleResults, WikipediaResults};
pub use seeds::{GoogleSeeds, WikipediaSeeds};
pub use validate::{ValidationResult, Validator};
