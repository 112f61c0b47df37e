mod rotation;
mod store;

pub use rotation::ledger::UsageLedger;
pub use rotation::trim::trim_ledger;
pub use rotation::{select, QuoteSelector, Selection, SelectionPath};
pub use store::{QuoteError, QuoteStore};
