pub(crate) mod ledger;
pub(crate) mod trim;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::store::QuoteStore;
use ledger::UsageLedger;
use trim::trim_ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    /// Picked at random among quotes missing from the ledger.
    Fresh,
    /// Every quote was recent, so the oldest ledger entry was reused.
    Rotated,
}

/// Outcome of one selection: the quote plus the ledger the caller should
/// persist once delivery succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub quote: String,
    pub ledger: UsageLedger,
    pub path: SelectionPath,
    pub available: usize,
}

/// Picks the next quote and returns the updated ledger.
///
/// The input ledger is left untouched; dropping the returned [`Selection`]
/// is how a failed delivery rolls back.
pub fn select<R>(
    store: &QuoteStore,
    ledger: &UsageLedger,
    max_repetition: usize,
    rng: &mut R,
) -> Selection
where
    R: Rng + ?Sized,
{
    let mut next = trim_ledger(ledger.clone(), store, max_repetition);
    let available: Vec<&str> = store.iter().filter(|quote| !next.contains(quote)).collect();

    match available.choose(rng) {
        Some(quote) => {
            let quote = quote.to_string();
            next.push(quote.clone());
            Selection {
                quote,
                ledger: next,
                path: SelectionPath::Fresh,
                available: available.len(),
            }
        }
        None => {
            // Nothing available means every stored quote is in the ledger,
            // and the store is never empty.
            let quote = next
                .rotate_oldest()
                .unwrap_or_else(|| store.first().to_string());
            Selection {
                quote,
                ledger: next,
                path: SelectionPath::Rotated,
                available: 0,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteSelector {
    store: QuoteStore,
    max_repetition: usize,
}

impl QuoteSelector {
    pub fn new(store: QuoteStore, max_repetition: usize) -> Self {
        Self {
            store,
            max_repetition,
        }
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn max_repetition(&self) -> usize {
        self.max_repetition
    }

    /// True when the window is wide enough that the ledger can never shrink
    /// below the store size, so every pick after the first pass rotates.
    pub fn always_rotates(&self) -> bool {
        self.max_repetition >= self.store.len()
    }

    pub fn select<R>(&self, ledger: &UsageLedger, rng: &mut R) -> Selection
    where
        R: Rng + ?Sized,
    {
        select(&self.store, ledger, self.max_repetition, rng)
    }
}
