use crate::rotation::ledger::UsageLedger;
use crate::store::QuoteStore;

/// Caps the ledger once every stored quote could have been used.
///
/// Only fires when the ledger is at least as long as the store and longer
/// than `max_repetition`; it then keeps the last `max_repetition` entries.
/// Small stores with a large window never trim, which forces rotation.
pub fn trim_ledger(mut ledger: UsageLedger, store: &QuoteStore, max_repetition: usize) -> UsageLedger {
    if store.len() <= ledger.len() && ledger.len() > max_repetition {
        ledger.retain_recent(max_repetition);
    }
    ledger
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(quotes: &[&str]) -> QuoteStore {
        QuoteStore::new(quotes.iter().map(|q| q.to_string()).collect()).unwrap()
    }

    fn ledger(entries: &[&str]) -> UsageLedger {
        entries.iter().copied().collect()
    }

    #[test]
    fn leaves_ledger_alone_while_store_has_room() {
        let trimmed = trim_ledger(ledger(&["a", "b"]), &store(&["a", "b", "c"]), 1);
        assert_eq!(trimmed, ledger(&["a", "b"]));
    }

    #[test]
    fn trims_exhausted_ledger_to_window() {
        let trimmed = trim_ledger(ledger(&["a", "b"]), &store(&["a", "b"]), 1);
        assert_eq!(trimmed, ledger(&["b"]));
    }

    #[test]
    fn large_window_never_trims() {
        let trimmed = trim_ledger(ledger(&["a", "b", "c"]), &store(&["a", "b", "c"]), 5);
        assert_eq!(trimmed, ledger(&["a", "b", "c"]));
    }

    #[test]
    fn zero_window_empties_exhausted_ledger() {
        let trimmed = trim_ledger(ledger(&["a", "b"]), &store(&["a", "b"]), 0);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn trim_is_idempotent() {
        let store = store(&["a", "b", "c", "d"]);
        let cases = [
            ledger(&[]),
            ledger(&["a"]),
            ledger(&["a", "b", "c", "d"]),
            ledger(&["a", "b", "c", "d", "a", "b"]),
        ];
        for max_repetition in 0..6 {
            for case in &cases {
                let once = trim_ledger(case.clone(), &store, max_repetition);
                let twice = trim_ledger(once.clone(), &store, max_repetition);
                assert_eq!(once, twice, "window {max_repetition}, ledger {case:?}");
            }
        }
    }
}
