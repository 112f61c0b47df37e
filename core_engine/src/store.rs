use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("quote store is empty; configure at least one quote")]
    EmptyStore,
}

/// Ordered list of candidate quotes, fixed for the lifetime of a run.
///
/// Duplicate texts are allowed; they only differ by position. A store is
/// never empty, which keeps the rotation path in [`crate::select`] total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<String>,
}

impl QuoteStore {
    pub fn new(quotes: Vec<String>) -> Result<Self, QuoteError> {
        if quotes.is_empty() {
            return Err(QuoteError::EmptyStore);
        }
        Ok(Self { quotes })
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn first(&self) -> &str {
        &self.quotes[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.quotes.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for QuoteStore {
    type Error = QuoteError;

    fn try_from(quotes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(quotes)
    }
}
