//! Load state of an independently fetched schema resource.

/// Lifecycle of one schema resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// A request is in flight.
    Loading,
    /// The payload arrived.
    Loaded(T),
    /// The request failed; the message is shown in place of the section.
    Failed(String),
}

impl<T> LoadState<T> {
    /// Builds a resolved state from a fallible result.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Self::Loaded(payload),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Returns whether a request is still in flight.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns whether the resource has resolved, successfully or not.
    pub const fn is_resolved(&self) -> bool {
        !self.is_loading()
    }

    /// Returns the payload if loaded.
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Returns the failure message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Maps the loaded payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Loaded(payload) => LoadState::Loaded(f(payload)),
            Self::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Returns the loaded items, or an empty slice while loading or failed.
    pub fn items(&self) -> &[T] {
        self.loaded().map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: LoadState<u8> = LoadState::from_result(Ok::<_, String>(3));
        assert_eq!(ok.loaded(), Some(&3));
        assert!(ok.is_resolved());

        let failed: LoadState<u8> = LoadState::from_result(Err("boom"));
        assert_eq!(failed.error(), Some("boom"));
    }

    #[test]
    fn test_items_empty_unless_loaded() {
        let loading: LoadState<Vec<u8>> = LoadState::Loading;
        assert!(loading.items().is_empty());
        assert!(loading.is_loading());
        assert_eq!(LoadState::Loaded(vec![1, 2]).items(), &[1, 2]);
    }
}
