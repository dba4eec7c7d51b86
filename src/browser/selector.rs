//! Kind selector: available kinds and the current selection.

/// Load state of the kind list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KindsState {
    #[default]
    Loading,
    Loaded,
    /// Kind list could not be fetched; the view has no valid state.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct KindSelector {
    state: KindsState,
    kinds: Vec<String>,
    selected: Option<String>,
}

impl KindSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &KindsState {
        &self.state
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Stores the fetched list and picks the initial selection: `requested`
    /// if it is a known kind, else the first kind, else nothing.
    pub fn load(&mut self, kinds: Vec<String>, requested: Option<&str>) {
        self.kinds = kinds;
        self.state = KindsState::Loaded;
        self.selected = match requested {
            Some(kind) if self.contains(kind) => Some(kind.to_string()),
            _ => self.kinds.first().cloned(),
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.kinds.clear();
        self.selected = None;
        self.state = KindsState::Failed(message.into());
    }

    pub fn reset_loading(&mut self) {
        self.state = KindsState::Loading;
    }

    /// Selects a known kind. Returns whether the selection changed.
    pub fn select(&mut self, kind: &str) -> bool {
        if !self.contains(kind) || self.selected() == Some(kind) {
            return false;
        }
        self.selected = Some(kind.to_string());
        true
    }

    /// Kinds matching `filter` (case-insensitive substring), in list order.
    pub fn filter<'a>(&'a self, filter: &str) -> Vec<&'a str> {
        let needle = filter.to_lowercase();
        self.kinds
            .iter()
            .filter(|k| needle.is_empty() || k.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
