//! Single-column, server-side sort state.

use std::fmt;

/// Sort direction as understood by the entities endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Wire form: `asc` / `desc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Accepts exactly `asc` or `desc`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator glyph.
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field + direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Active sort, at most one column. Empty means server-default order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    pub fn new(active: Option<SortSpec>) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Option<&SortSpec> {
        self.active.as_ref()
    }

    /// Direction of `field` if it is the active sort column.
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.active
            .as_ref()
            .filter(|s| s.field == field)
            .map(|s| s.direction)
    }

    /// Header click on `field`.
    ///
    /// A new column starts ascending and replaces any previous column; the
    /// active column flips between ascending and descending.
    pub fn cycle(&mut self, field: &str) -> SortSpec {
        let direction = match self.direction_of(field) {
            Some(current) => current.reversed(),
            None => SortDirection::Ascending,
        };
        let spec = SortSpec::new(field, direction);
        self.active = Some(spec.clone());
        spec
    }

    pub fn set(&mut self, spec: Option<SortSpec>) {
        self.active = spec;
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_starts_ascending_then_flips() {
        let mut sort = SortState::default();
        assert_eq!(sort.cycle("createdAt"), SortSpec::asc("createdAt"));
        assert_eq!(sort.cycle("createdAt"), SortSpec::desc("createdAt"));
        assert_eq!(sort.cycle("createdAt"), SortSpec::asc("createdAt"));
    }

    #[test]
    fn new_column_replaces_previous() {
        let mut sort = SortState::default();
        sort.cycle("name");
        sort.cycle("name");
        assert_eq!(sort.cycle("age"), SortSpec::asc("age"));
        assert_eq!(sort.direction_of("name"), None);
        assert_eq!(sort.direction_of("age"), Some(SortDirection::Ascending));
    }

    #[test]
    fn direction_wire_form() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("DESC"), None);
        assert_eq!(SortDirection::Descending.to_string(), "desc");
    }
}
