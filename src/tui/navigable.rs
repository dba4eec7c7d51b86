//! Shared navigation trait for panes with a selectable row.

/// Navigation over a list whose length is only known at render time.
///
/// Movement adjusts the `selected` index without bounds; [`clamp`] brings it
/// back into range once the row count is known.
///
/// [`clamp`]: NavigableList::clamp
pub trait NavigableList {
    fn selected(&self) -> usize;
    fn selected_mut(&mut self) -> &mut usize;

    fn select_up(&mut self) {
        *self.selected_mut() = self.selected().saturating_sub(1);
    }

    fn select_down(&mut self) {
        *self.selected_mut() = self.selected().saturating_add(1);
    }

    fn page_up(&mut self, n: usize) {
        *self.selected_mut() = self.selected().saturating_sub(n);
    }

    fn page_down(&mut self, n: usize) {
        *self.selected_mut() = self.selected().saturating_add(n);
    }

    fn home(&mut self) {
        *self.selected_mut() = 0;
    }

    fn end(&mut self) {
        *self.selected_mut() = usize::MAX;
    }

    /// Clamps the selection to `len` rows (0 when empty).
    fn clamp(&mut self, len: usize) {
        *self.selected_mut() = self.selected().min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cursor(usize);

    impl NavigableList for Cursor {
        fn selected(&self) -> usize {
            self.0
        }
        fn selected_mut(&mut self) -> &mut usize {
            &mut self.0
        }
    }

    #[test]
    fn end_then_clamp_lands_on_last_row() {
        let mut c = Cursor(0);
        c.end();
        c.clamp(5);
        assert_eq!(c.selected(), 4);
        c.page_down(20);
        c.clamp(5);
        assert_eq!(c.selected(), 4);
        c.page_up(3);
        assert_eq!(c.selected(), 1);
        c.clamp(0);
        assert_eq!(c.selected(), 0);
    }
}
