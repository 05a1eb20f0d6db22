use crate::catalog::Catalog;

/// Category selection screen state. Remembers the order in which
/// categories were picked, since that is the order their videos are
/// concatenated in before shuffling.
#[derive(Debug, Clone)]
pub struct CategoryPicker {
    names: Vec<String>,
    cursor: usize,
    picked: Vec<usize>,
}

impl CategoryPicker {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            names: catalog.names().map(str::to_string).collect(),
            cursor: 0,
            picked: Vec::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_picked(&self, index: usize) -> bool {
        self.picked.contains(&index)
    }

    pub fn move_by(&mut self, delta: i32) {
        if self.names.is_empty() {
            return;
        }
        let max = self.names.len() as i64 - 1;
        self.cursor = (self.cursor as i64 + i64::from(delta)).clamp(0, max) as usize;
    }

    pub fn toggle(&mut self) {
        if self.cursor >= self.names.len() {
            return;
        }
        if let Some(pos) = self.picked.iter().position(|&idx| idx == self.cursor) {
            self.picked.remove(pos);
        } else {
            self.picked.push(self.cursor);
        }
    }

    /// Picks everything, or clears the selection if everything is already
    /// picked.
    pub fn toggle_all(&mut self) {
        if self.picked.len() == self.names.len() {
            self.picked.clear();
        } else {
            for idx in 0..self.names.len() {
                if !self.picked.contains(&idx) {
                    self.picked.push(idx);
                }
            }
        }
    }

    pub fn selection(&self) -> Vec<String> {
        self.picked
            .iter()
            .map(|&idx| self.names[idx].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> CategoryPicker {
        let catalog = Catalog::from_yaml_str(
            "categories:\n  - name: Nature\n  - name: Sport\n  - name: Music\n",
        )
        .unwrap();
        CategoryPicker::new(&catalog)
    }

    #[test]
    fn selection_keeps_pick_order() {
        let mut picker = picker();
        picker.move_by(2);
        picker.toggle();
        picker.move_by(-2);
        picker.toggle();
        assert_eq!(picker.selection(), vec!["Music", "Nature"]);
        picker.toggle();
        assert_eq!(picker.selection(), vec!["Music"]);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut picker = picker();
        picker.move_by(-3);
        assert_eq!(picker.cursor(), 0);
        picker.move_by(10);
        assert_eq!(picker.cursor(), 2);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut picker = picker();
        picker.move_by(1);
        picker.toggle();
        picker.toggle_all();
        assert_eq!(picker.selection(), vec!["Sport", "Nature", "Music"]);
        picker.toggle_all();
        assert!(picker.selection().is_empty());
    }
}
