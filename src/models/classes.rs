// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Object class registry.
//!
//! The registry is an ordered set of class names plus the current
//! selection. It lives for one run only; every launch starts again from
//! the configured defaults.

/// Ordered, de-duplicated class names with a selection that always points
/// at an existing entry (or nothing, when the registry is empty).
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    names: Vec<String>,
    selected: Option<usize>,
}

impl ClassRegistry {
    /// Create a registry from defaults, selecting the first entry.
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in defaults {
            registry.add(name);
        }
        registry
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Currently selected class name.
    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.names[i].as_str())
    }

    /// Select `name` if it is registered.
    pub fn select(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Register a new class. Blank names and duplicates are ignored.
    ///
    /// The selection only moves if nothing was selected before.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into().trim().to_string();
        if name.is_empty() || self.names.contains(&name) {
            return false;
        }
        self.names.push(name);
        if self.selected.is_none() {
            self.selected = Some(self.names.len() - 1);
        }
        true
    }

    /// Remove `name`. When it was selected, the selection moves to the
    /// entry that took its place, else the new last entry, else nothing.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(index) = self.names.iter().position(|n| n == name) else {
            return false;
        };
        self.names.remove(index);

        self.selected = match self.selected {
            _ if self.names.is_empty() => None,
            Some(sel) if sel == index => Some(index.min(self.names.len() - 1)),
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        true
    }

    /// Remove the currently selected class, returning its name.
    pub fn remove_selected(&mut self) -> Option<String> {
        let name = self.selected()?.to_string();
        self.remove(&name);
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_first() {
        let registry = ClassRegistry::new(["car", "none"]);
        assert_eq!(registry.names(), &["car".to_string(), "none".to_string()]);
        assert_eq!(registry.selected(), Some("car"));
    }

    #[test]
    fn test_remove_selected_falls_back_to_next() {
        let mut registry = ClassRegistry::new(["car", "none"]);
        assert_eq!(registry.remove_selected().as_deref(), Some("car"));
        assert_eq!(registry.selected(), Some("none"));
    }

    #[test]
    fn test_remove_last_selected_falls_back_to_previous() {
        let mut registry = ClassRegistry::new(["car", "bus", "none"]);
        registry.select("none");
        registry.remove_selected();
        assert_eq!(registry.selected(), Some("bus"));
    }

    #[test]
    fn test_remove_everything_clears_selection() {
        let mut registry = ClassRegistry::new(["car", "none"]);
        registry.remove_selected();
        registry.remove_selected();
        assert!(registry.is_empty());
        assert_eq!(registry.selected(), None);
        assert_eq!(registry.remove_selected(), None);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut registry = ClassRegistry::new(["car", "bus", "none"]);
        registry.select("none");
        assert!(registry.remove("car"));
        assert_eq!(registry.selected(), Some("none"));
        assert!(!registry.remove("plane"));
    }

    #[test]
    fn test_add_ignores_blank_and_duplicates() {
        let mut registry = ClassRegistry::new(["car"]);
        assert!(!registry.add("   "));
        assert!(!registry.add("car"));
        assert!(registry.add(" truck "));
        assert_eq!(registry.names().len(), 2);
        assert_eq!(registry.names()[1], "truck");
        assert_eq!(registry.selected(), Some("car"));
    }

    #[test]
    fn test_add_to_empty_registry_selects() {
        let mut registry = ClassRegistry::new(Vec::<String>::new());
        assert_eq!(registry.selected(), None);
        registry.add("bike");
        assert_eq!(registry.selected(), Some("bike"));
    }
}
