//! In-memory category list store.

use crate::types::{Category, ValidationError, normalize};
use std::collections::HashMap;

/// Errors that can occur during list operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ListError {
    /// Malformed import shape.
    Validation(ValidationError),
    /// Category not found.
    CategoryNotFound(String),
    /// Item not found in a category.
    ItemNotFound { category: String, item: String },
    /// Category name already taken.
    Duplicate(String),
    /// Blank user input where text is required.
    EmptyText(&'static str),
    /// Persistence medium missing or failed.
    StorageUnavailable(String),
    /// Malformed JSON on import.
    Parse(String),
}

impl ListError {
    /// Short machine-readable kind for the UI layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ListError::Validation(_) => "validation",
            ListError::CategoryNotFound(_) | ListError::ItemNotFound { .. } => "not_found",
            ListError::Duplicate(_) => "duplicate",
            ListError::EmptyText(_) => "empty",
            ListError::StorageUnavailable(_) => "storage_unavailable",
            ListError::Parse(_) => "parse",
        }
    }
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListError::Validation(e) => write!(f, "Import failed: {}", e),
            ListError::CategoryNotFound(_) => write!(f, "Category not found."),
            ListError::ItemNotFound { item, .. } => write!(f, "Item not found: {}", item),
            ListError::Duplicate(name) => write!(f, "Category already exists: {}", name),
            ListError::EmptyText(field) => write!(f, "Type {}.", field),
            ListError::StorageUnavailable(reason) => {
                write!(f, "Save failed: storage unavailable ({})", reason)
            }
            ListError::Parse(_) => write!(f, "Import failed: invalid JSON file."),
        }
    }
}

impl std::error::Error for ListError {}

impl From<ValidationError> for ListError {
    fn from(e: ValidationError) -> Self {
        ListError::Validation(e)
    }
}

/// Ordered collection of categories with a derived name index.
///
/// Mutators are crate-private: the session is the only caller, so every
/// mutation is paired with a save and a dirty mark.
#[derive(Debug, Default, Clone)]
pub struct CategoryStore {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing categories.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut store = Self {
            categories,
            index: HashMap::new(),
        };
        store.rebuild_index();
        store
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Position of the category with the given (normalized) name.
    ///
    /// With legacy duplicate names, the last entry wins.
    pub fn find_category(&self, name: &str) -> Option<usize> {
        let name = normalize(name);
        if name.is_empty() {
            return None;
        }
        self.index.get(&name).copied()
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.find_category(name).map(|idx| &self.categories[idx])
    }

    /// Append a new, empty category. Returns the normalized name.
    pub(crate) fn add_category(&mut self, name: &str) -> Result<String, ListError> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(ListError::EmptyText("a category name"));
        }
        if self.find_category(&name).is_some() {
            return Err(ListError::Duplicate(name));
        }

        self.categories.push(Category::new(name.clone()));
        self.rebuild_index();
        Ok(name)
    }

    /// Remove every category with this name. Returns how many were removed.
    pub(crate) fn delete_category(&mut self, name: &str) -> usize {
        let name = normalize(name);
        let before = self.categories.len();
        self.categories.retain(|c| c.name != name);
        let removed = before - self.categories.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Append an item to a category. Returns the normalized item.
    pub(crate) fn add_item(&mut self, category: &str, item: &str) -> Result<String, ListError> {
        let item = normalize(item);
        if item.is_empty() {
            return Err(ListError::EmptyText("an item to add"));
        }
        let idx = self.require(category)?;

        self.categories[idx].items.push(item.clone());
        self.rebuild_index();
        Ok(item)
    }

    /// Remove all occurrences of an item, compared after normalization.
    ///
    /// Returns `Ok(0)` when the category exists but holds no match.
    pub(crate) fn remove_item(&mut self, category: &str, item: &str) -> Result<usize, ListError> {
        let target = normalize(item);
        if target.is_empty() {
            return Err(ListError::EmptyText("an item to remove"));
        }
        let idx = self.require(category)?;

        let items = &mut self.categories[idx].items;
        let before = items.len();
        items.retain(|i| normalize(i) != target);
        let removed = before - items.len();
        if removed > 0 {
            self.rebuild_index();
        }
        Ok(removed)
    }

    /// Replace the first exact occurrence of `old` with normalized `new`.
    pub(crate) fn edit_item(&mut self, category: &str, old: &str, new: &str) -> Result<String, ListError> {
        let new = normalize(new);
        if new.is_empty() {
            return Err(ListError::EmptyText("the new item text"));
        }
        let idx = self.require(category)?;

        let cat = &mut self.categories[idx];
        let pos = cat
            .items
            .iter()
            .position(|i| i == old)
            .ok_or_else(|| ListError::ItemNotFound {
                category: cat.name.clone(),
                item: old.to_string(),
            })?;

        cat.items[pos] = new.clone();
        self.rebuild_index();
        Ok(new)
    }

    /// Drop every item in a category, keeping the category. Returns the count dropped.
    pub(crate) fn clear_items(&mut self, category: &str) -> Result<usize, ListError> {
        let idx = self.require(category)?;
        let dropped = self.categories[idx].items.len();
        self.categories[idx].items.clear();
        self.rebuild_index();
        Ok(dropped)
    }

    /// Swap in a whole new set of categories.
    pub(crate) fn replace_all(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.rebuild_index();
    }

    fn require(&self, category: &str) -> Result<usize, ListError> {
        self.find_category(category)
            .ok_or_else(|| ListError::CategoryNotFound(normalize(category)))
    }

    /// Rebuild the name index from scratch.
    fn rebuild_index(&mut self) {
        self.index = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
    }
}
