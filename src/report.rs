//! Plain-text reports of the store.

use crate::types::Category;

const SEPARATOR: &str = "=============";

/// Bullet list of a category's items, or "No items yet.".
pub fn render_items(category: &Category) -> String {
    if category.items.is_empty() {
        return "No items yet.".to_string();
    }
    category.items.iter().map(|item| format!("- {}\n", item)).collect()
}

/// Every category with its items, separated by rules.
pub fn render_all(categories: &[Category]) -> String {
    let mut out = String::new();
    for category in categories {
        out.push_str(&format!("[{}]\n", category.name));
        out.push_str(&render_items(category));
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_items() {
        assert_eq!(render_items(&Category::new("Empty")), "No items yet.");
        assert_eq!(
            render_items(&Category::with_items("F", ["Apple", "Pear"])),
            "- Apple\n- Pear\n"
        );
    }

    #[test]
    fn test_render_all() {
        let text = render_all(&[Category::with_items("F", ["Apple"]), Category::new("V")]);
        assert_eq!(text, "[F]\n- Apple\n\n=============\n[V]\nNo items yet.\n=============\n");
        assert_eq!(render_all(&[]), "");
    }
}
