//! Text content shared by every sink

use crate::config::{SELECTED_MARKER, UNSELECTED_MARKER};
use crate::menu::MenuView;

/// Heading of the selection screen
pub const SELECTED_TITLE: &str = "You selected:";

/// Placeholder line shown while a stub action runs
pub const ACTION_PENDING: &str = "Performing action... (stub)";

/// Farewell text
pub const EXITING: &str = "Exiting...";

/// One line per item, the highlighted one prefixed with the marker
pub fn menu_lines(view: &MenuView) -> Vec<String> {
    view.items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let prefix = if i == view.selected {
                SELECTED_MARKER
            } else {
                UNSELECTED_MARKER
            };
            format!("{}{}", prefix, item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_selected_item_is_marked() {
        let view = MenuView {
            items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            selected: 1,
        };
        assert_eq!(menu_lines(&view), vec!["  a", "> b", "  c"]);
    }
}
