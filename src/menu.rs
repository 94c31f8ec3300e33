//! Menu state machine
//!
//! [`MenuModel`] is the only mutable state shared between the input
//! callbacks, the render loop and the action handler. It never does I/O;
//! callers hold the controller's state lock while they touch it.
//!
//! ```text
//! Menu --Up/Down--> Menu          (index wraps, dirty)
//! Menu --Select--> Selection      (action starts)
//! Selection --done--> Menu        (dirty)
//! Selection(exit item) --> exited (terminal, every later event ignored)
//! ```

use anyhow::{ensure, Result};

use crate::input::Button;

/// Which view owns the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Browsing the item list
    Menu,
    /// An item's action is being shown or performed
    Selection,
}

/// A confirmed choice, handed to the action handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub label: String,
    /// True for the reserved last item
    pub exit: bool,
}

/// What a button press did to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Highlight moved to the given index
    Moved(usize),
    /// An action must be started for this selection
    Select(Selection),
    /// Nothing changed
    Ignored,
}

/// Snapshot of everything needed to draw the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub items: Vec<String>,
    pub selected: usize,
}

#[derive(Debug)]
pub struct MenuModel {
    items: Vec<String>,
    selected: usize,
    screen: Screen,
    dirty: bool,
    action_in_progress: bool,
    exited: bool,
}

impl MenuModel {
    pub fn new(items: Vec<String>) -> Result<Self> {
        ensure!(!items.is_empty(), "menu needs at least one item");
        Ok(Self {
            items,
            selected: 0,
            screen: Screen::Menu,
            dirty: true,
            action_in_progress: false,
            exited: false,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn action_in_progress(&self) -> bool {
        self.action_in_progress
    }

    /// True once the exit item has been selected
    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Index of the reserved exit item
    pub fn exit_index(&self) -> usize {
        self.items.len() - 1
    }

    /// Apply one button press
    pub fn apply(&mut self, button: Button) -> Transition {
        if self.exited {
            return Transition::Ignored;
        }

        match button {
            // Navigation is modal: the action view owns the screen
            Button::Up | Button::Down if self.screen == Screen::Selection => Transition::Ignored,
            Button::Up => {
                let n = self.items.len();
                self.selected = (self.selected + n - 1) % n;
                self.dirty = true;
                Transition::Moved(self.selected)
            }
            Button::Down => {
                self.selected = (self.selected + 1) % self.items.len();
                self.dirty = true;
                Transition::Moved(self.selected)
            }
            Button::Left | Button::Right => Transition::Ignored,
            Button::Select => match self.begin_selection() {
                Some(selection) => Transition::Select(selection),
                None => Transition::Ignored,
            },
        }
    }

    /// Enter the selection screen unless an action is already running
    fn begin_selection(&mut self) -> Option<Selection> {
        if self.action_in_progress {
            return None;
        }

        let exit = self.selected == self.exit_index();
        self.action_in_progress = true;
        self.screen = Screen::Selection;
        self.exited = exit;

        Some(Selection {
            index: self.selected,
            label: self.items[self.selected].clone(),
            exit,
        })
    }

    /// Return to the menu after a non-exit action completed
    pub fn finish_selection(&mut self) {
        if self.exited || !self.action_in_progress {
            return;
        }
        self.action_in_progress = false;
        self.screen = Screen::Menu;
        self.dirty = true;
    }

    /// Clear the dirty flag and hand out a view, if the menu needs drawing
    pub fn take_menu_view(&mut self) -> Option<MenuView> {
        if !self.dirty || self.screen != Screen::Menu || self.exited {
            return None;
        }
        self.dirty = false;
        Some(self.view())
    }

    pub fn view(&self) -> MenuView {
        MenuView {
            items: self.items.clone(),
            selected: self.selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn model() -> MenuModel {
        MenuModel::new(config::menu_items()).unwrap()
    }

    fn model_at(index: usize) -> MenuModel {
        let mut m = model();
        for _ in 0..index {
            m.apply(Button::Down);
        }
        m.take_menu_view();
        m
    }

    #[test]
    fn starts_on_first_item_and_dirty() {
        let m = model();
        assert_eq!(m.selected(), 0);
        assert_eq!(m.screen(), Screen::Menu);
        assert!(m.is_dirty());
        assert!(!m.action_in_progress());
        assert!(!m.is_exited());
    }

    #[test]
    fn empty_menu_is_rejected() {
        assert!(MenuModel::new(Vec::new()).is_err());
    }

    #[test]
    fn up_from_first_wraps_to_last() {
        let mut m = model();
        assert_eq!(m.apply(Button::Up), Transition::Moved(4));
        assert_eq!(m.selected(), 4);
    }

    #[test]
    fn down_from_last_wraps_to_first() {
        let mut m = model_at(3);
        assert_eq!(m.apply(Button::Down), Transition::Moved(4));
        assert_eq!(m.apply(Button::Down), Transition::Moved(0));
    }

    #[test]
    fn moving_marks_dirty() {
        let mut m = model();
        assert!(m.take_menu_view().is_some());
        assert!(!m.is_dirty());
        m.apply(Button::Down);
        assert!(m.is_dirty());
        m.take_menu_view();
        m.apply(Button::Up);
        assert!(m.is_dirty());
    }

    #[test]
    fn take_menu_view_clears_dirty_once() {
        let mut m = model();
        let view = m.take_menu_view().unwrap();
        assert_eq!(view.selected, 0);
        assert_eq!(view.items.len(), 5);
        assert!(!m.is_dirty());
        assert_eq!(m.take_menu_view(), None);
    }

    #[test]
    fn left_and_right_are_reserved() {
        let mut m = model_at(2);
        assert_eq!(m.apply(Button::Left), Transition::Ignored);
        assert_eq!(m.apply(Button::Right), Transition::Ignored);
        assert_eq!(m.selected(), 2);
        assert!(!m.is_dirty());
    }

    #[test]
    fn single_item_menu_stays_in_range() {
        let mut m = MenuModel::new(vec!["Exit".to_string()]).unwrap();
        assert_eq!(m.apply(Button::Up), Transition::Moved(0));
        assert_eq!(m.apply(Button::Down), Transition::Moved(0));
    }

    #[test]
    fn select_enters_selection_screen() {
        let mut m = model_at(1);
        let transition = m.apply(Button::Select);
        assert_eq!(
            transition,
            Transition::Select(Selection {
                index: 1,
                label: "Option 2 - Do something else".to_string(),
                exit: false,
            })
        );
        assert_eq!(m.screen(), Screen::Selection);
        assert!(m.action_in_progress());
        assert_eq!(m.take_menu_view(), None);
    }

    #[test]
    fn second_select_is_rejected_while_action_runs() {
        let mut m = model();
        assert!(matches!(m.apply(Button::Select), Transition::Select(_)));
        assert_eq!(m.apply(Button::Select), Transition::Ignored);
    }

    #[test]
    fn navigation_is_ignored_during_selection() {
        let mut m = model_at(2);
        m.apply(Button::Select);
        assert_eq!(m.apply(Button::Down), Transition::Ignored);
        assert_eq!(m.apply(Button::Up), Transition::Ignored);
        assert_eq!(m.selected(), 2);
    }

    #[test]
    fn finishing_returns_to_dirty_menu() {
        let mut m = model_at(2);
        m.apply(Button::Select);
        m.finish_selection();
        assert_eq!(m.screen(), Screen::Menu);
        assert!(m.is_dirty());
        assert!(!m.action_in_progress());
        assert_eq!(m.take_menu_view().map(|v| v.selected), Some(2));
        assert!(matches!(m.apply(Button::Select), Transition::Select(_)));
    }

    #[test]
    fn finish_without_action_is_a_no_op() {
        let mut m = model();
        m.take_menu_view();
        m.finish_selection();
        assert!(!m.is_dirty());
    }

    #[test]
    fn exit_item_is_terminal() {
        let mut m = model_at(4);
        match m.apply(Button::Select) {
            Transition::Select(selection) => {
                assert!(selection.exit);
                assert_eq!(selection.index, 4);
            }
            other => panic!("expected selection, got {:?}", other),
        }
        assert!(m.is_exited());

        for button in Button::ALL {
            assert_eq!(m.apply(button), Transition::Ignored);
        }
        m.finish_selection();
        assert_eq!(m.screen(), Screen::Selection);
        assert_eq!(m.selected(), 4);
        assert_eq!(m.take_menu_view(), None);
    }
}
