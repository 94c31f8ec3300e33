//! Types for input handling

/// Button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Select,
}

impl Button {
    /// Every button, in board order
    pub const ALL: [Button; 5] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Select,
    ];
}

/// Events delivered by an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A confirmed press of one button
    Pressed(Button),
    /// The user asked to quit from the keyboard (Ctrl+C in raw mode)
    Interrupt,
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Button::Up => write!(f, "Up"),
            Button::Down => write!(f, "Down"),
            Button::Left => write!(f, "Left"),
            Button::Right => write!(f, "Right"),
            Button::Select => write!(f, "Select"),
        }
    }
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputEvent::Pressed(btn) => write!(f, "{} pressed", btn),
            InputEvent::Interrupt => write!(f, "Interrupt"),
        }
    }
}
