/// Input modes for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the funding amount
    Insert,
}
