pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Busy indicator shared by every async action
pub struct Spinner {
    pub message: String,
    pub frame: usize,
    pub spinning: bool,
}

impl Spinner {
    pub fn new(message: String) -> Self {
        Self {
            message,
            frame: 0,
            spinning: false,
        }
    }

    pub fn start(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.spinning = true;
    }

    pub fn stop(&mut self) {
        self.spinning = false;
        self.frame = 0;
    }

    pub fn tick(&mut self) {
        if self.spinning {
            self.frame = (self.frame + 1) % FRAMES.len();
        }
    }

    pub fn glyph(&self) -> &'static str {
        FRAMES[self.frame % FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_advances_while_spinning() {
        let mut spinner = Spinner::new(String::new());
        spinner.tick();
        assert_eq!(spinner.frame, 0);

        spinner.start("Fetching balance...");
        spinner.tick();
        spinner.tick();
        assert_eq!(spinner.frame, 2);
        assert_eq!(spinner.message, "Fetching balance...");

        spinner.stop();
        assert_eq!(spinner.frame, 0);
        assert!(!spinner.spinning);
    }
}
