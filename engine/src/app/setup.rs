//! Player setup form shown before a game starts.

use fortuna_types::{MAX_NAME_LEN, MAX_PLAYERS, PlayerRoster, RosterError};

const DEFAULT_PLAYER_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    player_count: usize,
    names: [String; MAX_PLAYERS],
    focused: usize,
    error: Option<String>,
}

impl SetupForm {
    /// A form prefilled from configured names. No names means two empty
    /// seats.
    #[must_use]
    pub fn new(prefill: &[String]) -> Self {
        let mut names: [String; MAX_PLAYERS] = Default::default();
        for (slot, name) in names.iter_mut().zip(prefill) {
            slot.clone_from(name);
        }
        let player_count = match prefill.len() {
            0 => DEFAULT_PLAYER_COUNT,
            n => n.min(MAX_PLAYERS),
        };
        Self {
            player_count,
            names,
            focused: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Names of the active seats, as typed.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names[..self.player_count]
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn add_player(&mut self) {
        if self.player_count < MAX_PLAYERS {
            self.player_count += 1;
            self.error = None;
        }
    }

    pub fn remove_player(&mut self) {
        if self.player_count > 1 {
            self.player_count -= 1;
            self.focused = self.focused.min(self.player_count - 1);
            self.error = None;
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.player_count;
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.player_count - 1) % self.player_count;
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let name = &mut self.names[self.focused];
        if name.chars().count() < MAX_NAME_LEN {
            name.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        self.names[self.focused].pop();
        self.error = None;
    }

    /// Validate the active seats. On failure the error is kept for display.
    pub fn submit(&mut self) -> Result<PlayerRoster, RosterError> {
        PlayerRoster::new(self.names()).inspect_err(|err| self.error = Some(err.to_string()))
    }
}

impl Default for SetupForm {
    fn default() -> Self {
        Self::new(&[])
    }
}
