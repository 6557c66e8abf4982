//! Logical input actions consumed by the simulation.
//!
//! Polling raw devices is the host's job; the host fills an [`InputState`]
//! once per frame and hands it to [`Session::run_frame`](crate::session::Session::run_frame).

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Edge-triggered: the host reports a fresh press, not a held key.
    Shoot,
    Restart,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    pub restart: bool,
}

impl InputState {
    pub fn is_active(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
            Action::Shoot => self.shoot,
            Action::Restart => self.restart,
        }
    }

    pub fn set(&mut self, action: Action, active: bool) {
        let slot = match action {
            Action::MoveLeft => &mut self.left,
            Action::MoveRight => &mut self.right,
            Action::Jump => &mut self.jump,
            Action::Shoot => &mut self.shoot,
            Action::Restart => &mut self.restart,
        };
        *slot = active;
    }

    /// Builder-style helper, mostly for tests and scripted input.
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }
}
