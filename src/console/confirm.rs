use crate::error::ConsoleResult;
use crate::model::RecordId;

/// A destructive request waiting for the operator to type its phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    pub required_phrase: String,
    pub ids: Vec<RecordId>,
    pub input: String,
    /// Set when the last confirmed attempt failed at the store.
    pub error: Option<String>,
}

impl PendingDelete {
    /// Exact, case-sensitive comparison; nothing else enables the action.
    pub fn phrase_matches(&self) -> bool {
        self.input == self.required_phrase
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Closed,
    Open(PendingDelete),
    Confirming(PendingDelete),
}

/// Typed-phrase confirmation: `Closed -> Open -> Confirming -> Closed`.
///
/// The mutation callback passed to [`ConfirmationGate::confirm`] only ever runs from
/// `Confirming`, and `Confirming` is only entered when the typed input equals the phrase.
#[derive(Clone, Debug, Default)]
pub struct ConfirmationGate {
    state: GateState,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, GateState::Closed)
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        match &self.state {
            GateState::Closed => None,
            GateState::Open(p) | GateState::Confirming(p) => Some(p),
        }
    }

    /// Opens with an empty input. Reopening replaces any previous request.
    pub fn open(&mut self, required_phrase: &str, ids: Vec<RecordId>) {
        self.state = GateState::Open(PendingDelete {
            required_phrase: required_phrase.to_string(),
            ids,
            input: String::new(),
            error: None,
        });
    }

    pub fn set_input(&mut self, input: &str) {
        if let GateState::Open(p) = &mut self.state {
            p.input = input.to_string();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let GateState::Open(p) = &mut self.state {
            p.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let GateState::Open(p) = &mut self.state {
            p.input.pop();
        }
    }

    /// Whether the confirm action is enabled right now.
    pub fn can_confirm(&self) -> bool {
        matches!(&self.state, GateState::Open(p) if p.phrase_matches())
    }

    /// Operator dismissed the dialog.
    pub fn cancel(&mut self) {
        self.state = GateState::Closed;
    }

    /// Runs `apply` on the pending ids if, and only if, the typed phrase matches.
    ///
    /// Returns `None` when the gate was not confirmable (nothing ran). On success the gate
    /// closes; on failure it returns to `Open` with the error recorded and the input kept, so
    /// the operator can retry or cancel. Closing always discards the typed input.
    pub fn confirm<T>(
        &mut self,
        apply: impl FnOnce(&[RecordId]) -> ConsoleResult<T>,
    ) -> Option<ConsoleResult<T>> {
        if !self.can_confirm() {
            return None;
        }
        let GateState::Open(pending) = std::mem::take(&mut self.state) else {
            return None;
        };
        let ids = pending.ids.clone();
        self.state = GateState::Confirming(pending);

        let result = apply(&ids);

        // Only a failure reopens the gate.
        if let Err(err) = &result
            && let GateState::Confirming(mut pending) = std::mem::take(&mut self.state)
        {
            pending.error = Some(err.to_string());
            self.state = GateState::Open(pending);
        } else {
            self.state = GateState::Closed;
        }
        Some(result)
    }
}

#[cfg(test)]
#[path = "../tests/console/confirm_tests.rs"]
mod tests;
