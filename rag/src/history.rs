use std::fmt;

/// Exchanges kept per session by default (40 turns).
pub const DEFAULT_HISTORY_EXCHANGES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Conversation memory for one chat session.
///
/// Turns are only ever added in (user, assistant) pairs, so the log always
/// starts with a user turn and alternates from there. Once it grows past the
/// limit the oldest pairs are dropped.
#[derive(Clone, Debug)]
pub struct Session {
    turns: Vec<Turn>,
    max_exchanges: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_EXCHANGES)
    }
}

impl Session {
    /// A session keeping at most `max_exchanges` pairs (at least one).
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_exchanges: max_exchanges.max(1),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Upper bound on stored turns.
    pub fn limit(&self) -> usize {
        self.max_exchanges * 2
    }

    /// The last `n` turns (fewer if the session is shorter), oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Records a completed exchange.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            text: question.into(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            text: answer.into(),
        });
        let limit = self.limit();
        if self.turns.len() > limit {
            let excess = self.turns.len() - limit;
            self.turns.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_alternates(session: &Session) {
        for (i, turn) in session.turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected, "turn {i} has the wrong role");
        }
    }

    #[test]
    fn length_is_bounded_by_forty() {
        let mut session = Session::default();
        for n in 1..=30 {
            session.record(format!("q{n}"), format!("a{n}"));
            assert_eq!(session.len(), (2 * n).min(40));
            assert_alternates(&session);
        }
    }

    #[test]
    fn keeps_most_recent_turns_in_order() {
        let mut session = Session::new(2);
        for n in 1..=5 {
            session.record(format!("q{n}"), format!("a{n}"));
        }
        let texts: Vec<&str> = session.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["q4", "a4", "q5", "a5"]);
    }

    #[test]
    fn recent_returns_tail() {
        let mut session = Session::default();
        assert!(session.recent(4).is_empty());

        session.record("q1", "a1");
        assert_eq!(session.recent(4).len(), 2);

        session.record("q2", "a2");
        session.record("q3", "a3");
        let recent = session.recent(4);
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].text, "q2");
        assert_eq!(recent[3].text, "a3");
    }

    #[test]
    fn zero_limit_still_keeps_last_exchange() {
        let mut session = Session::new(0);
        session.record("q1", "a1");
        session.record("q2", "a2");
        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].text, "q2");
    }
}
