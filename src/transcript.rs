/// Instruction turn prepended to every transcript. Never shown in the
/// rendered history.
pub const SYSTEM_PROMPT: &str = "You are a helpful, friendly assistant.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Ordered history of turns for one session.
///
/// The first turn is always the system instruction, and turns are only ever
/// appended. The transcript is owned by the application state and passed
/// explicitly to the completion client, there is no ambient session storage.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(system_prompt: &str) -> Self {
        let mut transcript = Self::default();
        transcript.seed(system_prompt);
        transcript
    }

    /// Seeds the system turn if the transcript is empty. A no-op on an
    /// already seeded transcript, so a transcript carries exactly one
    /// system turn no matter how often this is called.
    pub fn seed(&mut self, system_prompt: &str) {
        if self.turns.is_empty() {
            self.turns.push(Turn {
                role: Role::System,
                content: system_prompt.to_string(),
            });
        }
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
    }

    /// Full ordered turn list, system turn included. This is what gets sent
    /// to the completion endpoint.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns in chronological order with the system turn skipped. This is
    /// what the chat log renders.
    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| turn.role != Role::System)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_role(&self) -> Option<Role> {
        self.turns.last().map(|turn| turn.role)
    }

    /// Content of the most recent assistant turn, if any.
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_holds_only_the_system_turn() {
        let transcript = Transcript::new(SYSTEM_PROMPT);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last_role(), Some(Role::System));
        assert_eq!(transcript.turns()[0].content, SYSTEM_PROMPT);
    }

    #[test]
    fn seeding_twice_keeps_a_single_system_turn() {
        let mut transcript = Transcript::new(SYSTEM_PROMPT);
        transcript.seed(SYSTEM_PROMPT);
        let system_turns = transcript
            .turns()
            .iter()
            .filter(|turn| turn.role == Role::System)
            .count();
        assert_eq!(system_turns, 1);
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn answered_turns_alternate_after_the_system_turn() {
        let mut transcript = Transcript::new(SYSTEM_PROMPT);
        let n = 3;
        for i in 0..n {
            transcript.append(Role::User, format!("question {i}"));
            transcript.append(Role::Assistant, format!("answer {i}"));
        }
        assert_eq!(transcript.len(), 1 + 2 * n);
        for (i, turn) in transcript.turns().iter().skip(1).enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected);
        }
    }

    #[test]
    fn history_skips_the_system_turn_and_keeps_order() {
        let mut transcript = Transcript::new(SYSTEM_PROMPT);
        transcript.append(Role::User, "hello");
        transcript.append(Role::Assistant, "hi there");
        let history: Vec<_> = transcript.history().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn last_assistant_message_finds_the_most_recent_reply() {
        let mut transcript = Transcript::new(SYSTEM_PROMPT);
        assert_eq!(transcript.last_assistant_message(), None);
        transcript.append(Role::User, "one");
        transcript.append(Role::Assistant, "first");
        transcript.append(Role::User, "two");
        transcript.append(Role::Assistant, "second");
        assert_eq!(transcript.last_assistant_message(), Some("second"));
    }
}
