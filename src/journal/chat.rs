use crate::journal::advice::AdviceClient;
use crate::journal::digest::build_digest;
use crate::journal::message::{ChatMessage, ChatRole};
use crate::journal::profile::UserProfile;
use crate::journal::remedy::{Remedy, extract_remedies};
use crate::journal::store::LogStore;

pub const GREETING: &str = "Hi! I'm GutGuardian 🌱\n\nUse the log commands (type /help) to record your daily food (with photos!), symptoms, exercise, water, and sleep. I'll analyze everything and suggest safe, natural remedies, especially herbs, with clear reasons and visuals.";

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub remedies: Vec<Remedy>,
}

/// Append-only transcript. The digest system message is rebuilt per turn and
/// never stored here.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Digest message followed by every stored message except the newest one.
    fn history_before_latest(&self, digest: String) -> Vec<ChatMessage> {
        let prior = &self.messages[..self.messages.len().saturating_sub(1)];
        let mut history = Vec::with_capacity(prior.len() + 1);
        history.push(ChatMessage::system(digest));
        history.extend(prior.iter().cloned());
        history
    }

    pub fn turn(
        &mut self,
        input: &str,
        logs: &LogStore,
        profile: &UserProfile,
        client: &AdviceClient,
    ) -> TurnOutcome {
        self.messages.push(ChatMessage::user(input));
        let history = self.history_before_latest(build_digest(logs));
        let reply = client.advice(input, &history, profile);
        self.messages.push(ChatMessage::assistant(reply.clone()));
        TurnOutcome {
            remedies: extract_remedies(&reply),
            reply,
        }
    }

    /// Cards for the newest assistant message, recomputed on every call.
    pub fn latest_remedies(&self) -> Vec<Remedy> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| extract_remedies(&m.content))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatSession, GREETING};
    use crate::journal::advice::AdviceClient;
    use crate::journal::advice::tests::ScriptedBackend;
    use crate::journal::audit::AuditLog;
    use crate::journal::message::ChatRole;
    use crate::journal::profile::UserProfile;
    use crate::journal::records::tests::at;
    use crate::journal::records::{LogRecord, SymptomEntry};
    use crate::journal::store::LogStore;

    #[test]
    fn starts_with_single_greeting() {
        let chat = ChatSession::new();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Assistant);
        assert_eq!(chat.messages()[0].content, GREETING);
        assert!(chat.latest_remedies().is_empty());
    }

    #[test]
    fn n_turns_leave_greeting_plus_alternating_pairs() {
        let (backend, _) = ScriptedBackend::new(vec![
            Ok("first".to_string()),
            Err(anyhow::anyhow!("rate limited")),
            Ok("third".to_string()),
        ]);
        let client = AdviceClient::new(Box::new(backend), "m", AuditLog::disabled());
        let logs = LogStore::new();
        let profile = UserProfile::default();
        let mut chat = ChatSession::new();

        for input in ["a", "b", "c"] {
            chat.turn(input, &logs, &profile, &client);
        }

        let messages = chat.messages();
        assert_eq!(messages.len(), 1 + 2 * 3);
        for (i, msg) in messages.iter().enumerate().skip(1) {
            let want = if i % 2 == 1 {
                ChatRole::User
            } else {
                ChatRole::Assistant
            };
            assert_eq!(msg.role, want, "message {i}");
        }
        assert!(messages[4].content.starts_with("Sorry, something went wrong"));
        assert!(messages.iter().all(|m| m.role != ChatRole::System));
    }

    #[test]
    fn history_sent_is_digest_then_prior_messages_without_new_input() {
        let (backend, seen) = ScriptedBackend::new(vec![Ok("ok".to_string()), Ok("ok".to_string())]);
        let client = AdviceClient::new(Box::new(backend), "m", AuditLog::disabled());
        let mut logs = LogStore::new();
        let profile = UserProfile::default();
        let mut chat = ChatSession::new();

        chat.turn("first question", &logs, &profile, &client);
        logs.append(LogRecord::Symptom(
            SymptomEntry::new(at(19, 8, 0), "Heartburn", 7, "").expect("symptom"),
        ));
        chat.turn("second question", &logs, &profile, &client);

        let seen = seen.borrow();
        let second = &seen[1].messages;
        // system prompt, digest, greeting, first q, first reply, second q
        assert_eq!(second.len(), 6);
        assert_eq!(second[1].role, ChatRole::System);
        assert!(second[1].content.contains("Heartburn (Severity 7/10)"));
        assert_eq!(second[2].content, GREETING);
        assert_eq!(second[3].content, "first question");
        assert_eq!(second[4].content, "ok");
        assert_eq!(second[5].content, "second question");
        assert_eq!(
            second.iter().filter(|m| m.content == "second question").count(),
            1
        );

        // digest is rebuilt per turn, so the first call saw no symptoms
        assert!(seen[0].messages[1].content.contains("Symptoms: None logged yet."));
    }

    #[test]
    fn turn_returns_extracted_remedies() {
        let reply = "Try these:\nRemedy: Ginger - Reason: settles stomach\nRemember, this is not medical advice.";
        let (backend, _) = ScriptedBackend::new(vec![Ok(reply.to_string())]);
        let client = AdviceClient::new(Box::new(backend), "m", AuditLog::disabled());
        let mut chat = ChatSession::new();

        let outcome = chat.turn("nausea", &LogStore::new(), &UserProfile::default(), &client);
        assert_eq!(outcome.reply, reply);
        assert_eq!(outcome.remedies.len(), 1);
        assert_eq!(outcome.remedies[0].name, "Ginger");
        assert_eq!(chat.latest_remedies(), outcome.remedies);
    }
}
