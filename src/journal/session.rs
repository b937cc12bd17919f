use crate::journal::advice::AdviceClient;
use crate::journal::chat::{ChatSession, TurnOutcome};
use crate::journal::digest::build_digest;
use crate::journal::profile::UserProfile;
use crate::journal::records::{LogCategory, LogRecord};
use crate::journal::store::LogStore;

/// Everything one user session owns. Nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct JournalSession {
    logs: LogStore,
    profile: UserProfile,
    chat: ChatSession,
}

impl JournalSession {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            logs: LogStore::new(),
            profile,
            chat: ChatSession::new(),
        }
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn log(&mut self, record: LogRecord) -> LogCategory {
        let category = record.category();
        self.logs.append(record);
        category
    }

    pub fn digest(&self) -> String {
        build_digest(&self.logs)
    }

    pub fn ask(&mut self, input: &str, client: &AdviceClient) -> TurnOutcome {
        self.chat.turn(input, &self.logs, &self.profile, client)
    }
}

#[cfg(test)]
mod tests {
    use super::JournalSession;
    use crate::journal::advice::AdviceClient;
    use crate::journal::advice::tests::ScriptedBackend;
    use crate::journal::audit::AuditLog;
    use crate::journal::profile::UserProfile;
    use crate::journal::records::tests::at;
    use crate::journal::records::{LogCategory, LogRecord, SymptomEntry};

    #[test]
    fn logged_symptom_reaches_the_next_request_with_profile() {
        let (backend, seen) = ScriptedBackend::new(vec![Ok("Remedy: Ginger - Reason: calms nausea".to_string())]);
        let client = AdviceClient::new(Box::new(backend), "m", AuditLog::disabled());
        let profile = UserProfile::new(Some(8), Some("ginger")).expect("profile");
        let mut session = JournalSession::new(profile);

        let category = session.log(LogRecord::Symptom(
            SymptomEntry::new(at(19, 8, 0), "Nausea", 7, "morning").expect("symptom"),
        ));
        assert_eq!(category, LogCategory::Symptom);
        assert!(session.digest().contains("Severity 7/10"));

        let outcome = session.ask("what helps?", &client);
        assert_eq!(outcome.remedies.len(), 1);
        assert_eq!(session.chat().messages().len(), 3);

        let seen = seen.borrow();
        let messages = &seen[0].messages;
        assert!(messages[0].content.contains("- Age: 8"));
        assert!(messages[0].content.contains("- Allergies: ginger"));
        assert!(messages[1].content.contains("Nausea (Severity 7/10) — morning"));
    }

    #[test]
    fn profile_changes_apply_to_later_turns() {
        let (backend, seen) =
            ScriptedBackend::new(vec![Ok("one".to_string()), Ok("two".to_string())]);
        let client = AdviceClient::new(Box::new(backend), "m", AuditLog::disabled());
        let mut session = JournalSession::default();

        session.ask("first", &client);
        session.profile_mut().set_allergies(Some("dairy"));
        session.ask("second", &client);

        let seen = seen.borrow();
        assert!(seen[0].messages[0].content.contains("- Allergies: None reported"));
        assert!(seen[1].messages[0].content.contains("- Allergies: dairy"));
    }
}
