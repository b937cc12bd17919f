use anyhow::Result;
use serde::Serialize;

use crate::journal::audit::AuditLog;
use crate::journal::message::ChatMessage;
use crate::journal::profile::UserProfile;
use crate::journal::warn;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 800;

pub const CLOSING_DISCLAIMER: &str = "Remember, this is not medical advice. Please consult a healthcare professional before making changes.";

const INSTRUCTIONS: &str = r#"
You are GutGuardian, a professional, empathetic AI expert in natural gut health.
You provide evidence-based suggestions on diet changes, herbal remedies, gentle exercises, lifestyle tips, and tests to discuss with a doctor.

Structure every response clearly and professionally:
1. **Issue Summary**
2. **Potential Triggers**
3. **Tailored Recommendations**
   - **Dietary Adjustments**
   - **Herbal Remedies** (e.g., peppermint, ginger, turmeric, fennel, slippery elm, chamomile, aloe vera — avoid if allergic)
   - **Exercises & Lifestyle**
   - **Suggested Tests** (to discuss with a doctor)
4. **Action Plan & Important Disclaimer**

Always end responses with: "Remember, this is not medical advice. Please consult a healthcare professional before making changes."

Be supportive and ask clarifying questions if needed.
"#;

/// Body of one chat completion call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

pub trait AdviceBackend {
    fn label(&self) -> &str;
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

pub fn profile_block(profile: &UserProfile) -> String {
    let age = profile
        .age()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Not provided".to_string());
    let allergies = profile.allergies().unwrap_or("None reported");
    format!(
        "\nUser Profile:\n- Age: {age}\n- Allergies: {allergies}\n\nIMPORTANT: \n- Avoid recommending anything the user is allergic to.\n- Adjust remedy strength/intensity based on age (gentler for children/elderly).\n- If age or allergies are unknown, give general safe advice.\n"
    )
}

pub fn system_prompt(profile: &UserProfile) -> String {
    let mut prompt = profile_block(profile);
    prompt.push_str(INSTRUCTIONS);
    prompt
}

/// System prompt first, then the caller's history as given, then the new input.
pub fn build_request(
    model: &str,
    user_input: &str,
    history: &[ChatMessage],
    profile: &UserProfile,
) -> CompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(profile)));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(user_input));
    CompletionRequest {
        model: model.to_string(),
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    }
}

pub fn apology(detail: &str) -> String {
    format!("Sorry, something went wrong: {detail}. Please try again.")
}

pub struct AdviceClient {
    backend: Box<dyn AdviceBackend>,
    model: String,
    audit: AuditLog,
}

impl AdviceClient {
    pub fn new(backend: Box<dyn AdviceBackend>, model: impl Into<String>, audit: AuditLog) -> Self {
        Self {
            backend,
            model: model.into(),
            audit,
        }
    }

    /// Never fails: remote errors come back as a displayable apology.
    pub fn advice(&self, user_input: &str, history: &[ChatMessage], profile: &UserProfile) -> String {
        let request = build_request(&self.model, user_input, history, profile);
        match self.backend.complete(&request) {
            Ok(text) => {
                self.audit.record(
                    "advice",
                    "ok",
                    &format!(
                        "provider={} model={} messages={} reply_chars={}",
                        self.backend.label(),
                        self.model,
                        request.messages.len(),
                        text.chars().count()
                    ),
                );
                text
            }
            Err(err) => {
                let detail = format!("{err:#}");
                warn::emit(
                    "ADVICE_FAILED",
                    "advice",
                    "apologize",
                    "remote completion call failed",
                    &detail,
                );
                self.audit.record(
                    "advice",
                    "error",
                    &format!("provider={} model={}", self.backend.label(), self.model),
                );
                apology(&detail)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{
        AdviceBackend, AdviceClient, CLOSING_DISCLAIMER, CompletionRequest, MAX_OUTPUT_TOKENS,
        TEMPERATURE, build_request, system_prompt,
    };
    use crate::journal::audit::AuditLog;
    use crate::journal::message::{ChatMessage, ChatRole};
    use crate::journal::profile::UserProfile;
    use anyhow::Result;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays canned replies and keeps every request it saw.
    pub(crate) struct ScriptedBackend {
        pub replies: RefCell<Vec<Result<String>>>,
        pub seen: Rc<RefCell<Vec<CompletionRequest>>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new(replies: Vec<Result<String>>) -> (Self, Rc<RefCell<Vec<CompletionRequest>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    replies: RefCell::new(replies),
                    seen: Rc::clone(&seen),
                },
                seen,
            )
        }
    }

    impl AdviceBackend for ScriptedBackend {
        fn label(&self) -> &str {
            "scripted"
        }

        fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.borrow_mut().push(request.clone());
            let mut replies = self.replies.borrow_mut();
            if replies.is_empty() {
                anyhow::bail!("no scripted reply left");
            }
            replies.remove(0)
        }
    }

    #[test]
    fn profile_defaults_when_fields_missing() {
        let prompt = system_prompt(&UserProfile::default());
        assert!(prompt.contains("- Age: Not provided"));
        assert!(prompt.contains("- Allergies: None reported"));
        assert!(prompt.contains("give general safe advice"));
    }

    #[test]
    fn profile_fields_are_embedded_when_known() {
        let profile = UserProfile::new(Some(72), Some(" chamomile ")).expect("profile");
        let prompt = system_prompt(&profile);
        assert!(prompt.contains("- Age: 72"));
        assert!(prompt.contains("- Allergies: chamomile\n"));
        assert!(prompt.contains("gentler for children/elderly"));
    }

    #[test]
    fn prompt_requires_four_sections_and_closing_disclaimer() {
        let prompt = system_prompt(&UserProfile::default());
        for section in [
            "1. **Issue Summary**",
            "2. **Potential Triggers**",
            "3. **Tailored Recommendations**",
            "**Dietary Adjustments**",
            "**Herbal Remedies**",
            "**Exercises & Lifestyle**",
            "**Suggested Tests**",
            "4. **Action Plan & Important Disclaimer**",
        ] {
            assert!(prompt.contains(section), "missing {section}");
        }
        assert!(prompt.contains(CLOSING_DISCLAIMER));
    }

    #[test]
    fn herbal_examples_keep_allergy_caveat_text() {
        let prompt = system_prompt(&UserProfile::default());
        assert!(prompt.contains("chamomile, aloe vera \u{2014} avoid if allergic)"));
    }

    #[test]
    fn request_orders_system_then_history_then_user() {
        let history = vec![
            ChatMessage::system("Recent User Logs (last 5 each):"),
            ChatMessage::assistant("Hi!"),
        ];
        let req = build_request("gpt-3.5-turbo", "bloated again", &history, &UserProfile::default());

        let roles: Vec<ChatRole> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::System,
                ChatRole::Assistant,
                ChatRole::User
            ]
        );
        assert!(req.messages[0].content.contains("User Profile:"));
        assert_eq!(req.messages[1].content, "Recent User Logs (last 5 each):");
        assert_eq!(req.messages[3].content, "bloated again");
        assert_eq!(req.temperature, TEMPERATURE);
        assert_eq!(req.max_tokens, MAX_OUTPUT_TOKENS);
        assert_eq!(req.model, "gpt-3.5-turbo");
    }

    #[test]
    fn request_serializes_to_chat_completions_shape() {
        let req = build_request("m", "hi", &[], &UserProfile::default());
        let raw = serde_json::to_value(&req).expect("serialize");
        assert_eq!(raw["model"], "m");
        assert_eq!(raw["temperature"], 0.7);
        assert_eq!(raw["max_tokens"], 800);
        assert_eq!(raw["messages"][1]["role"], "user");
    }

    #[test]
    fn success_returns_reply_verbatim() {
        let reply = "  1. **Issue Summary**\nRemedy: Ginger - Reason: settles stomach\n";
        let (backend, seen) = ScriptedBackend::new(vec![Ok(reply.to_string())]);
        let client = AdviceClient::new(Box::new(backend), "gpt-3.5-turbo", AuditLog::disabled());

        let got = client.advice("help", &[], &UserProfile::default());
        assert_eq!(got, reply);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn transport_failure_becomes_apology() {
        let (backend, _) = ScriptedBackend::new(vec![Err(anyhow::anyhow!(
            "error sending request: connection refused"
        ))]);
        let client = AdviceClient::new(Box::new(backend), "gpt-3.5-turbo", AuditLog::disabled());

        let got = client.advice("help", &[], &UserProfile::default());
        assert!(got.contains("Sorry, something went wrong"));
        assert!(got.contains("connection refused"));
        assert!(got.ends_with(". Please try again."));
    }
}
