//! System prompt assembly.
//!
//! The prompt is a fixed preamble, one directive per [`ChatMode`], then the
//! non-empty context lists.

use kino_core::session::{ChatMode, MessageContext};

const PREAMBLE: &str =
    "You are Kino AI, an AI-powered development assistant integrated into VS Code. ";

fn mode_directive(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Plan => {
            "You are in PLAN mode. Help the user plan and design solutions. Focus on breaking down problems into steps, creating specifications, and outlining implementation strategies."
        }
        ChatMode::Edit => {
            "You are in EDIT mode. Help the user edit and improve code. Focus on refactoring, optimizing, and implementing specific features based on the provided context."
        }
        ChatMode::Reasoning => {
            "You are in REASONING mode. Provide detailed analysis and reasoning. Focus on explaining concepts, debugging issues, and providing thorough explanations."
        }
        ChatMode::Chat => {
            "You are in CHAT mode. Provide helpful responses for general development questions and tasks."
        }
    }
}

pub fn build_system_prompt(mode: ChatMode, context: &MessageContext) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push_str(mode_directive(mode));

    let sections = [
        ("Available specifications:", &context.specs),
        ("Available hooks:", &context.hooks),
        ("Relevant files:", &context.files),
    ];
    for (heading, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        prompt.push_str("\n\n");
        prompt.push_str(heading);
        prompt.push('\n');
        prompt.push_str(&entries.join("\n"));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_mode_without_context() {
        let prompt = build_system_prompt(ChatMode::Chat, &MessageContext::default());
        assert_eq!(
            prompt,
            "You are Kino AI, an AI-powered development assistant integrated into VS Code. \
             You are in CHAT mode. Provide helpful responses for general development questions and tasks."
        );
    }

    #[test]
    fn test_each_mode_has_its_directive() {
        let empty = MessageContext::default();
        assert!(build_system_prompt(ChatMode::Plan, &empty).contains("PLAN mode"));
        assert!(build_system_prompt(ChatMode::Edit, &empty).contains("EDIT mode"));
        assert!(build_system_prompt(ChatMode::Reasoning, &empty).contains("REASONING mode"));
    }

    #[test]
    fn test_context_sections_skip_empty_lists() {
        let context = MessageContext {
            specs: vec!["auth".into(), "billing".into()],
            hooks: vec![],
            files: vec!["src/main.rs".into()],
        };

        let prompt = build_system_prompt(ChatMode::Edit, &context);

        assert!(prompt.contains("\n\nAvailable specifications:\nauth\nbilling"));
        assert!(!prompt.contains("Available hooks:"));
        assert!(prompt.ends_with("\n\nRelevant files:\nsrc/main.rs"));
    }
}
