//! Persona instructions handed to the dialogue engine.

use friday_rs_config::AssistantConfig;
use friday_rs_memory::MemoryDocument;
use friday_rs_protocol::ToolDescriptor;

/// Opening line spoken at the start of every session.
pub const GREETING: &str = "Hi my name is Friday, your personal assistant, how may I help you?";

/// Number of recent exchanges summarized in the memory section.
const RECENT_CONVERSATIONS: usize = 5;

const SPECIFICS: &str = "## Specifics\n\n\
- Speak like a classy butler, with a dry, sarcastic edge.\n\
- Answer in one sentence.\n\
- When asked to do something, acknowledge it first (\"Will do, Sir\", \"Yes Boss\", \"Check!\"), \
then say what you did in one short sentence.\n\
- Use the memory capabilities to store preferences and tasks the user mentions, \
and recall them before asking the user to repeat themselves.\n\
- Every capability answers with a single line of text; if it reports a failure, \
tell the user plainly instead of retrying blindly.";

/// Build the system instructions for a session.
///
/// Sections: persona, specifics, the capabilities in `tools`, memory, then any
/// additional instructions from config. Pass the session's registered tools so
/// denied capabilities are never advertised.
pub fn build_instructions(
    config: &AssistantConfig,
    memory: &MemoryDocument,
    tools: &[ToolDescriptor],
) -> String {
    let mut sections = vec![
        format!(
            "# Persona\n\nYou are a personal assistant called {}, similar to the AI from the movie Iron Man. \
You run on the user's Linux desktop and can act on it through the capabilities below.",
            config.name
        ),
        SPECIFICS.to_string(),
        capabilities_section(tools),
        memory_section(memory),
    ];
    if let Some(extra) = config
        .additional_instruction_prompt
        .as_deref()
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
    {
        sections.push(format!("## Additional Instructions\n\n{extra}"));
    }
    sections.join("\n\n")
}

/// Instruction for the first turn: use tools when needed and greet the user.
pub fn session_instruction(name: &str) -> String {
    let greeting = GREETING.replacen("Friday", name, 1);
    format!(
        "# Task\n\nProvide assistance by using the tools that you have access to when needed.\n\
Begin the conversation by saying: \"{greeting}\""
    )
}

fn capabilities_section(tools: &[ToolDescriptor]) -> String {
    let mut section = "## Capabilities\n".to_string();
    for tool in tools {
        section.push_str(&format!("\n- {}: {}", tool.name, tool.description));
    }
    section
}

fn memory_section(memory: &MemoryDocument) -> String {
    let mut lines = Vec::new();
    for (key, value) in &memory.user_preferences {
        lines.push(format!("- Preference {key}: {value}"));
    }
    for task in memory.tasks.iter().filter(|task| !task.completed) {
        lines.push(format!("- Open task: {}", task.task));
    }
    let skip = memory
        .conversations
        .len()
        .saturating_sub(RECENT_CONVERSATIONS);
    for record in memory.conversations.iter().skip(skip) {
        lines.push(format!(
            "- {} user said \"{}\"; you answered \"{}\"",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.user,
            record.assistant
        ));
    }
    if lines.is_empty() {
        "## Memory\n\nNothing stored yet.".to_string()
    } else {
        format!("## Memory\n\n{}", lines.join("\n"))
    }
}
