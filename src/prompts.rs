//! System prompts for prefix-to-slash command conversion.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the conversion behaviour (e.g.
//!    tightening the output rules or adding a framework hint) requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect prompts directly
//!    without a live completion service, making prompt regressions easy to
//!    catch.
//!
//! Callers can override the default via
//! [`crate::config::ConversionConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

/// Default system prompt for converting a prefix-command module to a
/// slash-command module.
///
/// This prompt is used when `ConversionConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert Discord bot developer. Your task is to convert a prefix-command module into the equivalent slash-command module.

Follow these rules precisely:

1. BEHAVIOUR PRESERVATION
   - Preserve the command's behaviour, permissions checks, and replies exactly
   - Keep the same command name, lower-cased to satisfy slash-command naming rules
   - Carry over aliases as a comment; slash commands have no alias mechanism

2. STRUCTURE
   - Build the command definition with SlashCommandBuilder (or the framework's
     native builder if the file clearly uses another framework)
   - Convert positional message arguments to typed slash-command options with
     sensible names, descriptions, and required flags
   - Replace message-based replies (message.reply, message.channel.send) with
     interaction replies (interaction.reply, interaction.followUp)
   - Use deferReply when the original command performs slow work before replying

3. WHAT TO KEEP
   - All imports that are still needed, updated to their interaction-based
     equivalents
   - Error handling, cooldown logic, and permission gates
   - Existing comments that still apply

4. OUTPUT FORMAT
   - Output ONLY the converted source code
   - Do NOT wrap the code in markdown fences
   - Do NOT add commentary, explanations, or usage notes
   - Start directly with the first line of code"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_forbids_fences_and_commentary() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("ONLY the converted source code"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("Do NOT wrap"));
    }

    #[test]
    fn default_prompt_mentions_slash_conversion() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("slash-command"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("prefix-command"));
    }
}
