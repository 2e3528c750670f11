//! Prompt assembly: system instruction, tool guide, synthetic turns.

use serde_json::Value;
use webpilot_core_types::ToolResult;

use crate::config::SessionConfig;

/// Base system instruction when the host supplies none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are WebPilot, an AI copilot for the active web page. \
Use markdown for formatting. Be brief but precise.";

/// Tool contract injected while the depth budget allows further calls.
pub const TOOL_GUIDE: &str = r##"## WEB CONTROL TOOLS AVAILABLE
You have access to the active browser page. To use a tool, output a SINGLE JSON block strictly following this format:
```json
{
  "tool": "tool_name",
  "params": { "param1": "value" }
}
```
Stop generating after the JSON block. Wait for the tool result.

### Available tools:
1. **read_page**: Get the text content of the page.
   - Params: {"mode": "text" | "html"} (optional, default "text")
2. **click_element**: Click an element using a CSS selector.
   - Params: {"selector": ".my-button"}
   - Blocked on sensitive sites (banking, login, admin).
3. **type_text**: Type text into an input field.
   - Params: {"selector": "#search-box", "text": "hello world"}
   - Blocked on password fields and sensitive sites.
4. **scroll**: Scroll the page.
   - Params: {"direction": "up" | "down" | "top" | "bottom"}
5. **get_links**: Extract all links from the page.
   - Params: {}
6. **google_search**: Perform a Google search.
   - Params: {"query": "search term"}

## SECURITY RULES
- NEVER interact with password fields, payment forms, or banking sites.
- If the user asks to act on a sensitive site, explain what they should do manually instead.

## INSTRUCTIONS
- If the user asks to summarize or read the page, use 'read_page' first.
- If the user asks to search the web or find information, use 'google_search'.
- Verify an element exists by reading the page first, or just try the action (errors are reported back)."##;

/// Appended instead of the tool guide when the previous model call was
/// followed by a tool execution.
const FOLLOW_UP_INSTRUCTION: &str = "[IMPORTANT] You have already used a tool and received the \
result below. Do NOT call any more tools. Use the tool result to answer the user's original \
question directly. Respond in a natural, helpful way.";

/// Assemble the per-request system instruction.
pub fn build_system_instruction(
    config: &SessionConfig,
    can_use_tool: bool,
    is_follow_up: bool,
) -> String {
    let mut instruction = config.system_prompt.clone();

    if let Some(custom) = &config.custom_instructions {
        instruction.push_str("\n\n[USER INSTRUCTIONS & PREFERENCES]\n");
        instruction.push_str(custom);
    }
    if let Some(style) = &config.response_style {
        instruction.push_str(&format!("\n\n[RESPONSE STYLE]\nUse a {style} tone/style."));
    }

    if is_follow_up {
        instruction.push_str("\n\n");
        instruction.push_str(FOLLOW_UP_INSTRUCTION);
    } else if can_use_tool {
        instruction.push_str("\n\n");
        instruction.push_str(TOOL_GUIDE);
    }

    instruction
}

/// Serialize a tool outcome into the synthetic turn fed back to the
/// model, with the anti-recursion instruction attached.
pub fn tool_result_message(tool: &str, result: &ToolResult) -> String {
    let payload = match &result.result {
        Some(value) => value.clone(),
        None => serde_json::to_value(result).unwrap_or(Value::Null),
    };
    let pretty = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    format!(
        "[TOOL RESULT for '{tool}']:\n{pretty}\n\n[INSTRUCTION] Now use this information to \
         respond to the user's original request. Do NOT call any more tools."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_guide_injected_only_while_depth_allows() {
        let config = SessionConfig::default();
        let fresh = build_system_instruction(&config, true, false);
        assert!(fresh.contains("WEB CONTROL TOOLS"));

        let exhausted = build_system_instruction(&config, false, false);
        assert!(!exhausted.contains("WEB CONTROL TOOLS"));
    }

    #[test]
    fn follow_up_forbids_further_tools() {
        let config = SessionConfig::default();
        let instruction = build_system_instruction(&config, true, true);
        assert!(instruction.contains("Do NOT call any more tools"));
        assert!(!instruction.contains("WEB CONTROL TOOLS"));
    }

    #[test]
    fn custom_instructions_and_style_are_appended() {
        let config = SessionConfig {
            custom_instructions: Some("Always answer in Spanish.".into()),
            response_style: Some("concise".into()),
            ..Default::default()
        };
        let instruction = build_system_instruction(&config, false, false);
        assert!(instruction.contains("Always answer in Spanish."));
        assert!(instruction.contains("concise tone/style"));
    }

    #[test]
    fn tool_result_message_carries_payload_and_instruction() {
        let result = ToolResult::ok(json!("page text here"));
        let message = tool_result_message("read_page", &result);
        assert!(message.starts_with("[TOOL RESULT for 'read_page']"));
        assert!(message.contains("page text here"));
        assert!(message.contains("Do NOT call any more tools"));
    }

    #[test]
    fn failed_result_serializes_the_error_shape() {
        let result = ToolResult::failure("element not found: #x");
        let message = tool_result_message("click_element", &result);
        assert!(message.contains("element not found"));
        assert!(message.contains("\"success\": false"));
    }
}
