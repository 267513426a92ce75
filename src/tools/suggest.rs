//! Keyword suggestions
//!
//! Implements the `suggest_terms(term, limit)` tool: synonym-table keys whose
//! key or related terms contain the partial input.

use crate::cli::SuggestArgs;
use crate::error::{validate_query, AppError};
use crate::mcp::{McpResponse, ServerContext, ToolResult};
use crate::search::{SynonymTable, DEFAULT_SUGGESTION_LIMIT};
use serde_json::Value;

/// Largest limit accepted from callers
const MAX_SUGGESTIONS: usize = 50;

/// Shared implementation (used by server and CLI)
pub fn execute_suggest(args: &SuggestArgs, table: &SynonymTable) -> Result<ToolResult, AppError> {
    validate_query(&args.term)?;

    let limit = args
        .limit
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
        .clamp(1, MAX_SUGGESTIONS);
    let suggestions = table.suggest(&args.term, limit);

    if suggestions.is_empty() {
        return Ok(ToolResult::text(format!(
            "No suggestions for \"{}\".",
            args.term.trim()
        )));
    }

    let mut md = format!("Suggestions for \"{}\":\n", args.term.trim());
    for suggestion in &suggestions {
        md.push_str(&format!("- {}\n", suggestion));
    }
    Ok(ToolResult::text(md))
}

/// Handle suggest_terms tool call (server)
pub async fn handle_suggest(id: Option<Value>, args: Value, context: &ServerContext) -> McpResponse {
    McpResponse::from_tool_result(id, handle_suggest_impl(args, context))
}

fn handle_suggest_impl(args: Value, context: &ServerContext) -> Result<ToolResult, AppError> {
    let suggest_args: SuggestArgs = serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))?;
    execute_suggest(&suggest_args, context.synonyms())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(term: &str, limit: Option<usize>) -> SuggestArgs {
        SuggestArgs {
            term: term.to_string(),
            limit,
        }
    }

    #[test]
    fn test_suggest_builtin() {
        let result = execute_suggest(&args("Snork", None), &SynonymTable::builtin()).unwrap();
        let text = &result.content[0].text;
        assert!(text.starts_with("Suggestions for \"Snork\""));
        assert!(text.contains("- snorkel\n"));
        assert!(text.lines().filter(|l| l.starts_with("- ")).count() <= DEFAULT_SUGGESTION_LIMIT);
    }

    #[test]
    fn test_suggest_limit() {
        let result = execute_suggest(&args("a", Some(2)), &SynonymTable::builtin()).unwrap();
        let count = result.content[0].text.lines().filter(|l| l.starts_with("- ")).count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_suggest_nothing() {
        let result = execute_suggest(&args("qqqzzz", None), &SynonymTable::builtin()).unwrap();
        assert!(result.content[0].text.starts_with("No suggestions"));
    }

    #[test]
    fn test_suggest_rejects_long_term() {
        let long = "x".repeat(501);
        assert!(execute_suggest(&args(&long, None), &SynonymTable::builtin()).is_err());
    }
}
