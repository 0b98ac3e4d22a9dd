use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::KisMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the MCP commands of this server.".to_string(),
                "search_guide - How to pick a category tool and narrow a search.".to_string(),
                "health - Returns 'ok' when the server is up.".to_string(),
                "search_auth_api - Search access token and websocket key APIs.".to_string(),
                "search_domestic_stock_api - Search domestic stock APIs.".to_string(),
                "search_domestic_bond_api - Search domestic bond APIs.".to_string(),
                "search_domestic_futureoption_api - Search domestic futures and options APIs."
                    .to_string(),
                "search_overseas_stock_api - Search overseas stock APIs.".to_string(),
                "search_overseas_futureoption_api - Search overseas futures and options APIs."
                    .to_string(),
                "search_elw_api - Search ELW APIs.".to_string(),
                "search_etfetn_api - Search ETF/ETN APIs.".to_string(),
                "read_source_code - Fetch the example code behind a search result.".to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl KisMcp {
    #[tool(description = "List the MCP commands to get context with how this MCP server works.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }

    #[tool(description = "Explains how catalog searches match and how results are shaped.")]
    async fn search_guide(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
r#"
1.  Every search tool pins `category`. Choose by asset class:
        auth, domestic_stock, domestic_bond, domestic_futureoption,
        overseas_stock, overseas_futureoption, elw, etfetn.
2.  Optional filters, all combined with AND:
        - subcategory: exact match, e.g. "기본시세", "주문/계좌", "실시간시세".
        - function_name, api_name, description, response: case-insensitive fragments.
        - query: the user's question. Logged only, never filtered on.
    Empty or whitespace-only filters are ignored.
3.  Result shapes:
        - No optional filters: every API in the category, one row per api_name,
          without URLs. Message: "Found N APIs (U unique)".
        - Any filter: at most 10 rows with url_main and url_chk, in catalog order.
          Message: "Found N APIs" or "Found N APIs (showing first 10)".
        - Nothing matched: status "no_results" with the conditions echoed back.
4.  Prefer narrow queries. Search `response` for a field name such as "PER" or
    "시가총액" when the user asks for a specific value.
5.  Call `read_source_code` with url_main and url_chk from a result before writing code.
"#
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_search_tool() {
        let help = HelpCommands::default();
        let searches = help
            .commands
            .iter()
            .filter(|command| command.starts_with("search_") && command.contains("_api "))
            .count();
        assert_eq!(searches, 8);
        assert!(help.commands.iter().any(|command| command.starts_with("read_source_code")));
    }
}
