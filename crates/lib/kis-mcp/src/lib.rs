//! MCP server implementation for the KIS API search server.
//!
//! This crate wires the catalog searcher and source fetcher into rmcp tool
//! handlers and exposes the stdio and streamable HTTP transports.

mod helpers;
mod tools;
pub mod server;

use kis_core::control::ApiSearcher;
use kis_core::source::SourceFetcher;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::search::SearchApiParams;
pub use tools::source::ReadSourceCodeParams;

const SERVER_INSTRUCTIONS: &str = r"kis-api-search indexes the Korea Investment & Securities (KIS) Open API examples.
If the user asks for stock market information, trading-related code, or investment data, ALWAYS
search here first. Do NOT write KIS API code without checking the search results.

Workflow:
1. Pick the category tool that matches the asset class:
   - `search_auth_api`, `search_domestic_stock_api`, `search_domestic_bond_api`,
     `search_domestic_futureoption_api`, `search_overseas_stock_api`,
     `search_overseas_futureoption_api`, `search_elw_api`, `search_etfetn_api`.
2. Narrow with `subcategory` (exact) and `function_name`, `api_name`, `description`, `response`
   (case-insensitive fragments). Pass the user's question as `query`; it is only logged.
3. Call `read_source_code` with `url_main` (and `url_chk`) from a hit to get the example code.

Notes:
- A call with no optional filters lists every API in the category, de-duplicated by `api_name`.
- Filtered searches return at most 10 rows; `total_count` always reports the full match count.
- `status` is `success`, `no_results`, or `error`. On `no_results`, retry with fewer or different filters.
- Use `help` and `search_guide` for detailed guidance. `health` returns `ok`.";

/// MCP server wrapper around the catalog searcher and source fetcher.
#[derive(Clone)]
pub struct KisMcp {
    tool_router: ToolRouter<Self>,
    searcher: ApiSearcher,
    fetcher: SourceFetcher,
}

impl KisMcp {
    #[must_use]
    pub fn new(searcher: ApiSearcher, fetcher: SourceFetcher) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_search()
            + Self::tool_router_source()
            + Self::tool_router_context();
        Self {
            tool_router,
            searcher,
            fetcher,
        }
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl KisMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for KisMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::test_support::service;

    #[test]
    fn router_exposes_every_tool() {
        let service = service();
        let names: HashSet<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        for expected in [
            "health",
            "help",
            "search_guide",
            "read_source_code",
            "search_auth_api",
            "search_domestic_stock_api",
            "search_domestic_bond_api",
            "search_domestic_futureoption_api",
            "search_overseas_stock_api",
            "search_overseas_futureoption_api",
            "search_elw_api",
            "search_etfetn_api",
        ] {
            assert!(names.contains(expected), "missing tool {expected}");
        }
    }
}
