use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{KisMcp, helpers};

/// Catalog URLs of the example to fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ReadSourceCodeParams {
    /// `url_main` from a search result, e.g.
    /// `https://github.com/koreainvestment/open-trading-api/blob/main/examples_llm/domestic_stock/inquire_price/inquire_price.py`.
    pub url_main: String,
    /// `url_chk` from the same search result. Optional.
    pub url_chk: Option<String>,
}

#[tool_router(router = tool_router_source, vis = "pub")]
impl KisMcp {
    #[tool(description = "Read the example source code of a KIS API found by a search tool. \
Pass `url_main` (and optionally `url_chk`) exactly as returned in the search results. \
Returns the implementation file and its runnable check script with a per-file status; \
the overall status is success, partial_success, or error.")]
    async fn read_source_code(
        &self,
        Parameters(params): Parameters<ReadSourceCodeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .fetcher
            .fetch(Some(params.url_main.as_str()), params.url_chk.as_deref())
            .await;
        helpers::json_result(report)
    }
}
