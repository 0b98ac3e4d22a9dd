use kis_core::control::SearchQuery;
use kis_store::models::SearchEnvelope;
use kis_store::schema::{
    CATEGORY_AUTH,
    CATEGORY_DOMESTIC_BOND,
    CATEGORY_DOMESTIC_FUTUREOPTION,
    CATEGORY_DOMESTIC_STOCK,
    CATEGORY_ELW,
    CATEGORY_ETFETN,
    CATEGORY_OVERSEAS_FUTUREOPTION,
    CATEGORY_OVERSEAS_STOCK,
    FIELD_API_NAME,
    FIELD_CATEGORY,
    FIELD_DESCRIPTION,
    FIELD_FUNCTION_NAME,
    FIELD_RESPONSE,
    FIELD_SUBCATEGORY,
};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{KisMcp, helpers};

/// Optional filters shared by every category search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchApiParams {
    /// The user's original question, verbatim. Logged only; never used as a filter.
    pub query: Option<String>,
    /// Subcategory inside the category, matched exactly (e.g. "기본시세", "실시간시세", "주문/계좌").
    pub subcategory: Option<String>,
    /// Fragment of the API display name, case-insensitive.
    pub api_name: Option<String>,
    /// Fragment of the example function name, case-insensitive.
    pub function_name: Option<String>,
    /// Fragment of the API description, case-insensitive.
    pub description: Option<String>,
    /// Fragment of the response field list, case-insensitive.
    pub response: Option<String>,
}

impl SearchApiParams {
    /// Builds the catalog query for `category`. Blank fields are dropped.
    #[must_use]
    pub fn into_query(self, category: &str) -> SearchQuery {
        SearchQuery::new()
            .with(FIELD_CATEGORY, category)
            .with_optional(FIELD_SUBCATEGORY, helpers::non_blank(self.subcategory))
            .with_optional(FIELD_API_NAME, helpers::non_blank(self.api_name))
            .with_optional(FIELD_FUNCTION_NAME, helpers::non_blank(self.function_name))
            .with_optional(FIELD_DESCRIPTION, helpers::non_blank(self.description))
            .with_optional(FIELD_RESPONSE, helpers::non_blank(self.response))
    }
}

impl KisMcp {
    /// Searches one category of the catalog with caller-supplied filters.
    pub(crate) fn search_category(&self, category: &str, params: SearchApiParams) -> SearchEnvelope {
        if let Some(question) = helpers::non_blank(params.query.clone()) {
            info!(category, query = %question, "api search");
        }
        self.searcher.search(&params.into_query(category))
    }
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl KisMcp {
    #[tool(description = "Search the authentication (auth) APIs. \
Examples: issue an access token -> subcategory=\"인증\", function_name=\"auth_token\"; \
websocket approval key -> subcategory=\"인증\", function_name=\"auth_ws_token\". \
With no filters, lists every API in the category.")]
    async fn search_auth_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_AUTH, params))
    }

    #[tool(description = "Search the domestic stock (domestic_stock) APIs. \
Subcategories: 기본시세, 순위분석, ELW시세, 업종/기타, 주문/계좌, 시세분석, 종목정보, 실시간시세. \
Examples: order book -> subcategory=\"기본시세\", function_name=\"inquire_asking_price_exp_ccn\"; \
market cap -> subcategory=\"기본시세\", response=\"HTS 시가총액\"; \
fluctuation ranking -> subcategory=\"순위분석\", function_name=\"fluctuation\"; \
account balance -> subcategory=\"주문/계좌\", function_name=\"inquire_balance\"; \
realtime trades -> subcategory=\"실시간시세\", function_name=\"ccnl_krx\". \
With no filters, lists every API in the category.")]
    async fn search_domestic_stock_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_DOMESTIC_STOCK, params))
    }

    #[tool(description = "Search the domestic bond (domestic_bond) APIs. \
Examples: issue info -> subcategory=\"기본시세\", function_name=\"issue_info\"; \
coupon rate -> subcategory=\"기본시세\", response=\"표면금리\"; \
bond balance -> subcategory=\"주문/계좌\", function_name=\"inquire_balance\"; \
realtime bond trades -> subcategory=\"실시간시세\", function_name=\"bond_ccnl\". \
With no filters, lists every API in the category.")]
    async fn search_domestic_bond_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_DOMESTIC_BOND, params))
    }

    #[tool(description = "Search the domestic futures and options (domestic_futureoption) APIs. \
Examples: quotes -> subcategory=\"기본시세\", function_name=\"inquire_asking_price\"; \
total assets -> subcategory=\"주문/계좌\", function_name=\"inquire_deposit\"; \
cash margin -> subcategory=\"주문/계좌\", response=\"현금증거금\"; \
realtime index futures -> subcategory=\"실시간시세\", function_name=\"index_futures_realtime_conclusion\". \
With no filters, lists every API in the category.")]
    async fn search_domestic_futureoption_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_DOMESTIC_FUTUREOPTION, params))
    }

    #[tool(description = "Search the overseas stock (overseas_stock) APIs. \
Examples: current price -> subcategory=\"기본시세\", function_name=\"price\"; \
daily chart -> subcategory=\"기본시세\", function_name=\"inquire_daily_chartprice\"; \
rights and dividends -> subcategory=\"시세분석\", function_name=\"rights_by_ice\"; \
balance -> subcategory=\"주문/계좌\", function_name=\"inquire_balance\"; \
delayed realtime quotes -> subcategory=\"실시간시세\", function_name=\"delayed_ccnl\". \
With no filters, lists every API in the category.")]
    async fn search_overseas_stock_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_OVERSEAS_STOCK, params))
    }

    #[tool(description = "Search the overseas futures and options (overseas_futureoption) APIs. \
Examples: futures price -> subcategory=\"기본시세\", function_name=\"inquire_price\"; \
tick size -> subcategory=\"기본시세\", response=\"호가단위\"; \
open positions -> subcategory=\"주문/계좌\", function_name=\"inquire_unpd\"; \
realtime trades -> subcategory=\"실시간시세\", function_name=\"ccnl\". \
With no filters, lists every API in the category.")]
    async fn search_overseas_futureoption_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_OVERSEAS_FUTUREOPTION, params))
    }

    #[tool(description = "Search the ELW (elw) APIs. \
Examples: volume ranking -> subcategory=\"ELW시세\", function_name=\"volume_rank\"; \
current price -> subcategory=\"ELW시세\", function_name=\"inquire_elw_price\"; \
days to expiry -> subcategory=\"ELW시세\", response=\"잔존일수\"; \
realtime trades -> subcategory=\"실시간시세\", function_name=\"elw_ccnl\". \
With no filters, lists every API in the category.")]
    async fn search_elw_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_ELW, params))
    }

    #[tool(description = "Search the ETF/ETN (etfetn) APIs. \
Examples: NAV trend -> subcategory=\"기본시세\", function_name=\"nav_comparison_trend\"; \
current price -> subcategory=\"기본시세\", api_name=\"ETF/ETN 현재가\"; \
fund size -> subcategory=\"기본시세\", response=\"설정액\"; \
realtime NAV -> subcategory=\"실시간시세\", function_name=\"etf_nav_trend\". \
With no filters, lists every API in the category.")]
    async fn search_etfetn_api(
        &self,
        Parameters(params): Parameters<SearchApiParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.search_category(CATEGORY_ETFETN, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kis_store::models::SearchStatus;

    use crate::test_support::service;

    #[test]
    fn no_filters_lists_the_category() {
        let envelope = service().search_category(CATEGORY_AUTH, SearchApiParams::default());

        assert_eq!(envelope.status, SearchStatus::Success);
        assert_eq!(envelope.total_count, 2);
        assert_eq!(envelope.message, "Found 2 APIs (2 unique)");
    }

    #[test]
    fn blank_filters_and_query_do_not_filter() {
        let params = SearchApiParams {
            query: Some("토큰 발급 방법".to_string()),
            subcategory: Some("   ".to_string()),
            function_name: Some(String::new()),
            ..SearchApiParams::default()
        };

        let envelope = service().search_category(CATEGORY_AUTH, params);

        assert_eq!(envelope.message, "Found 2 APIs (2 unique)");
        assert!(envelope.results.iter().all(|api| api.url_main.is_none()));
    }

    #[test]
    fn filters_switch_to_detail_results() {
        let params = SearchApiParams {
            subcategory: Some("기본시세".to_string()),
            response: Some("시가총액".to_string()),
            ..SearchApiParams::default()
        };

        let envelope = service().search_category(CATEGORY_DOMESTIC_STOCK, params);

        assert_eq!(envelope.total_count, 1);
        assert_eq!(envelope.results[0].function_name, "inquire_price");
        assert_eq!(envelope.results[0].url_main.as_deref(), Some(""));
    }

    #[test]
    fn category_is_pinned_by_the_tool() {
        let params = SearchApiParams {
            function_name: Some("volume_rank".to_string()),
            ..SearchApiParams::default()
        };

        let envelope = service().search_category(CATEGORY_DOMESTIC_STOCK, params);

        assert_eq!(envelope.status, SearchStatus::NoResults);
        assert_eq!(
            envelope.message,
            "No APIs found with conditions: {'category': 'domestic_stock', 'function_name': 'volume_rank'}"
        );
    }

    #[test]
    fn into_query_keeps_field_order() {
        let params = SearchApiParams {
            response: Some("PER".to_string()),
            subcategory: Some("기본시세".to_string()),
            ..SearchApiParams::default()
        };
        let query = params.into_query(CATEGORY_DOMESTIC_STOCK);
        let keys: Vec<&str> = query
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["category", "subcategory", "response"]);
    }
}
