use serde::{Deserialize, Serialize};

use crate::{Error, FamRankService, Result, ResultSource};
use famrank_domain::{QueryRejection, ScoredUser, SearchQuery, rank_candidates};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
	/// Absent when the query was blank and nothing was asked of any backend.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<ResultSource>,
	pub results: Vec<ScoredUser>,
}

impl FamRankService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = match SearchQuery::parse(&req.query, self.cfg.search.min_search_length) {
			Ok(query) => query,
			Err(QueryRejection::Empty) => return Ok(SearchResponse::default()),
			Err(QueryRejection::TooShort { min_len }) => return Err(Error::QueryTooShort { min_len }),
		};
		let limit = self.cfg.search.max_results;
		let resolved = self.resolve_by_name(query.as_str(), limit).await?;
		let mut results = rank_candidates(query.as_str(), resolved.users);

		results.truncate(limit as usize);

		tracing::debug!(
			source = ?resolved.source,
			count = results.len(),
			"User search completed."
		);

		Ok(SearchResponse { source: Some(resolved.source), results })
	}
}
