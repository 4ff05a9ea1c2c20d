use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};
use famrank_config::Index;
use famrank_domain::UserProfile;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
	pub id: String,
	/// Provider relevance, when the index reports one.
	pub score: Option<f32>,
	pub content: UserProfile,
}

pub async fn health_check(cfg: &Index) -> Result<bool> {
	let res = client(cfg)?
		.get(format!("{}{}", cfg.api_base, cfg.health_path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.send()
		.await?;

	Ok(res.status().is_success())
}

pub async fn search_users(cfg: &Index, query: &str, limit: u32) -> Result<Vec<IndexHit>> {
	let body = serde_json::json!({ "query": query, "limit": limit });
	let res = client(cfg)?
		.post(format!("{}{}", cfg.api_base, cfg.search_path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json)
}

pub async fn upsert_users(cfg: &Index, users: &[UserProfile]) -> Result<()> {
	if users.is_empty() {
		return Ok(());
	}

	let updated_at = OffsetDateTime::now_utc().format(&Rfc3339).map_err(|err| {
		Error::InvalidConfig { message: format!("Failed to format upsert timestamp: {err}.") }
	})?;
	let body = build_upsert_body(users, &updated_at)?;

	client(cfg)?
		.post(format!("{}{}", cfg.api_base, cfg.upsert_path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?
		.error_for_status()?;

	Ok(())
}

fn client(cfg: &Index) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?)
}

fn parse_search_response(json: Value) -> Result<Vec<IndexHit>> {
	let items = match &json {
		Value::Array(items) => items,
		Value::Object(map) => ["result", "results", "hits"]
			.iter()
			.find_map(|key| map.get(*key).and_then(|v| v.as_array()))
			.ok_or_else(|| Error::InvalidResponse {
				message: "Search response is missing a hits array.".to_string(),
			})?,
		_ =>
			return Err(Error::InvalidResponse {
				message: "Search response must be an array or an object.".to_string(),
			}),
	};
	let mut hits = Vec::with_capacity(items.len());

	for item in items {
		let id = match item.get("id") {
			Some(Value::String(id)) => id.clone(),
			Some(Value::Number(id)) => id.to_string(),
			_ =>
				return Err(Error::InvalidResponse {
					message: "Search hit is missing an id.".to_string(),
				}),
		};
		let mut content = item.get("content").cloned().ok_or_else(|| Error::InvalidResponse {
			message: format!("Search hit {id:?} is missing content."),
		})?;
		let Some(fields) = content.as_object_mut() else {
			return Err(Error::InvalidResponse {
				message: format!("Search hit {id:?} content must be an object."),
			});
		};

		// Partial upserts may omit the uid; the document id is authoritative.
		fields.entry("uid").or_insert_with(|| Value::String(id.clone()));

		let score = item.get("score").and_then(|v| v.as_f64()).map(|v| v as f32);

		hits.push(IndexHit { id, score, content: serde_json::from_value(content)? });
	}

	Ok(hits)
}

fn build_upsert_body(users: &[UserProfile], updated_at: &str) -> Result<Value> {
	let mut documents = Vec::with_capacity(users.len());

	for user in users {
		let mut content = serde_json::to_value(user)?;

		if let Some(fields) = content.as_object_mut() {
			fields.insert("updatedAt".to_string(), Value::String(updated_at.to_string()));
		}

		documents.push(serde_json::json!({ "id": user.uid, "content": content }));
	}

	Ok(Value::Array(documents))
}
