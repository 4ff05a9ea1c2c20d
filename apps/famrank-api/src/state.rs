use std::sync::Arc;

use famrank_service::FamRankService;
use famrank_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FamRankService>,
}
impl AppState {
	pub async fn new(config: famrank_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(FamRankService::new(config, db)))
	}

	pub fn from_service(service: FamRankService) -> Self {
		Self { service: Arc::new(service) }
	}
}
