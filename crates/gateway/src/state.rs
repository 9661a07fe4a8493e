//! Shared application state for the gateway

use std::sync::Arc;

use offramp_config::{AppConfig, StorageConfig};
use offramp_database::initialize_database;
use offramp_dishes::Catalog;
use offramp_integrations::{ChatService, OpenRouterClient, VeganSwapClient};
use offramp_transition::{
    PlanService, PreferenceService, ProgressService, ReminderService, SwapService,
};
use offramp_users::{AuthService, ProfileService};
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub preference_service: Arc<PreferenceService>,
    pub plan_service: Arc<PlanService>,
    pub progress_service: Arc<ProgressService>,
    pub swap_service: Arc<SwapService>,
    pub reminder_service: Arc<ReminderService>,
    pub veganswap: Arc<VeganSwapClient>,
    pub openrouter: Arc<OpenRouterClient>,
    pub chat: Arc<ChatService>,
    pub catalog: &'static Catalog,
    /// Where uploaded swap photos are written and how they are addressed.
    pub storage: StorageConfig,
    /// Expected `x-cron-secret`; the reminder trigger is open while unset.
    pub cron_secret: Option<String>,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, config: &AppConfig) -> GatewayResult<Self> {
        let veganswap = VeganSwapClient::new(&config.veganswap)
            .map_err(|e| GatewayError::Internal(format!("VeganSwap client: {e}")))?;
        let openrouter = OpenRouterClient::new(&config.openrouter)
            .map_err(|e| GatewayError::Internal(format!("OpenRouter client: {e}")))?;
        let chat = ChatService::new(&config.openrouter)
            .map_err(|e| GatewayError::Internal(format!("chat client: {e}")))?;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(pool.clone(), &config.auth)),
            profile_service: Arc::new(ProfileService::new(pool.clone())),
            preference_service: Arc::new(PreferenceService::new(pool.clone())),
            plan_service: Arc::new(PlanService::new(pool.clone())),
            progress_service: Arc::new(ProgressService::new(pool.clone())),
            swap_service: Arc::new(SwapService::new(pool.clone())),
            reminder_service: Arc::new(ReminderService::new(pool.clone())),
            veganswap: Arc::new(veganswap),
            openrouter: Arc::new(openrouter),
            chat: Arc::new(chat),
            catalog: Catalog::bundled(),
            storage: config.storage.clone(),
            cron_secret: config.cron.secret.clone(),
            pool,
        })
    }

    /// Create gateway state from the application configuration, running migrations.
    pub async fn from_config(config: &AppConfig) -> GatewayResult<Self> {
        let pool = initialize_database(&config.database)
            .await
            .map_err(|e| GatewayError::Internal(format!("Failed to initialize database: {e}")))?;

        Self::new(pool, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offramp_config::DatabaseConfig;

    #[tokio::test]
    async fn test_create_gateway_state() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            ..AppConfig::default()
        };

        let state = GatewayState::from_config(&config).await.unwrap();
        assert!(!state.auth_service.is_configured());
        assert!(!state.veganswap.is_configured());
        assert!(!state.chat.is_configured());
        assert!(state.catalog.dishes().len() > 0);
        assert!(state.cron_secret.is_none());
    }
}
