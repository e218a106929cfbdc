use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    database::{
        file::JsonFileDatabase, inmemory::InMemoryDatabase, pool::create_sqlite_pool,
        sqlite::SqliteDatabase,
    },
    notifications::{
        gateway::{
            NotificationGateway, apns::ApnsNotificationGateway, dummy::DummyNotificationGateway,
            fcm::FcmNotificationGateway,
        },
        service::NotificationService,
    },
    settings::{DatabaseSettings, GatewaySettings, Settings},
    tokens::{database::TokenDatabase, service::TokenService},
};

pub type DynTokenDatabase = dyn TokenDatabase + Send + Sync;
pub type DynNotificationGateway = dyn NotificationGateway + Send + Sync;

pub struct AppContext {
    pub token_service: TokenService<DynTokenDatabase>,
    pub notification_service: NotificationService<DynNotificationGateway>,
}

impl AppContext {
    pub fn new(
        token_db: Arc<DynTokenDatabase>,
        gateway: Arc<DynNotificationGateway>,
        deep_link: &str,
        send_timeout: Duration,
    ) -> Self {
        Self {
            token_service: TokenService::new(token_db),
            notification_service: NotificationService::new(gateway, deep_link, send_timeout),
        }
    }

    /// Creates the application context: opens the token store and builds the
    /// notification gateway from the configured credentials.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let token_db: Arc<DynTokenDatabase> = match &settings.database {
            DatabaseSettings::InMemory => Arc::new(InMemoryDatabase::new()),
            DatabaseSettings::File { path } => Arc::new(JsonFileDatabase::open(path).await?),
            DatabaseSettings::Sqlite { path } => {
                let pool = create_sqlite_pool(path).await?;
                let db = SqliteDatabase::new(pool);
                db.init().await?;
                Arc::new(db)
            }
        };

        let gateway: Arc<DynNotificationGateway> = match &settings.notifications.gateway {
            GatewaySettings::Fcm {
                service_account,
                timeout_secs,
            } => Arc::new(FcmNotificationGateway::from_file(
                service_account,
                Duration::from_secs(*timeout_secs),
            )?),
            GatewaySettings::Apns {
                team_id,
                key_id,
                bundle_id,
                private_key_path,
                production,
            } => Arc::new(ApnsNotificationGateway::from_file(
                team_id,
                key_id,
                private_key_path,
                bundle_id,
                *production,
            )?),
            GatewaySettings::Dummy => Arc::new(DummyNotificationGateway),
        };
        info!(
            database = ?settings.database,
            gateway = gateway_name(&settings.notifications.gateway),
            "Application context created"
        );

        Ok(Self::new(
            token_db,
            gateway,
            &settings.notifications.deep_link,
            Duration::from_secs(settings.notifications.send_timeout_secs),
        ))
    }
}

fn gateway_name(settings: &GatewaySettings) -> &'static str {
    match settings {
        GatewaySettings::Fcm { .. } => "fcm",
        GatewaySettings::Apns { .. } => "apns",
        GatewaySettings::Dummy => "dummy",
    }
}
