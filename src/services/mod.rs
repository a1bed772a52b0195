pub mod activation_service;
pub mod auth_service;
pub mod entitlement;
pub mod order_service;
pub mod product_service;
pub mod subscription_service;
pub mod tariff_service;
pub mod user_service;

pub use activation_service::*;
pub use auth_service::*;
pub use entitlement::EntitlementService;
pub use order_service::*;
pub use product_service::*;
pub use subscription_service::*;
pub use tariff_service::*;
pub use user_service::*;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::external::BotNotifier;
use crate::utils::JwtService;

/// Every service the HTTP app needs, built once from a pool and config.
#[derive(Clone)]
pub struct Services {
    pub jwt: JwtService,
    pub auth: AuthService,
    pub entitlement: EntitlementService,
    pub users: UserService,
    pub tariffs: TariffService,
    pub subscriptions: SubscriptionService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(pool: DatabaseConnection, config: &Config) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expires_in,
            config.jwt.refresh_token_expires_in,
        );
        let notifier = BotNotifier::new(&config.bot);
        Self::with_notifier(pool, jwt, config.security.password_hash_cost, notifier)
    }

    pub fn with_notifier(
        pool: DatabaseConnection,
        jwt: JwtService,
        password_hash_cost: u32,
        notifier: BotNotifier,
    ) -> Self {
        let users = UserService::new(pool.clone(), password_hash_cost);
        Self {
            auth: AuthService::new(users.clone(), jwt.clone()),
            entitlement: EntitlementService::new(pool.clone()),
            tariffs: TariffService::new(pool.clone()),
            subscriptions: SubscriptionService::new(pool.clone()),
            products: ProductService::new(pool.clone()),
            orders: OrderService::new(pool, notifier),
            users,
            jwt,
        }
    }

    /// Registers each service as `web::Data` so handlers can extract it.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.tariffs.clone()))
            .app_data(web::Data::new(self.subscriptions.clone()))
            .app_data(web::Data::new(self.products.clone()))
            .app_data(web::Data::new(self.orders.clone()));
    }
}
