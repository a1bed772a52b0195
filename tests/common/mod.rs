#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use subshop_backend::{
    config::DatabaseConfig,
    database::{create_pool, run_migrations},
    entities::users,
    external::BotNotifier,
    models::{CreateTariffRequest, CreateUserRequest, Principal, TariffResponse},
    services::Services,
    utils::JwtService,
};

pub const JWT_SECRET: &str = "test-secret";
pub const PASSWORD: &str = "correct-horse";

pub struct TestContext {
    pub pool: DatabaseConnection,
    pub services: Services,
}

/// Fresh in-memory database with all migrations applied. SQLite memory
/// databases are per connection, so the pool holds exactly one.
pub async fn setup() -> TestContext {
    let pool = create_pool(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("sqlite pool");
    run_migrations(&pool).await.expect("migrations");

    let services = Services::with_notifier(
        pool.clone(),
        JwtService::new(JWT_SECRET, 3600, 86400),
        4,
        BotNotifier::disabled(),
    );
    TestContext { pool, services }
}

impl TestContext {
    pub async fn create_user(&self, email: &str, phone: Option<&str>) -> users::Model {
        let created = self
            .services
            .users
            .create(CreateUserRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                phone: phone.map(str::to_string),
            })
            .await
            .expect("create user");
        users::Entity::find_by_id(created.id)
            .one(&self.pool)
            .await
            .expect("query user")
            .expect("user exists")
    }

    async fn set_flags(&self, user: users::Model, is_staff: bool, is_active: bool) -> users::Model {
        let mut model = user.into_active_model();
        model.is_staff = Set(is_staff);
        model.is_active = Set(is_active);
        model.update(&self.pool).await.expect("update user flags")
    }

    pub async fn active_user(&self, email: &str) -> users::Model {
        let user = self.create_user(email, None).await;
        self.set_flags(user, false, true).await
    }

    pub async fn staff_user(&self, email: &str) -> users::Model {
        let user = self.create_user(email, None).await;
        self.set_flags(user, true, true).await
    }

    pub async fn tariff(&self, staff: &Principal, name: &str) -> TariffResponse {
        self.services
            .tariffs
            .create(
                staff,
                CreateTariffRequest {
                    name: name.to_string(),
                    price: Decimal::new(999, 2),
                },
            )
            .await
            .expect("create tariff")
    }

    pub fn access_token(&self, user: &users::Model) -> String {
        self.services
            .jwt
            .generate_access_token(user.id, &user.email)
            .expect("access token")
    }
}

pub fn principal(user: &users::Model) -> Principal {
    Principal::from(user)
}
