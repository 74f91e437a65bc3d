// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{DealRepository, PartyRepository, PaymentRepository, UserRepository},
    services::{
        auth::AuthService, deal_service::DealService, payment_service::PaymentService,
        share_service::ShareService, tracking_service::TrackingService, user_service::UserService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub party_repo: PartyRepository,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub deal_service: DealService,
    pub share_service: ShareService,
    pub payment_service: PaymentService,
    pub tracking_service: TrackingService,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências.
    // Retorna Result: se a configuração falhar, a aplicação não inicia.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let deal_repo = DealRepository::new(db_pool.clone());
        let party_repo = PartyRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo, db_pool.clone());
        let deal_service = DealService::new(deal_repo.clone(), db_pool.clone());
        let share_service = ShareService::new(deal_repo.clone(), db_pool.clone());
        let payment_service = PaymentService::new(
            payment_repo.clone(),
            deal_repo.clone(),
            party_repo.clone(),
            db_pool.clone(),
        );
        let tracking_service = TrackingService::new(deal_repo, payment_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            party_repo,
            auth_service,
            user_service,
            deal_service,
            share_service,
            payment_service,
            tracking_service,
        })
    }
}
