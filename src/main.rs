//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Administração de usuários (o papel admin é exigido pelo extractor)
    let admin_routes = Router::new()
        .route(
            "/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route(
            "/users/{user_id}",
            put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let deal_routes = Router::new()
        .route(
            "/",
            get(handlers::deals::list_deals).post(handlers::deals::create_deal),
        )
        // Composição do dashboard
        .route("/paginated", get(handlers::dashboard::get_deals_paginated))
        .route("/stats", get(handlers::dashboard::get_deals_stats))
        .route(
            "/{deal_id}",
            get(handlers::deals::get_deal)
                .put(handlers::deals::update_deal)
                .delete(handlers::deals::delete_deal),
        )
        .route("/{deal_id}/status", put(handlers::deals::update_status))
        .route(
            "/{deal_id}/purchase-amount",
            put(handlers::deals::update_purchase_amount),
        )
        .route(
            "/{deal_id}/selling-amount",
            put(handlers::deals::update_selling_amount),
        )
        // Participações (a tela de detalhe grava os dois lados separados)
        .route(
            "/{deal_id}/owner-shares",
            put(handlers::shares::update_owner_shares),
        )
        .route(
            "/{deal_id}/investor-shares",
            put(handlers::shares::update_investor_shares),
        )
        // Visões derivadas da conciliação
        .route(
            "/{deal_id}/payment-tracking",
            get(handlers::tracking::payment_tracking),
        )
        .route("/{deal_id}/financials", get(handlers::tracking::deal_financials))
        // Compradores
        .route("/{deal_id}/buyers", post(handlers::deals::add_buyer))
        .route(
            "/{deal_id}/buyers/{buyer_id}",
            delete(handlers::deals::delete_buyer),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let payment_routes = Router::new()
        .route("/", get(handlers::payments::list_all_payments))
        .route("/ledger", get(handlers::payments::payments_ledger))
        .route(
            "/{deal_id}",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/{deal_id}/{payment_id}",
            get(handlers::payments::get_payment)
                .put(handlers::payments::update_payment)
                .delete(handlers::payments::delete_payment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let owner_routes = Router::new()
        .route(
            "/",
            get(handlers::parties::list_owners).post(handlers::parties::create_owner),
        )
        .route(
            "/{owner_id}",
            get(handlers::parties::get_owner).delete(handlers::parties::delete_owner),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let investor_routes = Router::new()
        .route(
            "/",
            get(handlers::parties::list_investors).post(handlers::parties::create_investor),
        )
        .route(
            "/{investor_id}",
            get(handlers::parties::get_investor).delete(handlers::parties::delete_investor),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/deals", deal_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/owners", owner_routes)
        .nest("/api/investors", investor_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
