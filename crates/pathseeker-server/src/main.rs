use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pathseeker_api::auth::{self, AppState, AppStateInner};
use pathseeker_api::middleware::{jwt_secret, require_auth};
use pathseeker_api::{advice, chats, messages, moments, ratings, users};
use pathseeker_core::advice::AdviceClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathseeker=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret = jwt_secret();
    let db_path = std::env::var("PATHSEEKER_DB_PATH").unwrap_or_else(|_| "pathseeker.db".into());
    let host = std::env::var("PATHSEEKER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PATHSEEKER_PORT")
        .unwrap_or_else(|_| "5050".into())
        .parse()?;

    // Init database
    let db = pathseeker_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        advice: AdviceClient::from_env()?,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/feed", get(moments::get_feed))
        .route("/dashboard/student", get(moments::student_dashboard))
        .route("/dashboard/mentor", get(moments::mentor_dashboard))
        .route("/moments", post(moments::create_moment))
        .route("/moments/{moment_id}", get(moments::view_moment))
        .route("/moments/{moment_id}", delete(moments::delete_moment))
        .route("/moments/{moment_id}/similar", get(moments::similar_moments))
        .route("/moments/{moment_id}/resolve", post(moments::resolve_moment))
        .route("/moments/{moment_id}/replies", post(moments::post_reply))
        .route("/replies/{reply_id}/rating", post(ratings::rate_reply))
        .route("/mentors", get(users::search_mentors))
        .route("/mentors/{mentor_id}", get(users::mentor_profile))
        .route("/profile", put(users::update_profile))
        .route("/chats", post(chats::start_chat))
        .route("/chats", get(chats::list_chats))
        .route("/chats/{chat_id}", delete(chats::delete_chat))
        .route("/chats/{chat_id}/messages", get(messages::get_messages))
        .route("/chats/{chat_id}/messages", post(messages::send_message))
        .route("/chats/{chat_id}/video-room", get(chats::video_room))
        .route("/notifications", get(messages::notifications))
        .route("/advice", post(advice::ask_advice))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Pathseeker server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
