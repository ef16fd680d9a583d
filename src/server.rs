use crate::app_state::{AppConfig, AppState};
use crate::format;
use crate::io_struct::{ChatRequest, HealthStatus};
use crate::stream;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

static INDEX_HTML: &str = include_str!("../static/index.html");

#[get("/")]
pub async fn home(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/health")]
pub async fn health(_req: HttpRequest) -> HttpResponse {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        message: "Server is running",
        timestamp,
    })
}

#[post("/chat")]
pub async fn chat(
    _req: HttpRequest,
    req: web::Json<ChatRequest>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let req = req.into_inner();
    let model = req.model.unwrap_or_else(|| app_state.default_model.clone());
    log::debug!("Received message: {}", req.message);
    log::debug!("Selected model: {}", model);

    let thinking = format::thinking_message(&mut rand::rng());
    let (tx, rx) = stream::event_channel();
    let state = app_state.into_inner();
    actix_web::rt::spawn(async move {
        let connect = state.connect_generate(&model, &req.message);
        stream::drive_chat(thinking, connect, tx).await;
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .streaming(rx)
}

pub async fn startup(config: AppConfig, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    println!("Starting server at {}:{}", config.host, config.port);

    // default level is info
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .init();

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .service(home)
            .service(health)
            .service(chat)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn health_reports_healthy_with_increasing_timestamp() {
        let app = test::init_service(App::new().service(health)).await;

        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
                .await;
        assert_eq!(resp["status"], "healthy");
        let first = resp["timestamp"].as_f64().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
                .await;
        let second = resp["timestamp"].as_f64().unwrap();
        assert!(second > first, "timestamps: {first} then {second}");
    }

    #[actix_web::test]
    async fn home_serves_the_chat_page() {
        let app = test::init_service(App::new().service(home)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
    }
}
