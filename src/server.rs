use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};

use northscrape_lib::{logger, Catalog, GenerateRequest, LeadPipeline, PipelineError, Settings};

struct AppState {
    pipeline: Arc<LeadPipeline>,
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

#[get("/api/meta")]
async fn meta() -> impl Responder {
    HttpResponse::Ok().json(Catalog::current())
}

#[post("/api/generate")]
async fn generate(req: web::Json<GenerateRequest>, data: web::Data<AppState>) -> impl Responder {
    let request = req.into_inner();
    if let Err(e) = request.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }

    // Lookups use the blocking HTTP client, so keep them off the async workers.
    let pipeline = data.pipeline.clone();
    match web::block(move || pipeline.run(&request)).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(e @ PipelineError::EmptySelection)) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        Ok(Err(e)) => {
            log::error!("Generation failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("Generation task failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "generation failed" }))
        }
    }
}

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default().allow_any_method().allow_any_header();
    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| cors.allowed_origin(origin))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let settings = Settings::load(None)?;
    // Built outside the async runtime: the blocking client owns its own.
    let pipeline = Arc::new(LeadPipeline::from_settings(&settings)?);
    let state = web::Data::new(AppState {
        pipeline: pipeline.clone(),
    });

    let bind = (settings.server.bind.clone(), settings.server.port);
    let origins = settings.server.allowed_origins.clone();
    log::info!("Starting Web Server at http://{}:{}", bind.0, bind.1);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(cors(&origins))
                .app_data(state.clone())
                .service(health_check)
                .service(meta)
                .service(generate)
        })
        .bind(bind)?
        .run()
        .await
    })?;

    drop(pipeline);
    Ok(())
}
