use actix_web::HttpResponse;

/// GET /
pub async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().json("donut-diaries-api")
}

/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
