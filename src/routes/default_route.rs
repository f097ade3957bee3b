use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Ok().body("Upload an xlsx or CSV file with a 'Full Name' column to POST /")
}
