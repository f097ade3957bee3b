use std::net::TcpListener;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, enrich_route},
    services::BatchProcessor,
};

pub fn run(
    listener: TcpListener,
    batch_processor: BatchProcessor,
    max_upload_bytes: usize,
) -> Result<Server, std::io::Error> {
    let batch_processor = web::Data::new(batch_processor);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(enrich_route::enrich_upload)
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes)
                    .memory_limit(max_upload_bytes),
            )
            .app_data(batch_processor.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
