use actix_multipart::form::{bytes::Bytes, MultipartForm};
use actix_web::{http::header::ContentDisposition, post, web, HttpResponse};

use crate::{
    error::SheetError,
    services::{read_sheet, write_sheet, BatchProcessor, OUTPUT_CONTENT_TYPE, OUTPUT_FILENAME},
};

#[derive(MultipartForm)]
pub struct UploadForm {
    file: Option<Bytes>,
}

#[post("/")]
pub async fn enrich_upload(
    batch_processor: web::Data<BatchProcessor>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> HttpResponse {
    /*
    1. Read the uploaded sheet, reject it before any lookup if unusable
    2. Enrich every row in order
    3. Send the sheet back with the enrichment columns as an attachment
    */
    let file = match form.file {
        Some(file) if !file.data.is_empty() => file,
        _ => return HttpResponse::BadRequest().body("No file uploaded"),
    };

    let sheet = match read_sheet(&file.data) {
        Ok(sheet) => sheet,
        Err(SheetError::MissingColumn(column)) => {
            return HttpResponse::BadRequest()
                .body(format!("File must contain a '{}' column.", column))
        }
        Err(e) => return HttpResponse::BadRequest().body(format!("Error reading file: {}", e)),
    };

    let batch = batch_processor.process(sheet.records).await;

    match write_sheet(&sheet.headers, &batch) {
        Ok(output) => HttpResponse::Ok()
            .content_type(OUTPUT_CONTENT_TYPE)
            .insert_header(ContentDisposition::attachment(OUTPUT_FILENAME))
            .body(output),
        Err(e) => {
            log::error!("Failed to write enriched sheet: {}", e);
            HttpResponse::InternalServerError().body("Failed to write results")
        }
    }
}
