use actix_web::{web, HttpResponse, Responder};
use common::model::upload::SubmitFormResponse;
use common::model::value::FormValues;
use log::info;

pub async fn process(payload: web::Json<FormValues>) -> impl Responder {
    let values = payload.into_inner();
    info!(
        "Received form data: {}",
        serde_json::to_string(&values).unwrap_or_default()
    );
    HttpResponse::Ok().json(SubmitFormResponse {
        success: true,
        data: values,
    })
}
