use actix_web::{web, HttpResponse, Responder};

use crate::services::error_response;
use crate::storage::TemplateStore;

/// Handler for `GET /api/templates/{template_id}`: stored metadata and
/// freeze report, without the document bytes.
pub(crate) async fn process(
    store: web::Data<TemplateStore>,
    template_id: web::Path<String>,
) -> impl Responder {
    match store.get(&template_id) {
        Ok((_, stored)) => HttpResponse::Ok().json(stored),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn unknown_template_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::open(dir.path().join("t.sqlite")).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .route("/{template_id}", web::get().to(process)),
        )
        .await;
        let req = test::TestRequest::get().uri("/nope").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
