//! # Template Freeze Service
//!
//! `POST /api/templates/freeze`. The document travels as base64 inside the
//! JSON body; its text layer is read through [`PlainTextContainer`], frozen,
//! written back and persisted in the [`TemplateStore`]. Storage failures are
//! fatal for the call since there is no row or tag to attach them to.

use actix_web::{web, HttpResponse, Responder};
use base64::{engine::general_purpose, Engine as _};
use common::model::template::StoredTemplate;
use common::requests::FreezeTemplateRequest;
use log::{info, warn};

use crate::engines::freeze::container::PlainTextContainer;
use crate::engines::freeze::FreezeEngine;
use crate::error::{EngineError, Result};
use crate::services::error_response;
use crate::storage::TemplateStore;

/// Handler for `POST /api/templates/freeze`: `200` with the stored template
/// metadata and freeze report.
pub(crate) async fn process(
    store: web::Data<TemplateStore>,
    payload: web::Json<FreezeTemplateRequest>,
) -> impl Responder {
    match freeze_template(&store, payload.into_inner()) {
        Ok(stored) => HttpResponse::Ok().json(stored),
        Err(e) => {
            warn!("Freeze failed: {}", e);
            error_response(&e)
        }
    }
}

fn freeze_template(store: &TemplateStore, req: FreezeTemplateRequest) -> Result<StoredTemplate> {
    if req.template_id.trim().is_empty() {
        return Err(EngineError::InvalidInput("templateId is empty".to_string()));
    }
    let bytes = general_purpose::STANDARD
        .decode(req.document_base64.trim())
        .map_err(|e| EngineError::InvalidInput(format!("documentBase64: {}", e)))?;

    let frozen = FreezeEngine::default().freeze_document(
        &bytes,
        &req.tags,
        &req.mappings,
        &PlainTextContainer,
    )?;
    let stored = store.insert(&req.template_id, &frozen)?;
    info!(
        "Template {} frozen: {}/{} placeholders applied",
        stored.template_id, stored.report.successful, stored.report.total
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::mapping::Mapping;
    use common::model::tag::{Tag, TagType};

    fn request(id: &str) -> FreezeTemplateRequest {
        FreezeTemplateRequest {
            template_id: id.to_string(),
            document_base64: general_purpose::STANDARD
                .encode("Benvolgut Paquita Ferre SL, el pressupost és 683,00 €."),
            tags: vec![
                Tag::new("Nom", "nom", "Paquita Ferre SL", TagType::String),
                Tag::new("Pressupost", "pressupost", "683,00 €", TagType::Currency),
            ],
            mappings: Mapping::from_pairs([("nom", "Client Name"), ("pressupost", "Import")]),
        }
    }

    #[actix_web::test]
    async fn freezes_once_then_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::open(dir.path().join("t.sqlite")).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store.clone()))
                .route("/freeze", web::post().to(process)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/freeze")
            .set_json(request("carta"))
            .to_request();
        let stored: StoredTemplate = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.report.successful, 2);
        assert!(stored.report.manual_review_required.is_empty());
        assert_eq!(
            store.get("carta").unwrap().0,
            "Benvolgut {{nom}}, el pressupost és {{pressupost}}.".as_bytes()
        );

        let again = test::TestRequest::post()
            .uri("/freeze")
            .set_json(request("carta"))
            .to_request();
        assert_eq!(test::call_service(&app, again).await.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn bad_base64_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::open(dir.path().join("t.sqlite")).unwrap();
        let mut req = request("carta");
        req.document_base64 = "***".to_string();
        assert!(matches!(
            freeze_template(&store, req),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
