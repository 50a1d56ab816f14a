//! Tests for the proposal server API
//!
//! Test categories:
//! - Property tests for request parsing and response headers
//! - HTTP endpoint tests using axum-test against the full router

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use crate::api::attachment_disposition;
    use crate::models::GenerateCoverRequest;
    use proposal_store::Area;

    proptest! {
        /// Property: any download name yields a usable attachment header
        #[test]
        fn disposition_is_always_an_attachment(name in "\\PC{0,60}") {
            let value = attachment_disposition(&name);
            let text = value.to_str().unwrap();
            prop_assert!(text.starts_with("attachment"));
            prop_assert_eq!(text.matches('"').count() % 2, 0);
        }

        /// Property: only the three area names parse
        #[test]
        fn only_known_areas_parse(area in "[a-z]{0,10}") {
            let parsed = area.parse::<Area>();
            let known = matches!(area.as_str(), "modules" | "covers" | "exports");
            prop_assert_eq!(parsed.is_ok(), known);
        }

        /// Property: blank optional fields never reach the cover
        #[test]
        fn blank_fields_become_absent(
            title in "[A-Za-z ]{1,30}",
            padding in " {0,4}",
        ) {
            let body = serde_json::json!({
                "title": title,
                "client_name": padding,
                "created_by": padding,
                "date": padding,
            });
            let req: GenerateCoverRequest = serde_json::from_value(body).unwrap();
            let meta = req.into_metadata();
            prop_assert_eq!(meta.title, title);
            prop_assert!(meta.client_name.is_none());
            prop_assert!(meta.author.is_none());
            prop_assert!(meta.date.is_none());
        }
    }
}

#[cfg(test)]
mod http_endpoint_tests {
    //! HTTP endpoint integration tests using axum-test

    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use lopdf::content::Content;
    use lopdf::{Document, Object};
    use pretty_assertions::assert_eq;
    use proposal_pdf::cover::theme::DEFAULT_PRIMARY;
    use proposal_pdf::{merge_documents, render_cover, BrandTheme, CoverAssets, CoverMetadata, MergeSource};
    use proposal_store::FsStore;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};

    use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
    use crate::models::{ExportResponse, GenerateCoverResponse, UploadResponse};
    use crate::router;
    use crate::state::AppState;

    struct TestApp {
        server: TestServer,
        dir: TempDir,
    }

    impl TestApp {
        fn data_dir(&self) -> PathBuf {
            self.dir.path().join("uploads")
        }

        fn static_dir(&self) -> PathBuf {
            self.dir.path().join("static")
        }
    }

    /// Create a test server with the full router
    fn create_test_app(max_upload_bytes: usize) -> TestApp {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path().join("uploads")).unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&static_dir).unwrap();

        let state = AppState::from_parts(
            Arc::new(store),
            BrandTheme::default(),
            DEFAULT_PRIMARY.to_string(),
            static_dir,
            max_upload_bytes,
        );

        TestApp {
            server: TestServer::new(router(state)).unwrap(),
            dir,
        }
    }

    fn create_test_server() -> TestApp {
        create_test_app(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// A PDF with one page per title; each page shows its title first.
    fn titled_pdf(titles: &[&str]) -> Vec<u8> {
        let pages = titles
            .iter()
            .map(|title| {
                let meta = CoverMetadata {
                    title: title.to_string(),
                    ..Default::default()
                };
                let bytes =
                    render_cover(&meta, &BrandTheme::default(), &CoverAssets::default()).unwrap();
                MergeSource::new(*title, bytes)
            })
            .collect();
        merge_documents(pages).unwrap().bytes
    }

    /// First text run on each page.
    fn page_titles(bytes: &[u8]) -> Vec<String> {
        let mut doc = Document::load_mem(bytes).unwrap();
        doc.decompress();
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .find(|op| op.operator == "Tj")
                    .and_then(|op| op.operands.first())
                    .and_then(|o| match o {
                        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
                        _ => None,
                    })
                    .unwrap_or_default()
            })
            .collect()
    }

    fn pdf_part(name: &str, bytes: Vec<u8>) -> Part {
        Part::bytes(bytes)
            .file_name(name)
            .mime_type("application/pdf")
    }

    async fn upload(app: &TestApp, parts: Vec<(&str, Vec<u8>)>) -> UploadResponse {
        let mut form = MultipartForm::new();
        for (name, bytes) in parts {
            form = form.add_part("files", pdf_part(name, bytes));
        }
        let response = app.server.post("/upload").multipart(form).await;
        response.assert_status_ok();
        response.json::<UploadResponse>()
    }

    async fn download(app: &TestApp, area: &str, name: &str) -> Vec<u8> {
        let response = app
            .server
            .get(&format!("/download/{}/{}", area, name))
            .await;
        response.assert_status_ok();
        response.as_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let app = create_test_server();
        let response = app.server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "proposal-server");
    }

    #[tokio::test]
    async fn test_index_lists_modules() {
        let app = create_test_server();
        upload(&app, vec![("Scope.pdf", titled_pdf(&["Scope"]))]).await;

        let response = app.server.get("/").await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Proposal Builder"));
        assert!(html.contains("/download/modules/Scope.pdf"));
        assert!(html.contains(DEFAULT_PRIMARY));
    }

    #[tokio::test]
    async fn test_repeated_upload_gets_suffixes() {
        let app = create_test_server();
        let pdf = titled_pdf(&["A"]);

        let mut saved = Vec::new();
        for _ in 0..3 {
            saved.extend(upload(&app, vec![("a.pdf", pdf.clone())]).await.saved);
        }
        assert_eq!(saved, vec!["a.pdf", "a_1.pdf", "a_2.pdf"]);
    }

    #[tokio::test]
    async fn test_upload_filters_non_pdf() {
        let app = create_test_server();
        let result = upload(
            &app,
            vec![("notes.txt", b"hello".to_vec()), ("deck.PDF", titled_pdf(&["Deck"]))],
        )
        .await;

        assert_eq!(result.saved, vec!["deck.PDF"]);
        assert_eq!(result.all, vec!["deck.PDF"]);
        assert!(!app.data_dir().join("modules").join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_list_modules_sorted() {
        let app = create_test_server();
        upload(&app, vec![("b.pdf", titled_pdf(&["B"]))]).await;
        upload(&app, vec![("a.pdf", titled_pdf(&["A"]))]).await;

        let response = app.server.get("/list_modules").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<String>>(), vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_generate_cover_and_download() {
        let app = create_test_server();
        let response = app
            .server
            .post("/generate_cover")
            .json(&json!({
                "title": "Website Redesign Proposal",
                "client_name": "Acme Co",
                "created_by": "Jordan Lee",
                "date": "2024-03-01"
            }))
            .await;
        response.assert_status_ok();

        let cover = response.json::<GenerateCoverResponse>().cover;
        let digits = cover
            .strip_prefix("cover_")
            .and_then(|rest| rest.strip_suffix(".pdf"))
            .unwrap();
        assert_eq!(digits.len(), 20);
        assert!(digits.bytes().all(|b| b.is_ascii_digit()));

        let response = app.server.get(&format!("/download/covers/{}", cover)).await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        let disposition = response.header("content-disposition");
        let disposition = disposition.to_str().unwrap();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(&cover));

        let titles = page_titles(response.as_bytes());
        assert_eq!(titles, vec!["Website Redesign Proposal"]);
    }

    #[tokio::test]
    async fn test_generate_cover_defaults_title() {
        let app = create_test_server();
        let response = app.server.post("/generate_cover").json(&json!({})).await;
        response.assert_status_ok();

        let cover = response.json::<GenerateCoverResponse>().cover;
        let bytes = download(&app, "covers", &cover).await;
        assert_eq!(page_titles(&bytes), vec!["Proposal"]);
    }

    #[tokio::test]
    async fn test_generate_cover_uses_static_logo() {
        let app = create_test_server();
        let logo = {
            let mut out = Vec::new();
            let mut encoder = png::Encoder::new(&mut out, 4, 4);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[200u8; 48]).unwrap();
            drop(writer);
            out
        };
        std::fs::write(app.static_dir().join("logo.png"), &logo).unwrap();

        let cover = app
            .server
            .post("/generate_cover")
            .json(&json!({ "title": "Logo" }))
            .await
            .json::<GenerateCoverResponse>()
            .cover;
        let bytes = download(&app, "covers", &cover).await;
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert!(xobjects.has(b"Im2"));

        let response = app.server.get("/static/logo.png").await;
        response.assert_status_ok();
        assert_eq!(response.as_bytes().to_vec(), logo);
    }

    #[tokio::test]
    async fn test_export_orders_cover_then_modules() {
        let app = create_test_server();
        upload(&app, vec![("a.pdf", titled_pdf(&["A1", "A2"]))]).await;
        upload(&app, vec![("b.pdf", titled_pdf(&["B1", "B2", "B3"]))]).await;

        let cover = app
            .server
            .post("/generate_cover")
            .json(&json!({ "title": "Cover" }))
            .await
            .json::<GenerateCoverResponse>()
            .cover;

        let response = app
            .server
            .post("/export")
            .json(&json!({ "files": ["a.pdf", "b.pdf"], "cover": cover }))
            .await;
        response.assert_status_ok();
        let export = response.json::<ExportResponse>().export;
        assert!(export.starts_with("proposal_"));

        let bytes = download(&app, "exports", &export).await;
        assert_eq!(
            page_titles(&bytes),
            vec!["Cover", "A1", "A2", "B1", "B2", "B3"]
        );
    }

    #[tokio::test]
    async fn test_export_respects_caller_order() {
        let app = create_test_server();
        upload(&app, vec![("a.pdf", titled_pdf(&["A"]))]).await;
        upload(&app, vec![("b.pdf", titled_pdf(&["B"]))]).await;

        let export = app
            .server
            .post("/export")
            .json(&json!({ "files": ["b.pdf", "a.pdf", "b.pdf"] }))
            .await
            .json::<ExportResponse>()
            .export;
        let bytes = download(&app, "exports", &export).await;
        assert_eq!(page_titles(&bytes), vec!["B", "A", "B"]);
    }

    #[tokio::test]
    async fn test_export_of_missing_module_is_empty_pdf() {
        let app = create_test_server();

        let mut names = Vec::new();
        for _ in 0..2 {
            let response = app
                .server
                .post("/export")
                .json(&json!({ "files": ["missing.pdf"] }))
                .await;
            response.assert_status_ok();
            names.push(response.json::<ExportResponse>().export);
        }
        assert_ne!(names[0], names[1]);

        for name in &names {
            let bytes = download(&app, "exports", name).await;
            let doc = Document::load_mem(&bytes).unwrap();
            assert_eq!(doc.get_pages().len(), 0);
        }
    }

    #[tokio::test]
    async fn test_export_skips_corrupt_module() {
        let app = create_test_server();
        upload(
            &app,
            vec![("broken.pdf", b"%PDF-1.4 truncated".to_vec()), ("ok.pdf", titled_pdf(&["Ok"]))],
        )
        .await;

        let export = app
            .server
            .post("/export")
            .json(&json!({ "files": ["broken.pdf", "ok.pdf"] }))
            .await
            .json::<ExportResponse>()
            .export;
        let bytes = download(&app, "exports", &export).await;
        assert_eq!(page_titles(&bytes), vec!["Ok"]);
    }

    #[tokio::test]
    async fn test_download_unknown_area_is_404() {
        let app = create_test_server();
        upload(&app, vec![("a.pdf", titled_pdf(&["A"]))]).await;

        let response = app.server.get("/download/uploads/a.pdf").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let json = response.json::<Value>();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_download_missing_file_is_404() {
        let app = create_test_server();
        let response = app.server.get("/download/exports/nothing.pdf").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_download_cannot_escape_area() {
        let app = create_test_server();
        std::fs::write(app.dir.path().join("secret.pdf"), b"secret").unwrap();

        let response = app
            .server
            .get("/download/modules/..%2F..%2Fsecret.pdf")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_format() {
        let app = create_test_server();
        let response = app
            .server
            .post("/export")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let app = create_test_app(1024);
        let form = MultipartForm::new().add_part("files", pdf_part("big.pdf", vec![b'x'; 8 * 1024]));

        let response = app.server.post("/upload").multipart(form).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<Value>()["code"], "PAYLOAD_TOO_LARGE");
        assert!(!app.data_dir().join("modules").join("big.pdf").exists());
    }

    #[tokio::test]
    async fn test_oversized_json_is_413() {
        let app = create_test_app(1024);
        let files: Vec<String> = (0..200).map(|i| format!("module_{i}.pdf")).collect();

        let response = app
            .server
            .post("/export")
            .json(&json!({ "files": files }))
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<Value>()["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_index_marks_module_list_and_cover_status() {
        let app = create_test_server();
        upload(&app, vec![("a.pdf", titled_pdf(&["A"]))]).await;

        let html = app.server.get("/").await.text();
        assert!(html.contains(r#"<ul id="modules">"#));
        assert!(html.contains(r#"<ol id="order">"#));
        assert!(html.contains(r#"<p id="cover-status">"#));
    }

    #[tokio::test]
    async fn test_router_serves_health_without_test_server() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let dir = tempdir().unwrap();
        let state = AppState::from_parts(
            Arc::new(FsStore::new(dir.path()).unwrap()),
            BrandTheme::default(),
            DEFAULT_PRIMARY.to_string(),
            dir.path().join("static"),
            DEFAULT_MAX_UPLOAD_BYTES,
        );

        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
