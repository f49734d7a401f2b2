// 发送 / 测试连接完整链路的集成测试
mod common;

use std::cell::RefCell;
use std::io::{Cursor, ErrorKind as IoErrorKind};
use std::net::TcpListener;

use base64::{Engine as _, engine::general_purpose};
use comfyui_bridge::bridge::{
    BridgeConfig, BridgeError, BridgeService, ConnectionStatus, ErrorKind, ImagePayload,
    NO_ACTIVE_DOCUMENT, SendStage, SubmissionResult,
};
use comfyui_bridge::endpoint::BridgeVariant;
use comfyui_bridge::export::{DocumentInfo, DocumentSource, ExportTarget, FileDocumentSource};
use comfyui_bridge::settings::{BridgeSettings, MemorySettingsStore, SettingsStore};
use common::{OneShotServer, request_json};

fn test_service(variant: BridgeVariant) -> BridgeService {
    let config = BridgeConfig {
        use_system_proxy: false,
        ..BridgeConfig::for_variant(variant)
    };
    BridgeService::with_config(config).expect("service init failed")
}

fn settings_for(base_url: String) -> BridgeSettings {
    BridgeSettings {
        endpoint_config: format!("{}/", base_url),
    }
}

fn png_bytes() -> Vec<u8> {
    let image = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        2,
        image::Rgba([0, 0, 0, 255]),
    ));
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encode png failed");
    cursor.into_inner()
}

/// 内存中的宿主文档，带固定导出内容。
struct StubDocument {
    info: Option<DocumentInfo>,
    export: Result<Vec<u8>, String>,
}

impl DocumentSource for StubDocument {
    fn active_document(&self) -> Option<DocumentInfo> {
        self.info.clone()
    }

    fn export_png(&self, _document: &DocumentInfo) -> Result<Vec<u8>, BridgeError> {
        self.export
            .clone()
            .map_err(BridgeError::Precondition)
    }
}

#[tokio::test]
async fn no_active_document_fails_before_any_request() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
    listener.set_nonblocking(true).expect("set nonblocking failed");
    let port = listener.local_addr().expect("read local addr failed").port();

    let source = StubDocument {
        info: None,
        export: Ok(vec![1]),
    };
    let settings = BridgeSettings {
        endpoint_config: port.to_string(),
    };

    let result = test_service(BridgeVariant::Classic)
        .send_active_document(&settings, &source, ExportTarget::Layer)
        .await;

    assert_eq!(
        result,
        SubmissionResult::Failure {
            kind: ErrorKind::PreconditionError,
            message: NO_ACTIVE_DOCUMENT.to_string(),
        }
    );
    assert!(matches!(
        listener.accept(),
        Err(ref err) if err.kind() == IoErrorKind::WouldBlock
    ));
}

#[tokio::test]
async fn export_failure_is_precondition_error() {
    let source = StubDocument {
        info: Some(DocumentInfo {
            name: "broken.psd".to_string(),
            active_layer: None,
        }),
        export: Err("export plugin crashed".to_string()),
    };

    let result = test_service(BridgeVariant::RunPod)
        .send_active_document(
            &BridgeSettings::default_for(BridgeVariant::RunPod),
            &source,
            ExportTarget::Document,
        )
        .await;

    assert_eq!(
        result,
        SubmissionResult::Failure {
            kind: ErrorKind::PreconditionError,
            message: "export plugin crashed".to_string(),
        }
    );
}

#[tokio::test]
async fn send_file_document_with_stored_settings() {
    let server = OneShotServer::start("200 OK", r#"{"image_id":"img_0001"}"#);

    let store = MemorySettingsStore::new();
    settings_for(server.base_url())
        .save(&store, BridgeVariant::RunPod)
        .expect("save settings failed");
    let settings = BridgeSettings::load(&store, BridgeVariant::RunPod);

    let dir = std::env::temp_dir().join(format!("comfyui_bridge_flow_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir failed");
    let path = dir.join("canvas.png");
    let png = png_bytes();
    std::fs::write(&path, &png).expect("write temp png failed");

    let source = FileDocumentSource::new(&path).with_layer_name("Foreground");
    let stages = RefCell::new(Vec::new());

    let result = test_service(BridgeVariant::RunPod)
        .send_active_document_with_progress(&settings, &source, ExportTarget::Layer, |stage| {
            stages.borrow_mut().push(stage)
        })
        .await;
    let request = server.finish();
    let _ = std::fs::remove_dir_all(&dir);

    assert_eq!(
        result,
        SubmissionResult::Success {
            server_image_id: "img_0001".to_string()
        }
    );
    assert_eq!(
        stages.into_inner(),
        vec![
            SendStage::CheckingDocument,
            SendStage::Exporting,
            SendStage::ReadingFile,
            SendStage::Sending
        ]
    );

    let json = request_json(&request);
    assert_eq!(json["layer_name"], "Foreground");
    let decoded = general_purpose::STANDARD
        .decode(json["image_data"].as_str().expect("image_data should be a string"))
        .expect("image_data should decode");
    assert_eq!(decoded, png);
}

#[tokio::test]
async fn settings_change_is_picked_up_on_next_call() {
    let first = OneShotServer::start("200 OK", r#"{"status":"first"}"#);
    let second = OneShotServer::start("200 OK", r#"{"status":"second"}"#);
    let store = MemorySettingsStore::new();
    let service = test_service(BridgeVariant::RunPod);

    settings_for(first.base_url())
        .save(&store, BridgeVariant::RunPod)
        .expect("save settings failed");
    let status_a = service
        .test_connection(&BridgeSettings::load(&store, BridgeVariant::RunPod))
        .await;

    settings_for(second.base_url())
        .save(&store, BridgeVariant::RunPod)
        .expect("save settings failed");
    let status_b = service
        .test_connection(&BridgeSettings::load(&store, BridgeVariant::RunPod))
        .await;

    first.finish();
    second.finish();

    assert!(matches!(status_a, ConnectionStatus::Success { ref status_text, .. } if status_text == "first"));
    assert!(matches!(status_b, ConnectionStatus::Success { ref status_text, .. } if status_text == "second"));
    assert!(store.get("comfyui-bridge-settings").expect("get failed").is_some());
}

#[tokio::test]
async fn concurrent_submit_and_status_do_not_interfere() {
    let submit_server = OneShotServer::start("200 OK", r#"{"image_id":"concurrent-1"}"#);
    let status_server = OneShotServer::start(
        "200 OK",
        r#"{"status":"busy","received_images_count":7}"#,
    );
    let service = test_service(BridgeVariant::RunPod);
    let submit_settings = settings_for(submit_server.base_url());
    let status_settings = settings_for(status_server.base_url());

    let payload = ImagePayload::new(vec![0x00, 0xFF, 0x10], "Concurrent layer");
    let (submitted, status) = tokio::join!(
        service.submit(&submit_settings, payload),
        service.test_connection(&status_settings)
    );

    let submit_request = submit_server.finish();
    let status_request = status_server.finish();

    assert_eq!(
        submitted,
        SubmissionResult::Success {
            server_image_id: "concurrent-1".to_string()
        }
    );
    assert_eq!(
        status,
        ConnectionStatus::Success {
            status_text: "busy".to_string(),
            received_count: Some(7),
        }
    );
    assert!(submit_request.starts_with("POST /send_image"));
    assert!(status_request.starts_with("GET /status"));
    assert_eq!(request_json(&submit_request)["layer_name"], "Concurrent layer");
}

#[tokio::test]
async fn concurrent_submits_with_distinct_payloads() {
    let server_a = OneShotServer::start("200 OK", r#"{"image_id":"a"}"#);
    let server_b = OneShotServer::start("503 Service Unavailable", "warming up");
    let service = test_service(BridgeVariant::Classic);
    let settings_a = BridgeSettings {
        endpoint_config: server_a.base_url(),
    };
    let settings_b = BridgeSettings {
        endpoint_config: server_b.base_url(),
    };

    let (result_a, result_b) = tokio::join!(
        service.submit(&settings_a, ImagePayload::new(vec![1, 2], "A")),
        service.submit(&settings_b, ImagePayload::new(vec![3, 4], "B"))
    );

    let request_a = server_a.finish();
    let request_b = server_b.finish();

    assert_eq!(
        result_a,
        SubmissionResult::Success {
            server_image_id: "a".to_string()
        }
    );
    assert_eq!(
        result_b,
        SubmissionResult::Failure {
            kind: ErrorKind::ServerError,
            message: "Server responded with 503: warming up".to_string(),
        }
    );
    assert_eq!(request_json(&request_a)["layer_name"], "A");
    assert_eq!(request_json(&request_b)["layer_name"], "B");
}
