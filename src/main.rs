//! # ComfyUI 桥接工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果输出，扮演插件面板的角色。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use comfyui_bridge::bridge::{
    BridgeConfig, BridgeService, StatusLine, render_connection, render_submission,
};
use comfyui_bridge::endpoint::BridgeVariant;
use comfyui_bridge::error::AppError;
use comfyui_bridge::export::{ExportTarget, FileDocumentSource};
use comfyui_bridge::settings::{BridgeSettings, JsonFileSettingsStore};

/// Send images to a ComfyUI bridge server.
#[derive(Parser, Debug)]
#[command(name = "comfyui-bridge", version)]
struct Cli {
    /// Plugin variant: local port or free-form URL.
    #[arg(long, value_enum, default_value_t = VariantArg::Runpod)]
    variant: VariantArg,

    /// Settings file holding the stored endpoint.
    #[arg(
        long,
        env = "COMFYUI_BRIDGE_SETTINGS",
        default_value = "comfyui-bridge-settings.json"
    )]
    settings_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export an image file as PNG and send it to the server.
    Send {
        /// Image file acting as the active document.
        file: PathBuf,

        /// Name of the active layer.
        #[arg(long)]
        layer: Option<String>,

        /// Label source: active layer or whole document.
        #[arg(long, value_enum, default_value_t = ExportTypeArg::Layer)]
        export_type: ExportTypeArg,

        /// Endpoint (port or URL) for this call only.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Query `/status` on the server.
    Test {
        /// Endpoint (port or URL) for this call only.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Read or change the stored endpoint.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the stored endpoint and its resolved base URL.
    Get,
    /// Store a new endpoint (port or URL).
    Set { value: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Classic,
    Runpod,
}

impl From<VariantArg> for BridgeVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Classic => BridgeVariant::Classic,
            VariantArg::Runpod => BridgeVariant::RunPod,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportTypeArg {
    Layer,
    Document,
}

impl From<ExportTypeArg> for ExportTarget {
    fn from(arg: ExportTypeArg) -> Self {
        match arg {
            ExportTypeArg::Layer => ExportTarget::Layer,
            ExportTypeArg::Document => ExportTarget::Document,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("运行失败: {err}");
            eprintln!("✗ {err}");
            ExitCode::FAILURE
        }
    }
}

/// 返回值表示本次操作是否成功。
async fn run(cli: Cli) -> Result<bool, AppError> {
    let variant = BridgeVariant::from(cli.variant);
    let store = JsonFileSettingsStore::new(&cli.settings_file);
    let stored = BridgeSettings::load(&store, variant);

    match cli.command {
        Command::Send {
            file,
            layer,
            export_type,
            endpoint,
        } => {
            let service = BridgeService::with_config(BridgeConfig::for_variant(variant))?;
            let settings = override_endpoint(stored, endpoint);
            let mut source = FileDocumentSource::new(file);
            if let Some(layer) = layer {
                source = source.with_layer_name(layer);
            }

            let result = service
                .send_active_document_with_progress(
                    &settings,
                    &source,
                    export_type.into(),
                    |stage| print_status(&stage.status_line()),
                )
                .await;
            let line = render_submission(&result);
            print_status(&line);
            Ok(!line.is_error())
        }
        Command::Test { endpoint } => {
            let service = BridgeService::with_config(BridgeConfig::for_variant(variant))?;
            let settings = override_endpoint(stored, endpoint);
            print_status(&StatusLine::info("Connecting..."));

            let status = service.test_connection(&settings).await;
            let line = render_connection(&status, &settings.endpoint());
            print_status(&line);
            Ok(!line.is_error())
        }
        Command::Config { action } => match action {
            ConfigAction::Get => {
                println!("{}", stored.endpoint_config);
                println!("→ {}", stored.endpoint());
                Ok(true)
            }
            ConfigAction::Set { value } => {
                let settings = BridgeSettings {
                    endpoint_config: value.trim().to_string(),
                };
                settings.save(&store, variant)?;
                log::info!("⚙️ 地址已保存 - {}", store.path().display());
                println!("→ {}", settings.endpoint());
                Ok(true)
            }
        },
    }
}

/// `--endpoint` 只作用于本次调用，不写回设置。
fn override_endpoint(stored: BridgeSettings, endpoint: Option<String>) -> BridgeSettings {
    match endpoint {
        Some(endpoint_config) => BridgeSettings { endpoint_config },
        None => stored,
    }
}

fn print_status(line: &StatusLine) {
    if line.is_error() {
        eprintln!("{}", line.text);
    } else {
        println!("{}", line.text);
    }
}
