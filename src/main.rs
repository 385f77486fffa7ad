//! # paste-here — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与协作方装配。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use paste_here::clipboard;
use paste_here::fetch::{FetchConfig, HttpFetcher};
use paste_here::paste::{PasteOutcome, save_clipboard_content};

/// 把剪贴板内容直接粘贴为目标目录中的文件
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// 粘贴目标目录（必须已存在，不会自动创建）
    target_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let bundle = match clipboard::capture_bundle() {
        Ok(bundle) => bundle,
        Err(err) => {
            eprintln!("错误：{}", err);
            return ExitCode::from(1);
        }
    };

    let fetcher = match HttpFetcher::new(FetchConfig::default()) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            eprintln!("错误：{}", err);
            return ExitCode::from(1);
        }
    };

    match save_clipboard_content(&bundle, &cli.target_dir, &fetcher) {
        Ok(PasteOutcome::Saved(count)) => {
            println!("已保存 {} 个文件到 {}", count, cli.target_dir.display());
            ExitCode::SUCCESS
        }
        Ok(PasteOutcome::NothingApplicable) => {
            eprintln!("剪贴板为空或内容不受支持");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("错误：{}", err);
            ExitCode::from(1)
        }
    }
}
