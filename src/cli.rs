use clap::{Parser, Subcommand};
use pawmatch_common::DogStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pawmatch")]
#[command(about = "迷子犬・保護犬の通報とマッチ照会ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 通報を送信してマッチ候補を表示
    Report {
        /// 状態 (lost/found)
        #[arg(short, long, default_value = "lost")]
        status: DogStatus,

        /// 犬の特徴
        #[arg(short, long)]
        description: Option<String>,

        /// 連絡先電話番号
        #[arg(short, long)]
        phone: Option<String>,

        /// 写真ファイル
        #[arg(long)]
        photo: Option<PathBuf>,

        /// 緯度（省略時は写真のEXIF位置）
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// 経度
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// 写真を添付せず公開URLで渡す
        #[arg(long)]
        media_url: Option<String>,

        /// 接続先オリジン（設定・環境変数より優先）
        #[arg(long)]
        backend: Option<String>,

        /// 未入力の項目を対話的に入力
        #[arg(short, long)]
        interactive: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 保存済みのサーバー応答(TwiML)を解析
    Parse {
        /// 応答ファイル（省略時は標準入力）
        input: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 接続先オリジンを設定
        #[arg(long)]
        set_backend: Option<String>,

        /// マッチ画像の配信元を設定
        #[arg(long)]
        set_asset_base: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
