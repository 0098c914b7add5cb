//! tingwen - 公众号文章批量转音频
//!
//! - Domain: article/, text/ (纯逻辑)
//! - Application: commands, ports
//! - Infrastructure: adapters (fetch, tts, audio, spreadsheet, storage), worker

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use tingwen::application::commands::handlers::{
    ConvertArticleHandler, FetchArticleTextHandler, MixNarrationHandler,
};
use tingwen::application::commands::{BackgroundOptions, CleanOptions, ConvertOptions};
use tingwen::application::ports::{ArticleSourcePort, OutputStoragePort, TtsEnginePort};
use tingwen::cli::{Cli, Command, RowArgs};
use tingwen::config::{load_config_from_path, print_config, AppConfig};
use tingwen::domain::article::ArticleRow;
use tingwen::infrastructure::adapters::{
    FfmpegJoiner, FfmpegJoinerConfig, FileOutputStorage, HttpArticleFetcher,
    HttpArticleFetcherConfig, HttpTtsClient, HttpTtsClientConfig, OutputLayout, SpreadsheetSource,
};
use tingwen::infrastructure::worker::{
    BatchWorker, BatchWorkerConfig, ConvertJob, FetchJob, MixJob,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("tingwen - 公众号文章批量转音频");
    print_config(&config);

    match cli.command {
        Command::Convert { rows, no_bgm, voice } => run_convert(&config, &rows, no_bgm, voice).await,
        Command::Fetch { rows } => run_fetch(&config, &rows).await,
        Command::Mix => run_mix(&config).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},tingwen={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn batch_worker(config: &AppConfig) -> BatchWorker {
    BatchWorker::new(BatchWorkerConfig {
        batch_size: config.pipeline.batch_size,
        delay_between_items: config.pipeline.article_delay(),
        delay_between_batches: config.pipeline.batch_delay(),
    })
}

async fn create_storage(config: &AppConfig) -> anyhow::Result<Arc<FileOutputStorage>> {
    let layout = OutputLayout {
        text_dir: config.output.text_dir.clone(),
        voice_dir: config.output.voice_dir.clone(),
        final_dir: config.output.final_dir.clone(),
        bgm_dir: config.bgm.dir.clone(),
    };
    Ok(Arc::new(FileOutputStorage::new(layout).await?))
}

fn create_fetcher(config: &AppConfig) -> anyhow::Result<Arc<HttpArticleFetcher>> {
    let fetcher = HttpArticleFetcher::new(HttpArticleFetcherConfig {
        timeout_secs: config.fetch.timeout_secs,
        user_agent: config.fetch.user_agent.clone(),
        accept_invalid_certs: config.fetch.accept_invalid_certs,
    })?;
    Ok(Arc::new(fetcher))
}

fn create_joiner(config: &AppConfig) -> Arc<FfmpegJoiner> {
    Arc::new(FfmpegJoiner::new(FfmpegJoinerConfig {
        ffmpeg_path: config.audio.ffmpeg_path.clone(),
        ffprobe_path: config.audio.ffprobe_path.clone(),
        bitrate: config.audio.bitrate.clone(),
    }))
}

fn background_options(config: &AppConfig) -> BackgroundOptions {
    BackgroundOptions {
        volume: config.bgm.volume,
        fade_out_secs: config.bgm.fade_out_secs,
    }
}

/// 读取表格并按命令行选择行；范围无效时返回错误
fn load_rows(rows: &RowArgs) -> anyhow::Result<Vec<ArticleRow>> {
    let selection = rows.selection()?;
    let all = SpreadsheetSource::new().load(&rows.excel)?;
    let selected = selection.apply(&all).to_vec();

    tracing::info!(
        total = all.len(),
        selected = selected.len(),
        first_row = selection.first_position(),
        mode = ?selection,
        "Rows selected"
    );
    Ok(selected)
}

async fn run_convert(
    config: &AppConfig,
    rows: &RowArgs,
    no_bgm: bool,
    voice: Option<String>,
) -> anyhow::Result<()> {
    let articles = load_rows(rows)?;

    let storage = create_storage(config).await?;
    let joiner = create_joiner(config);

    let tts = Arc::new(HttpTtsClient::new(
        HttpTtsClientConfig::new(&config.tts.url).with_timeout(config.tts.timeout_secs),
    )?);
    if !tts.health_check().await {
        tracing::warn!(url = %config.tts.url, "TTS service health check failed, continuing anyway");
    }

    let with_bgm = config.bgm.enabled && !no_bgm;
    if with_bgm {
        warn_if_no_tracks(storage.as_ref(), &config.bgm.dir).await;
        if !joiner.is_available().await {
            tracing::warn!("ffmpeg not found, multi-segment articles and mixing will fail");
        }
    }

    let options = ConvertOptions {
        voice: voice.unwrap_or_else(|| config.tts.voice.clone()),
        segment_max_chars: config.pipeline.segment_max_chars,
        segment_delay: config.pipeline.segment_delay(),
        clean: CleanOptions {
            min_body_chars: config.pipeline.min_body_chars,
        },
        background: with_bgm.then(|| background_options(config)),
    };

    let job = ConvertJob {
        handler: ConvertArticleHandler::new(create_fetcher(config)?, tts, joiner, storage.clone()),
        options,
    };

    let summary = batch_worker(config).run(&articles, &job).await;
    summary.log("convert");
    for failure in &summary.failures {
        tracing::warn!(item = %failure.item, error = %failure.error, "Failed article");
    }
    if summary.failed() > 0 {
        storage.write_failed_report(&summary.failed_articles()).await?;
    }
    tracing::info!("Done: {}", summary);
    Ok(())
}

async fn run_fetch(config: &AppConfig, rows: &RowArgs) -> anyhow::Result<()> {
    let articles = load_rows(rows)?;
    let storage = create_storage(config).await?;

    let job = FetchJob {
        handler: FetchArticleTextHandler::new(create_fetcher(config)?, storage.clone()),
        clean: CleanOptions {
            min_body_chars: config.pipeline.min_body_chars,
        },
    };

    let summary = batch_worker(config).run(&articles, &job).await;
    summary.log("fetch");
    if summary.failed() > 0 {
        let report = storage.write_failed_report(&summary.failed_articles()).await?;
        tracing::warn!(path = %report.display(), "Some articles failed, see report");
    }
    tracing::info!("Done: {}", summary);
    Ok(())
}

async fn run_mix(config: &AppConfig) -> anyhow::Result<()> {
    let storage = create_storage(config).await?;

    let tracks = storage.list_background_tracks().await?;
    if tracks.is_empty() {
        anyhow::bail!("No background tracks found in {}", config.bgm.dir.display());
    }

    let voices = storage.list_voice_files().await?;
    tracing::info!(narrations = voices.len(), tracks = tracks.len(), "Mixing narrations");

    let job = MixJob {
        handler: MixNarrationHandler::new(create_joiner(config), storage),
        options: background_options(config),
    };

    // 混音为本地处理，不需要停顿
    let worker = BatchWorker::new(BatchWorkerConfig {
        batch_size: config.pipeline.batch_size,
        delay_between_items: std::time::Duration::ZERO,
        delay_between_batches: std::time::Duration::ZERO,
    });
    let summary = worker.run(&voices, &job).await;
    summary.log("mix");
    tracing::info!("Done: {}", summary);
    Ok(())
}

async fn warn_if_no_tracks(storage: &dyn OutputStoragePort, dir: &Path) {
    match storage.list_background_tracks().await {
        Ok(tracks) if !tracks.is_empty() => {
            tracing::info!(tracks = tracks.len(), "Background tracks found");
        }
        Ok(_) => tracing::warn!(dir = %dir.display(), "No background tracks, narration will be kept without music"),
        Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "Failed to list background tracks"),
    }
}
