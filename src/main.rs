// ==========================================
// 设备停机 OEE 分析引擎 - 命令行入口
// ==========================================
// 用法:
//   downtime-oee --machines <json> --events <json|csv> [--work-hours <json>]
//                [--config <json>] [--now <YYYY-MM-DDTHH:MM:SS>]
//                [--window <TODAY|LAST_24_HOURS|LAST_7_DAYS|LAST_30_DAYS|ALL>]
//                [--fallback-dir <dir>] [--locale <zh-CN|en>] [--log-json]
//   downtime-oee --dir <dir> ...   (machines.json / events.csv|json / work_hours.json)
// 报告以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use downtime_oee::config::ConfigManager;
use downtime_oee::domain::types::AnalysisWindow;
use downtime_oee::source::{
    parse_timestamp, AnalyticsDataSource, FallbackDataSource, FileDataSource,
};
use downtime_oee::{i18n, logging, AnalyticsApi};

const USAGE: &str = "用法: downtime-oee (--dir <dir> | --machines <json> --events <json|csv>) \
[--work-hours <json>] [--config <json>] [--now <YYYY-MM-DDTHH:MM:SS>] [--window <WINDOW>] \
[--fallback-dir <dir>] [--locale <zh-CN|en>] [--log-json]";

#[derive(Debug, Default)]
struct CliArgs {
    dir: Option<PathBuf>,
    machines: Option<PathBuf>,
    events: Option<PathBuf>,
    work_hours: Option<PathBuf>,
    config: Option<PathBuf>,
    now: Option<String>,
    window: Option<String>,
    fallback_dir: Option<PathBuf>,
    locale: Option<String>,
    log_json: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = std::env::args().skip(1);

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .with_context(|| format!("参数 {} 缺少取值", flag))
        };
        match flag.as_str() {
            "--dir" => parsed.dir = Some(value()?.into()),
            "--machines" => parsed.machines = Some(value()?.into()),
            "--events" => parsed.events = Some(value()?.into()),
            "--work-hours" => parsed.work_hours = Some(value()?.into()),
            "--config" => parsed.config = Some(value()?.into()),
            "--now" => parsed.now = Some(value()?),
            "--window" => parsed.window = Some(value()?),
            "--fallback-dir" => parsed.fallback_dir = Some(value()?.into()),
            "--locale" => parsed.locale = Some(value()?),
            "--log-json" => parsed.log_json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("未知参数: {}\n{}", other, USAGE),
        }
    }

    Ok(parsed)
}

fn build_source(args: &CliArgs) -> Result<Arc<dyn AnalyticsDataSource>> {
    let primary = match (&args.dir, &args.machines, &args.events) {
        (_, Some(machines), Some(events)) => {
            let source = FileDataSource::new(machines, events);
            match &args.work_hours {
                Some(path) => source.with_work_hours(path),
                None => source,
            }
        }
        (Some(dir), None, None) => FileDataSource::from_dir(dir),
        _ => bail!("必须指定 --dir 或同时指定 --machines 与 --events\n{}", USAGE),
    };

    let source: Arc<dyn AnalyticsDataSource> = match &args.fallback_dir {
        Some(dir) => Arc::new(FallbackDataSource::new(
            primary,
            FileDataSource::from_dir(dir),
        )),
        None => Arc::new(primary),
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    if let Some(locale) = &args.locale {
        i18n::set_locale(locale);
    }

    tracing::info!("{} v{}", downtime_oee::APP_NAME, downtime_oee::VERSION);

    let now = match &args.now {
        Some(raw) => Some(
            parse_timestamp(raw).with_context(|| format!("--now 时间格式错误: {}", raw))?,
        ),
        None => None,
    };

    // 配置: 文件 → 环境变量覆写
    let source = build_source(&args)?;
    let api = match &args.config {
        Some(path) => AnalyticsApi::from_config_file(source, path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?,
        None => AnalyticsApi::new(source, ConfigManager::new().with_env_overrides().load()),
    };

    let window = match &args.window {
        Some(raw) => {
            AnalysisWindow::from_str(raw).with_context(|| format!("--window 取值错误: {}", raw))?
        }
        None => api.engine().config().pareto_window,
    };

    let report = api
        .run_report_with_window(window, now)
        .await
        .context("分析失败")?;

    if report.no_data {
        tracing::warn!("{}", i18n::t("report.no_data"));
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
