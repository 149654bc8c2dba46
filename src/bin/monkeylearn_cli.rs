//! monkeylearn-cli: MonkeyLearn 命令行工具：分类、抽取、模型查询
//!
//! Usage:
//!   monkeylearn-cli classify <model_id> <text>... [options]   Classify texts
//!   monkeylearn-cli extract <model_id> <text>... [options]    Run an extractor
//!   monkeylearn-cli detail <classifier|extractor|workflow> <id>
//!   monkeylearn-cli list <classifiers|extractors> [options]
//!   monkeylearn-cli config [--config <path>]                  Show resolved configuration

use anyhow::{anyhow, bail, Context};
use monkeylearn_rust::{
    ApiVersion, ClassifyOptions, Config, ExtractOptions, ListOptions, MonkeyLearnClient,
    MultiResponse, Response,
};
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "classify" => cmd_classify(&args[2..]).await,
        "extract" => cmd_extract(&args[2..]).await,
        "detail" => cmd_detail(&args[2..]).await,
        "list" => cmd_list(&args[2..]).await,
        "config" => cmd_config(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"monkeylearn-cli: MonkeyLearn 命令行工具

USAGE:
    monkeylearn-cli <COMMAND> [OPTIONS]

COMMANDS:
    classify <model_id> <text>...         Classify texts ("-" reads lines from stdin)
    extract <model_id> <text>...          Run an extractor over texts
    detail <kind> <id>                    Show a classifier, extractor or workflow
    list <classifiers|extractors>         List models
    config                                Show the resolved configuration
    version                               Show version information
    help                                  Show this help message

OPTIONS:
    --config <path>        YAML configuration overlaid on the environment
    --batch-size <n>       Items per request (1..=200)
    --no-batch             Send all texts in one request
    --api-version <v2|v3>  API version for this call
    --sandbox              v2 classify: use the sandbox model
    --production           v3: use the production model
    --page <n>, --per-page <n>, --order-by <fields>   list pagination

ENVIRONMENT:
    MONKEYLEARN_TOKEN               API token
    MONKEYLEARN_API_BASE_URL        Base URL (default https://api.monkeylearn.com/v3/)
    MONKEYLEARN_RETRY_IF_THROTTLE   Wait and retry when throttled (default true)
    MONKEYLEARN_AUTO_BATCH          Split large inputs into batches (default true)
    RUST_LOG                        Log filter (default warn)"#
    );
}

fn cmd_version() {
    println!(
        "monkeylearn-cli {} (monkeylearn-rust {})",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_VERSION"),
    );
}

/// Flags shared by every command, plus the remaining positional arguments.
#[derive(Debug, Default)]
struct Flags {
    positional: Vec<String>,
    config: Option<String>,
    batch_size: Option<usize>,
    no_batch: bool,
    api_version: Option<ApiVersion>,
    sandbox: bool,
    production: bool,
    page: Option<u32>,
    per_page: Option<u32>,
    order_by: Option<String>,
}

fn flag_value<'a>(args: &'a [String], i: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{name} requires a value"))
}

fn parse_flags(args: &[String]) -> anyhow::Result<Flags> {
    let mut flags = Flags::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--config" => {
                flags.config = Some(flag_value(args, i, arg)?.to_string());
                i += 1;
            }
            "--batch-size" => {
                flags.batch_size = Some(
                    flag_value(args, i, arg)?
                        .parse()
                        .context("--batch-size must be a number")?,
                );
                i += 1;
            }
            "--api-version" => {
                flags.api_version = Some(flag_value(args, i, arg)?.parse()?);
                i += 1;
            }
            "--page" => {
                flags.page = Some(flag_value(args, i, arg)?.parse().context("--page must be a number")?);
                i += 1;
            }
            "--per-page" => {
                flags.per_page = Some(
                    flag_value(args, i, arg)?
                        .parse()
                        .context("--per-page must be a number")?,
                );
                i += 1;
            }
            "--order-by" => {
                flags.order_by = Some(flag_value(args, i, arg)?.to_string());
                i += 1;
            }
            "--no-batch" => flags.no_batch = true,
            "--sandbox" => flags.sandbox = true,
            "--production" => flags.production = true,
            s if s.starts_with("--") => bail!("Unknown option: {s}"),
            _ => flags.positional.push(args[i].clone()),
        }
        i += 1;
    }
    Ok(flags)
}

fn load_config(flags: &Flags) -> anyhow::Result<Config> {
    match &flags.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading {path}")),
        None => Ok(Config::from_env()),
    }
}

fn build_client(flags: &Flags) -> anyhow::Result<MonkeyLearnClient> {
    let client = MonkeyLearnClient::builder()
        .config(load_config(flags)?)
        .build()?;
    Ok(client)
}

/// Positional texts after the model id; a single "-" reads stdin line by line.
fn read_texts(positional: &[String]) -> anyhow::Result<Vec<String>> {
    if positional == ["-"] {
        let stdin = std::io::stdin();
        let mut texts = Vec::new();
        for line in stdin.lock().lines() {
            let line = line?;
            if !line.trim().is_empty() {
                texts.push(line);
            }
        }
        return Ok(texts);
    }
    Ok(positional.to_vec())
}

fn print_multi(result: &MultiResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result.body())?);
    eprintln!(
        "requests: {}, queries used: {}, remaining: {}/{}",
        result.responses().len(),
        result.request_queries_used(),
        result.plan_queries_remaining(),
        result.plan_queries_allowed(),
    );
    Ok(())
}

fn print_response(response: &Response) -> anyhow::Result<()> {
    match response.body() {
        Some(body) => println!("{}", serde_json::to_string_pretty(body)?),
        None => println!("(HTTP {}, empty body)", response.status()),
    }
    Ok(())
}

async fn cmd_classify(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let (model_id, rest) = flags
        .positional
        .split_first()
        .ok_or_else(|| anyhow!("usage: classify <model_id> <text>..."))?;
    let texts = read_texts(rest)?;

    let mut options = ClassifyOptions::new().sandbox(flags.sandbox);
    if let Some(size) = flags.batch_size {
        options = options.batch_size(size);
    }
    if flags.no_batch {
        options = options.auto_batch(false);
    }
    if let Some(version) = flags.api_version {
        options = options.api_version(version);
    }
    if flags.production {
        options = options.production_model(true);
    }

    let client = build_client(&flags)?;
    let result = client.classifiers().classify(model_id, &texts, &options).await?;
    print_multi(&result)
}

async fn cmd_extract(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let (model_id, rest) = flags
        .positional
        .split_first()
        .ok_or_else(|| anyhow!("usage: extract <model_id> <text>..."))?;
    let texts = read_texts(rest)?;

    let mut options = ExtractOptions::new();
    if let Some(size) = flags.batch_size {
        options = options.batch_size(size);
    }
    if flags.no_batch {
        options = options.auto_batch(false);
    }
    if let Some(version) = flags.api_version {
        options = options.api_version(version);
    }
    if flags.production {
        options = options.production_model(true);
    }

    let client = build_client(&flags)?;
    let result = client.extractors().extract(model_id, &texts, &options).await?;
    print_multi(&result)
}

async fn cmd_detail(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let [kind, id] = flags.positional.as_slice() else {
        bail!("usage: detail <classifier|extractor|workflow> <id>");
    };
    let client = build_client(&flags)?;
    let response = match kind.as_str() {
        "classifier" => client.classifiers().detail(id).await?,
        "extractor" => client.extractors().detail(id).await?,
        "workflow" => client.workflows().detail(id).await?,
        other => bail!("Unknown model kind: {other}"),
    };
    print_response(&response)
}

async fn cmd_list(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let [kind] = flags.positional.as_slice() else {
        bail!("usage: list <classifiers|extractors>");
    };
    let mut options = ListOptions::new();
    if let Some(page) = flags.page {
        options = options.page(page);
    }
    if let Some(per_page) = flags.per_page {
        options = options.per_page(per_page);
    }
    if let Some(order_by) = &flags.order_by {
        let fields: Vec<&str> = order_by.split(',').map(str::trim).collect();
        options = options.order_by(fields);
    }

    let client = build_client(&flags)?;
    let response = match kind.as_str() {
        "classifiers" => client.classifiers().list(&options).await?,
        "extractors" => client.extractors().list(&options).await?,
        other => bail!("Unknown model list: {other}"),
    };
    print_response(&response)
}

fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let config = load_config(&flags)?;
    println!("{config:#?}");
    Ok(())
}
