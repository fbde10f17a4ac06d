use anyhow::{bail, Context, Result};
use bossdex::{
    aggregate::{boss_detail, summarize_bosses},
    config::Config,
    fetch::{Base, Fetcher},
    page::{build_detail, build_list, build_page, load_table, PageRoot},
    query::resolve_boss,
    render::render_document,
};
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::Client;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(version, about = "Render boss index and detail pages from wiki CSV data")]
struct Cli {
    /// YAML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// URL or directory that relative CSV references resolve against
    #[arg(long, global = true)]
    base: Option<String>,

    /// Write here instead of stdout
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Html, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Boss index table
    List {
        #[arg(long)]
        csv: String,
        /// Page the boss names link to
        #[arg(long)]
        detail_page: Option<String>,
    },
    /// Unit breakdown for one boss
    Detail {
        #[arg(long)]
        csv: String,
        #[arg(long, conflicts_with = "page_url")]
        boss: Option<String>,
        /// Detail page URL carrying `?boss=`
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Fill every boss root of a shell HTML page
    Page {
        #[arg(long)]
        shell: PathBuf,
        #[arg(long)]
        page_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // ─── logging ─────────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    let base = match (&cli.base, &cli.command) {
        (Some(raw), _) => Base::parse(raw),
        (None, Command::Page { shell, .. }) => Base::for_page_file(shell),
        (None, _) => Base::default(),
    };
    let fetcher = Fetcher::new(Client::new(), base);

    let output = match cli.format {
        Format::Html => render_html(&fetcher, cli.command, config).await?,
        Format::Json => render_json(&fetcher, cli.command, &config).await?,
    };

    match &cli.out {
        Some(path) => {
            tokio::fs::write(path, output)
                .await
                .with_context(|| format!("writing {:?}", path))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", output),
    }
    Ok(())
}

async fn render_html(fetcher: &Fetcher, command: Command, config: Config) -> Result<String> {
    match command {
        Command::List { csv, detail_page } => {
            let root = PageRoot::list(csv, detail_page);
            let body = build_list(fetcher, &root, &config).await.unwrap_or_else(|| {
                warn!("nothing to list");
                String::new()
            });
            render_document("ボス一覧", &body)
        }
        Command::Detail {
            csv,
            boss,
            page_url,
        } => {
            let boss = resolve_boss(boss, page_url.as_deref());
            let root = PageRoot::detail(csv);
            let body = build_detail(fetcher, &root, boss.as_deref(), &config)
                .await
                .unwrap_or_default();
            render_document(boss.as_deref().unwrap_or("ボス詳細"), &body)
        }
        Command::Page { shell, page_url } => {
            let shell_html = tokio::fs::read_to_string(&shell)
                .await
                .with_context(|| format!("reading shell page {:?}", shell))?;
            build_page(fetcher, &shell_html, page_url.as_deref(), Arc::new(config)).await
        }
    }
}

async fn render_json(fetcher: &Fetcher, command: Command, config: &Config) -> Result<String> {
    match command {
        Command::List { csv, .. } => {
            let table = load_table(fetcher, &csv).await?;
            let bosses = summarize_bosses(&table, &config.columns, config.merge_policy);
            Ok(serde_json::to_string_pretty(&bosses)?)
        }
        Command::Detail {
            csv,
            boss,
            page_url,
        } => {
            let Some(boss) = resolve_boss(boss, page_url.as_deref()) else {
                bail!("no boss specified: pass --boss or a --page-url with ?boss=");
            };
            let table = load_table(fetcher, &csv).await?;
            let outcome = boss_detail(&table, &config.columns, &boss);
            Ok(serde_json::to_string_pretty(&outcome)?)
        }
        Command::Page { .. } => bail!("json output is only available for list and detail"),
    }
}
