// src/page.rs

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::aggregate::{boss_detail, summarize_bosses, DetailOutcome};
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::query::boss_from_page_url;
use crate::render::{render_detail, render_document, render_list, render_message, PageMessage};
use crate::table::RawTable;

const LIST_ROLE: &str = "boss-list";
const DETAIL_ROLE: &str = "boss-detail";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootKind {
    List,
    Detail,
}

impl RootKind {
    pub fn role(self) -> &'static str {
        match self {
            RootKind::List => LIST_ROLE,
            RootKind::Detail => DETAIL_ROLE,
        }
    }
}

/// An element of the shell page that the boss views render into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoot {
    pub kind: RootKind,
    /// `data-csv`; roots without one are skipped.
    pub csv: Option<String>,
    /// `data-detail`, list roots only.
    pub detail_page: Option<String>,
}

impl PageRoot {
    pub fn list(csv: impl Into<String>, detail_page: Option<String>) -> Self {
        Self {
            kind: RootKind::List,
            csv: Some(csv.into()),
            detail_page,
        }
    }

    pub fn detail(csv: impl Into<String>) -> Self {
        Self {
            kind: RootKind::Detail,
            csv: Some(csv.into()),
            detail_page: None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Every boss-list and boss-detail root in `shell_html`, in document order.
pub fn find_roots(shell_html: &str) -> Vec<PageRoot> {
    let doc = Html::parse_document(shell_html);
    let selector = Selector::parse(r#"[data-role="boss-list"], [data-role="boss-detail"]"#)
        .expect("CSS selector for page roots should be valid");

    doc.select(&selector)
        .filter_map(|el| {
            let attrs = el.value();
            let kind = match attrs.attr("data-role")? {
                LIST_ROLE => RootKind::List,
                DETAIL_ROLE => RootKind::Detail,
                _ => return None,
            };
            Some(PageRoot {
                kind,
                csv: non_empty(attrs.attr("data-csv")),
                detail_page: match kind {
                    RootKind::List => non_empty(attrs.attr("data-detail")),
                    RootKind::Detail => None,
                },
            })
        })
        .collect()
}

/// Text of the shell page's `<title>`, if it has a non-blank one.
pub fn shell_title(shell_html: &str) -> Option<String> {
    let doc = Html::parse_document(shell_html);
    let selector = Selector::parse("title").expect("CSS selector for title should be valid");
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Fetch and parse the CSV behind `reference`.
pub async fn load_table(fetcher: &Fetcher, reference: &str) -> Result<RawTable> {
    let text = fetcher.fetch_text(reference).await?;
    let table = RawTable::parse(&text);
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed csv"
    );
    Ok(table)
}

/// Index table for a list root.
///
/// Yields nothing when the root has no CSV, the CSV has no boss column or no
/// bosses, or loading fails. Load failures are logged, not surfaced.
#[instrument(level = "info", skip_all, fields(csv = ?root.csv))]
pub async fn build_list(fetcher: &Fetcher, root: &PageRoot, config: &Config) -> Option<String> {
    let Some(csv) = root.csv.as_deref() else {
        warn!("list root has no data-csv; skipped");
        return None;
    };
    let detail_page = root.detail_page.as_deref().unwrap_or(&config.detail_page);

    list_fragment(fetcher, csv, detail_page, config)
        .await
        .unwrap_or_else(|err| {
            error!("boss index failed: {:#}", err);
            None
        })
}

async fn list_fragment(
    fetcher: &Fetcher,
    csv: &str,
    detail_page: &str,
    config: &Config,
) -> Result<Option<String>> {
    let table = load_table(fetcher, csv).await?;
    let bosses = summarize_bosses(&table, &config.columns, config.merge_policy);
    if bosses.is_empty() {
        info!("no bosses to list");
        return Ok(None);
    }
    let html = render_list(&bosses, &config.columns, detail_page)?;
    info!(bosses = bosses.len(), "rendered boss index");
    Ok(Some(html))
}

/// Detail sections for `boss`, or the message explaining why there are none.
///
/// Always yields a fragment once the root has a CSV. A missing boss is
/// reported before anything is fetched.
#[instrument(level = "info", skip(fetcher, root, config), fields(csv = ?root.csv))]
pub async fn build_detail(
    fetcher: &Fetcher,
    root: &PageRoot,
    boss: Option<&str>,
    config: &Config,
) -> Option<String> {
    let Some(csv) = root.csv.as_deref() else {
        warn!("detail root has no data-csv; skipped");
        return None;
    };
    let Some(boss) = boss.filter(|b| !b.is_empty()) else {
        info!("no boss specified");
        return Some(render_message(PageMessage::NotSpecified));
    };

    let html = detail_fragment(fetcher, csv, boss, config)
        .await
        .unwrap_or_else(|err| {
            error!("boss detail failed: {:#}", err);
            render_message(PageMessage::LoadError)
        });
    Some(html)
}

async fn detail_fragment(
    fetcher: &Fetcher,
    csv: &str,
    boss: &str,
    config: &Config,
) -> Result<String> {
    let table = load_table(fetcher, csv).await?;
    let html = match boss_detail(&table, &config.columns, boss) {
        DetailOutcome::Found(detail) => {
            info!(units = detail.units.len(), "rendered boss detail");
            render_detail(&detail)?
        }
        DetailOutcome::EmptyTable => render_message(PageMessage::EmptyTable),
        DetailOutcome::MissingBossColumn => {
            warn!(label = %config.columns.boss, "boss column not found");
            render_message(PageMessage::MissingBossColumn)
        }
        DetailOutcome::NoData => {
            info!("no rows for boss");
            render_message(PageMessage::NoData)
        }
    };
    Ok(html)
}

/// Render every root of `shell_html` into one standalone document.
///
/// Each root fetches and renders on its own task; fragments are placed back in
/// document order inside a `<div data-role=...>` matching the shell root.
#[instrument(level = "info", skip_all, fields(page_url = ?page_url))]
pub async fn build_page(
    fetcher: &Fetcher,
    shell_html: &str,
    page_url: Option<&str>,
    config: Arc<Config>,
) -> Result<String> {
    let roots = find_roots(shell_html);
    if roots.is_empty() {
        warn!("shell page has no boss roots");
    }
    let boss = page_url.and_then(boss_from_page_url);

    let mut handles = Vec::with_capacity(roots.len());
    for root in roots {
        let fetcher = fetcher.clone();
        let config = Arc::clone(&config);
        let boss = boss.clone();
        handles.push(tokio::spawn(async move {
            let fragment = match root.kind {
                RootKind::List => build_list(&fetcher, &root, &config).await,
                RootKind::Detail => build_detail(&fetcher, &root, boss.as_deref(), &config).await,
            };
            (root.kind, fragment)
        }));
    }

    let mut body = String::new();
    for handle in handles {
        let (kind, fragment) = handle.await.context("page root task panicked")?;
        body.push_str(&format!("<div data-role=\"{}\">\n", kind.role()));
        body.push_str(fragment.as_deref().unwrap_or_default());
        body.push_str("</div>\n");
    }

    let title = shell_title(shell_html)
        .or(boss)
        .unwrap_or_else(|| "ボス一覧".to_string());
    render_document(&title, &body)
}
