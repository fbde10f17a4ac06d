// src/render.rs

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde_json::json;

use crate::aggregate::{BossDetail, BossSummary, UnitDetail};
use crate::query::detail_href;
use crate::table::{Column, ColumnLabels};

/// Stylesheet placed in the head of every rendered document.
pub const STYLE: &str = r#"
table.boss-index-table {
  border-collapse: collapse;
  width: 100%;
  max-width: 900px;
}
table.boss-index-table th,
table.boss-index-table td {
  border: 1px solid #ddd;
  padding: 4px 6px;
  font-size: 13px;
}
table.boss-index-table th {
  background: #f5f5f5;
}
.boss-unit-block {
  border: 1px solid #e0e0e0;
  border-radius: 4px;
  padding: 8px 10px;
  margin: 8px 0;
  font-size: 13px;
}
.boss-unit-block:hover {
  background: #fafafa;
}
.boss-unit-block h3 {
  margin: 0 0 4px;
  font-size: 14px;
}
.boss-unit-block p {
  margin: 2px 0;
}
"#;

const LIST_TEMPLATE: &str = r#"<table class="boss-index-table">
<thead><tr>{{#each labels}}<th>{{this}}</th>{{/each}}</tr></thead>
<tbody>
{{#each bosses}}
<tr><td><a href="{{href}}">{{name}}</a></td><td>{{place}}</td><td>{{hp}}</td><td>{{exp}}</td><td>{{gold}}</td></tr>
{{/each}}
</tbody>
</table>
"#;

const DETAIL_TEMPLATE: &str = r#"<h2>{{boss}}</h2>
{{#if place}}
<p>出現場所：{{place}}</p>
{{/if}}
{{#each units}}
<section class="boss-unit-block">
<h3>{{title}}</h3>
<p>{{status}}</p>
{{#if note}}
<p>特徴・メモ：{{note}}</p>
{{/if}}
{{#if source}}
<p>参考元：{{source}}</p>
{{/if}}
</section>
{{/each}}
"#;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>{{{style}}}</style>
</head>
<body>
{{{body}}}
</body>
</html>
"#;

/// User-facing states of a page root that has no table or sections to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMessage {
    /// Detail page opened without a boss.
    NotSpecified,
    /// The CSV has no data rows.
    EmptyTable,
    /// The CSV header has no boss-name column.
    MissingBossColumn,
    /// No row belongs to the requested boss.
    NoData,
    /// The CSV could not be fetched.
    LoadError,
}

impl PageMessage {
    pub fn text(self) -> &'static str {
        match self {
            PageMessage::NotSpecified => "ボスが指定されていません。",
            PageMessage::EmptyTable => "データが見つかりません。",
            PageMessage::MissingBossColumn => "ボス名の列が見つかりません。",
            PageMessage::NoData => "指定されたボスのデータが見つかりません。",
            PageMessage::LoadError => "読み込み中にエラーが発生しました。",
        }
    }
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars
}

/// Index table: one row per boss, the name linking to its detail page.
pub fn render_list(
    bosses: &[BossSummary],
    labels: &ColumnLabels,
    detail_page: &str,
) -> Result<String> {
    let header: Vec<&str> = [Column::Boss, Column::Place, Column::Hp, Column::Exp, Column::Gold]
        .into_iter()
        .map(|c| labels.label(c))
        .collect();
    let rows: Vec<_> = bosses
        .iter()
        .map(|b| {
            json!({
                "name": b.name,
                "href": detail_href(detail_page, &b.name),
                "place": b.place,
                "hp": b.hp,
                "exp": b.exp,
                "gold": b.gold,
            })
        })
        .collect();

    get_handlebars()
        .render_template(LIST_TEMPLATE, &json!({ "labels": header, "bosses": rows }))
        .context("rendering boss index")
}

/// Boss heading, shared location, then one block per unit.
pub fn render_detail(detail: &BossDetail) -> Result<String> {
    let units: Vec<_> = detail
        .units
        .iter()
        .map(|u| {
            json!({
                "title": unit_title(u, &detail.boss),
                "status": unit_status(u),
                "note": u.note,
                "source": u.source,
            })
        })
        .collect();

    get_handlebars()
        .render_template(
            DETAIL_TEMPLATE,
            &json!({
                "boss": detail.boss,
                "place": detail.place,
                "units": units,
            }),
        )
        .with_context(|| format!("rendering detail for {}", detail.boss))
}

/// Message texts are fixed and need no escaping.
pub fn render_message(message: PageMessage) -> String {
    format!("<p class=\"boss-message\">{}</p>\n", message.text())
}

/// Wrap rendered fragments in a standalone document carrying [`STYLE`].
pub fn render_document(title: &str, body: &str) -> Result<String> {
    get_handlebars()
        .render_template(
            DOCUMENT_TEMPLATE,
            &json!({ "title": title, "style": STYLE, "body": body }),
        )
        .context("rendering document")
}

fn unit_title(unit: &UnitDetail, boss: &str) -> String {
    let name: &str = if unit.unit.is_empty() { boss } else { &unit.unit };
    if unit.count.is_empty() {
        name.to_string()
    } else {
        format!("{}（{}体）", name, unit.count)
    }
}

fn unit_status(unit: &UnitDetail) -> String {
    [("HP", &unit.hp), ("経験値", &unit.exp), ("ゴールド", &unit.gold)]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{}：{}", label, value))
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn select_text(html: &str, css: &str) -> Vec<String> {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(css).expect("valid selector");
        doc.select(&sel)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    fn unit(name: &str, count: &str, hp: &str, exp: &str, gold: &str) -> UnitDetail {
        UnitDetail {
            unit: name.to_string(),
            count: count.to_string(),
            hp: hp.to_string(),
            exp: exp.to_string(),
            gold: gold.to_string(),
            ..UnitDetail::default()
        }
    }

    #[test]
    fn list_renders_header_and_linked_rows() -> Result<()> {
        let bosses = vec![
            BossSummary {
                name: "りゅうおう".to_string(),
                place: "りゅうおうの城".to_string(),
                hp: "100".to_string(),
                ..BossSummary::default()
            },
            BossSummary {
                name: "<b>&co".to_string(),
                ..BossSummary::default()
            },
        ];
        let html = render_list(&bosses, &ColumnLabels::default(), "detail.html")?;

        assert_eq!(
            select_text(&html, "th"),
            vec!["ボス戦名", "出現場所", "HP", "経験値", "ゴールド"]
        );
        assert_eq!(select_text(&html, "tbody tr").len(), 2);
        assert_eq!(select_text(&html, "td a"), vec!["りゅうおう", "<b>&co"]);

        let doc = Html::parse_fragment(&html);
        let sel = Selector::parse("td a").expect("valid selector");
        let hrefs: Vec<&str> = doc
            .select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs[0], detail_href("detail.html", "りゅうおう"));
        assert_eq!(hrefs[1], detail_href("detail.html", "<b>&co"));
        Ok(())
    }

    #[test]
    fn detail_renders_blocks_and_skips_empty_parts() -> Result<()> {
        let detail = BossDetail {
            boss: "りゅうおう".to_string(),
            place: "りゅうおうの城".to_string(),
            units: vec![
                UnitDetail {
                    note: "炎を吐く".to_string(),
                    source: "攻略本".to_string(),
                    ..unit("りゅうおう（変身）", "1", "130", "", "0")
                },
                unit("", "", "", "", ""),
            ],
        };
        let html = render_detail(&detail)?;

        assert_eq!(select_text(&html, "h2"), vec!["りゅうおう"]);
        assert_eq!(
            select_text(&html, "section.boss-unit-block h3"),
            vec!["りゅうおう（変身）（1体）", "りゅうおう"]
        );
        let paragraphs = select_text(&html, "section.boss-unit-block p");
        assert_eq!(
            paragraphs,
            vec![
                "HP：130 / ゴールド：0",
                "特徴・メモ：炎を吐く",
                "参考元：攻略本",
                "",
            ]
        );
        assert!(select_text(&html, "p")
            .iter()
            .any(|p| p == "出現場所：りゅうおうの城"));
        Ok(())
    }

    #[test]
    fn detail_without_place_has_no_place_line() -> Result<()> {
        let detail = BossDetail {
            boss: "A".to_string(),
            place: String::new(),
            units: vec![unit("a", "", "1", "2", "3")],
        };
        let html = render_detail(&detail)?;
        assert!(!html.contains("出現場所"));
        assert_eq!(
            select_text(&html, "section p"),
            vec!["HP：1 / 経験値：2 / ゴールド：3"]
        );
        Ok(())
    }

    #[test]
    fn messages_and_document_wrap() -> Result<()> {
        let body = render_message(PageMessage::NoData);
        assert_eq!(
            select_text(&body, "p.boss-message"),
            vec!["指定されたボスのデータが見つかりません。"]
        );

        let doc = render_document("ボス一覧", &body)?;
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("table.boss-index-table"));
        assert!(doc.contains(r#"<p class="boss-message">"#));
        Ok(())
    }
}
