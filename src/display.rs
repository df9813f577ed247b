//! Terminal presentation for research results, prices and news

use colored::*;

use crate::agent::ResearchResult;
use crate::fetchers::{NewsReport, PriceQuote, SourceReport, SourceStatus};

/// Format a USD price: grouped with 2 decimals from $1 up, 6 decimals below
pub fn format_price(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v >= 1.0 => format!("${}", group_thousands(&format!("{:.2}", v))),
        Some(v) => format!("${:.6}", v),
    }
}

/// Signed percentage label, `+` only for gains
pub fn percentage_label(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v > 0.0 => format!("+{:.2}%", v),
        Some(v) => format!("{:.2}%", v),
    }
}

/// Percentage label colored by direction
pub fn format_percentage(value: Option<f64>) -> ColoredString {
    let label = percentage_label(value);
    match value {
        None => label.dimmed(),
        Some(v) if v > 0.0 => label.green().bold(),
        Some(v) if v < 0.0 => label.red().bold(),
        Some(_) => label.yellow(),
    }
}

/// Abbreviate large USD amounts with T/B/M/K suffixes
pub fn format_large_number(value: Option<f64>) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let Some(v) = value else {
        return "N/A".to_string();
    };
    for (scale, suffix) in SUFFIXES {
        if v >= scale {
            return format!("${:.2}{}", v / scale, suffix);
        }
    }
    format!("${:.2}", v)
}

/// Insert `,` separators into the integer part of a formatted number
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Lay out label/value rows with the values right-aligned
pub fn table_rows(rows: &[(&str, String)]) -> Vec<String> {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| {
            if label.is_empty() && value.is_empty() {
                String::new()
            } else {
                format!("{:<lw$}  {:>vw$}", label, value, lw = label_width, vw = value_width)
            }
        })
        .collect()
}

/// Boxed block of text with an optional title
pub fn panel(title: &str, body: &[String]) -> Vec<String> {
    let width = body
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count() + 2))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(body.len() + 2);
    if title.is_empty() {
        lines.push(format!("╭{}╮", "─".repeat(width + 2)));
    } else {
        let fill = width + 2 - title.chars().count() - 2;
        lines.push(format!("╭─ {} {}╮", title, "─".repeat(fill.saturating_sub(1))));
    }
    for line in body {
        let pad = width - line.chars().count();
        lines.push(format!("│ {}{} │", line, " ".repeat(pad)));
    }
    lines.push(format!("╰{}╯", "─".repeat(width + 2)));
    lines
}

/// Plain-text rendering of the Markdown the model writes its report in
///
/// Headings lose their `#` markers (levels 1 and 2 get an underline), list
/// markers become bullets, emphasis and code markers are dropped and links
/// are written as `label (url)`.
pub fn markdown_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.starts_with("```") {
            continue;
        }
        if let Some((level, title)) = heading(trimmed) {
            let title = strip_inline(title);
            let width = title.chars().count();
            lines.push(title);
            match level {
                1 => lines.push("═".repeat(width)),
                2 => lines.push("─".repeat(width)),
                _ => {}
            }
            continue;
        }
        if is_rule(trimmed) {
            lines.push("─".repeat(40));
            continue;
        }
        if let Some(item) = ["- ", "* ", "+ "].iter().find_map(|m| trimmed.strip_prefix(*m)) {
            lines.push(format!("{}• {}", indent, strip_inline(item)));
            continue;
        }
        if let Some(quote) = trimmed.strip_prefix('>') {
            lines.push(format!("{}│ {}", indent, strip_inline(quote.trim_start())));
            continue;
        }
        lines.push(format!("{}{}", indent, strip_inline(trimmed)));
    }
    lines
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    let rest = &line[level..];
    if (1..=6).contains(&level) && rest.starts_with(' ') {
        Some((level, rest.trim()))
    } else {
        None
    }
}

fn is_rule(line: &str) -> bool {
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3 && matches!(marks[0], '-' | '*' | '_') && marks.iter().all(|c| *c == marks[0])
}

fn strip_inline(text: &str) -> String {
    let text = text.replace("**", "").replace("__", "").replace('`', "");

    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find("](").map(|i| open + i) else {
            break;
        };
        let Some(end) = rest[close + 2..].find(')').map(|i| close + 2 + i) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&rest[open + 1..close]);
        out.push_str(" (");
        out.push_str(&rest[close + 2..end]);
        out.push(')');
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

fn print_panel(title: &str, body: &[String], color: Color) {
    for line in panel(title, body) {
        println!("{}", line.color(color));
    }
}

pub fn print_header() {
    print_panel(
        "",
        &[
            "Crypto Research Agent".to_string(),
            "AI-Powered Cryptocurrency Analysis".to_string(),
        ],
        Color::Cyan,
    );
    println!();
}

pub fn print_error(title: &str, message: &str) {
    let mut body = vec![title.to_string(), String::new()];
    body.extend(message.lines().map(str::to_string));
    print_panel("Error", &body, Color::Red);
}

/// Price table shown by the `price` command
pub fn print_price(quote: &PriceQuote) {
    let rank = quote
        .market_cap_rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "N/A".to_string());

    let rows = vec![
        ("Current Price", format_price(quote.current_price)),
        ("24h Change", percentage_label(quote.price_change_24h)),
        ("7d Change", percentage_label(quote.price_change_7d)),
        ("30d Change", percentage_label(quote.price_change_30d)),
        ("", String::new()),
        ("24h High", format_price(quote.high_24h)),
        ("24h Low", format_price(quote.low_24h)),
        ("", String::new()),
        ("Market Cap", format_large_number(quote.market_cap)),
        ("Market Cap Rank", rank),
        ("24h Volume", format_large_number(quote.volume_24h)),
        ("", String::new()),
        ("All-Time High", format_price(quote.ath)),
    ];

    let title = format!("{} ({})", quote.name, quote.symbol);
    let changes = [quote.price_change_24h, quote.price_change_7d, quote.price_change_30d];
    for (i, line) in panel(&title, &table_rows(&rows)).into_iter().enumerate() {
        // rows 2..=4 of the panel body hold the percentage changes
        match i.checked_sub(2).and_then(|idx| changes.get(idx)) {
            Some(change) => {
                let label = percentage_label(*change);
                println!("{}", line.replacen(&label, &format_percentage(*change).to_string(), 1));
            }
            None => println!("{}", line.cyan()),
        }
    }
}

/// Numbered article panels shown by the `news` command
pub fn print_news(report: &NewsReport) {
    if report.articles.is_empty() {
        print_panel(
            "",
            &[format!("No recent news found for {}", report.ticker)],
            Color::Yellow,
        );
        return;
    }

    println!("{}", format!("Recent News for {}", report.ticker).bold());
    println!();

    for (i, article) in report.articles.iter().enumerate() {
        let mut meta = format!("Source: {}", article.source);
        if !article.published_at.is_empty() {
            let day: String = article.published_at.chars().take(10).collect();
            meta.push_str(&format!(" | {}", day));
        }
        let mut body = vec![article.title.clone(), meta];
        if !article.url.is_empty() {
            body.push(article.url.clone());
        }
        print_panel(&format!("[{}]", i + 1), &body, Color::Blue);
    }
}

/// Per-source diagnostics for verbose news output
pub fn print_sources(sources: &[SourceReport]) {
    println!("{}", "Sources".bold());
    for report in sources {
        let status = report.status.to_string();
        let status = match report.status {
            SourceStatus::Fetched(_) => status.green(),
            SourceStatus::Failed(_) => status.red(),
            SourceStatus::Skipped => status.dimmed(),
        };
        println!("  {:<16} {}", report.source, status);
    }
    println!();
}

/// Report panel plus optional tool list and footer for the `research` command
pub fn print_research(result: &ResearchResult, show_tools: bool) {
    if show_tools && !result.tool_calls.is_empty() {
        let calls: Vec<String> = result
            .tool_calls
            .iter()
            .map(|call| format!("{}: {}", call.tool, call.input))
            .collect();
        print_panel("Tools Called", &calls, Color::BrightBlack);
        println!();
    }

    let report = result.report.as_deref().unwrap_or_default();
    let body = markdown_lines(report);
    print_panel(&format!("Research Report: {}", result.ticker), &body, Color::Green);

    println!();
    println!(
        "{}",
        format!(
            "Model: {} | Tools used: {} | Tokens: {} in / {} out",
            result.model,
            result.tool_calls.len(),
            result.usage.input_tokens,
            result.usage.output_tokens
        )
        .dimmed()
    );
}

/// Sorted ticker table shown by the `supported` command
pub fn print_supported(tickers: &[(&str, &str)]) {
    let rows: Vec<(&str, String)> = tickers.iter().map(|(t, id)| (*t, id.to_string())).collect();
    let mut lines = vec![format!("{:<8}  {}", "Ticker", "CoinGecko ID"), String::new()];
    lines.extend(rows.iter().map(|(t, id)| format!("{:<8}  {}", t, id)));
    print_panel("Supported Cryptocurrencies", &lines, Color::Cyan);
    println!();
    println!(
        "{}",
        "Note: Other tickers may also work but might have less accurate news matching.".dimmed()
    );
}
