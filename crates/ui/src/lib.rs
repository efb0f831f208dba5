use core_sim::{PortfolioView, StockQuote};

pub fn index_html() -> &'static str {
    include_str!("../static/index.html")
}

pub fn styles_css() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn app_js() -> &'static str {
    include_str!("../static/app.js")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown above the index after a form post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

pub fn render_index(
    portfolio: &PortfolioView,
    stocks: &[StockQuote],
    notice: Option<&Notice>,
) -> String {
    // notice text is user input and must not be scanned for placeholders
    index_html()
        .replace("{{cash}}", &format!("{:.2}", portfolio.cash))
        .replace("{{equity}}", &format!("{:.2}", portfolio.total_equity()))
        .replace("{{stocks}}", &stock_rows(stocks))
        .replace("{{holdings}}", &holding_rows(portfolio))
        .replace("{{notice}}", &notice_html(notice))
}

fn notice_html(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };

    let class = match notice.kind {
        NoticeKind::Success => "success",
        NoticeKind::Error => "error",
    };
    format!(
        "<p class=\"notice {class}\">{}</p>",
        escape_html(&notice.message)
    )
}

fn holding_rows(portfolio: &PortfolioView) -> String {
    if portfolio.holdings.is_empty() {
        return "            <tr><td class=\"empty\" colspan=\"3\">No holdings yet.</td></tr>"
            .to_string();
    }

    portfolio
        .holdings
        .iter()
        .map(|holding| {
            format!(
                "            <tr><td>{}</td><td>{}</td><td>${:.2}</td></tr>",
                escape_html(&holding.symbol),
                holding.quantity,
                holding.current_value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn stock_rows(stocks: &[StockQuote]) -> String {
    stocks
        .iter()
        .map(|quote| {
            format!(
                "            <tr><td>{}</td><td>${:.2}</td></tr>",
                escape_html(&quote.symbol),
                quote.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use core_sim::{HoldingView, PortfolioView, StockQuote};

    use super::*;

    fn sample_portfolio() -> PortfolioView {
        PortfolioView {
            cash: 8_500.0,
            holdings: vec![HoldingView {
                symbol: "AAPL".to_string(),
                quantity: 10,
                current_value: 1_512.3,
            }],
        }
    }

    fn sample_stocks() -> Vec<StockQuote> {
        vec![
            StockQuote {
                symbol: "AAPL".to_string(),
                price: 151.23,
            },
            StockQuote {
                symbol: "GOOG".to_string(),
                price: 2_500.0,
            },
        ]
    }

    #[test]
    fn ui_bundle_contains_index_html() {
        let html = index_html();

        assert!(html.contains("<!doctype html>"));
        assert!(html.contains("/static/styles.css"));
        assert!(html.contains("/static/app.js"));
    }

    #[test]
    fn rendered_index_shows_portfolio_and_prices() {
        let html = render_index(&sample_portfolio(), &sample_stocks(), None);

        assert!(html.contains("Cash: <strong>$8500.00</strong>"));
        assert!(html.contains("Total equity: <strong>$10012.30</strong>"));
        assert!(html.contains("<td>AAPL</td><td>10</td><td>$1512.30</td>"));
        assert!(html.contains("<td>GOOG</td><td>$2500.00</td>"));
        assert!(!html.contains("{{"));
        assert!(!html.contains("class=\"notice"));
    }

    #[test]
    fn stock_rows_are_one_per_line() {
        let rows = stock_rows(&sample_stocks());

        assert_eq!(rows.lines().count(), 2);
        assert!(rows.lines().next().unwrap().ends_with("<td>$151.23</td></tr>"));
        assert!(!rows.ends_with('\n'));
    }

    #[test]
    fn empty_portfolio_renders_placeholder_row() {
        let portfolio = PortfolioView {
            cash: 10_000.0,
            holdings: Vec::new(),
        };

        let html = render_index(&portfolio, &sample_stocks(), None);

        assert!(html.contains("No holdings yet."));
    }

    #[test]
    fn notice_is_escaped_and_classed() {
        let notice = Notice::error("Stock <ZZZZ> not found.");

        let html = render_index(&sample_portfolio(), &sample_stocks(), Some(&notice));

        assert!(html.contains("<p class=\"notice error\">Stock &lt;ZZZZ&gt; not found.</p>"));
    }
}
