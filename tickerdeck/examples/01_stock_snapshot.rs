mod common;

use tickerdeck::analytics::StatementMetrics;
use tickerdeck::{NewsWindow, Period, Sentiment, StatementKind, Ticker, TimeRange};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    // 1. Setup the orchestrator (mock in CI when TICKERDECK_EXAMPLES_USE_MOCK is set).
    let deck = common::get_deck()?;
    let ticker = Ticker::parse(&std::env::args().nth(1).unwrap_or_else(|| "AAPL".into()))?;
    println!("Fetching snapshot for {ticker}...");

    // 2. Fetch every view concurrently; each capability falls back independently.
    let (price, income, news, overview) = tokio::join!(
        deck.price_view(&ticker, TimeRange::OneMonth),
        deck.financials_view(&ticker, StatementKind::Income, Period::Annual),
        deck.news_view(&ticker, NewsWindow::Week),
        deck.overview_view(&ticker),
    );

    match price {
        Ok(v) => println!(
            "\n## Price (via {})\nLast: {:.2}  day {:+.2}%  month {:+.2}%",
            v.provider, v.summary.current, v.summary.day_change_pct, v.summary.period_change_pct
        ),
        Err(e) => println!("\n## Price unavailable: {e}"),
    }

    match income {
        Ok(v) => {
            println!("\n## Income (via {})", v.provider);
            if let StatementMetrics::Income(m) = v.metrics {
                println!(
                    "Gross {:.1}%  operating {:.1}%  net {:.1}%  revenue YoY {:+.1}%",
                    m.gross_margin, m.operating_margin, m.net_margin, m.revenue_growth_yoy
                );
            }
        }
        Err(e) => println!("\n## Income unavailable: {e}"),
    }

    match overview {
        Ok(v) => {
            println!(
                "\n## Overview (via {})\n{}",
                v.provider,
                v.overview.name.as_deref().unwrap_or("-")
            );
            if let Some(q) = v.quality {
                println!("Quality: {:.1} ({:?})", q.score, q.grade);
            }
            if let Some(val) = v.value {
                println!("Value:   {:.1} ({:?})", val.score, val.grade);
            }
        }
        Err(e) => println!("\n## Overview unavailable: {e}"),
    }

    match news {
        Ok(v) => {
            println!("\n## News (via {}, {} articles)", v.provider, v.count);
            for a in v.articles.iter().take(5) {
                let tone = a.sentiment.unwrap_or(Sentiment::Neutral);
                println!("- [{tone:?}] {} ({})", a.headline, a.source);
            }
        }
        Err(e) => println!("\n## News unavailable: {e}"),
    }

    Ok(())
}
