use super::ui;
use crate::payload::{HistoricalRequest, HistoricalResponse};
use crate::service::ExchangeHub;
use anyhow::Result;
use comfy_table::Cell;

/// Long ranges are downsampled to about this many table rows.
const MAX_ROWS: usize = 31;

/// Picks evenly spaced points, always keeping the newest one.
fn sample_rows<T>(points: &[T], max_rows: usize) -> Vec<&T> {
    if points.len() <= max_rows || max_rows < 2 {
        return points.iter().collect();
    }
    let step = points.len().div_ceil(max_rows - 1);
    let mut rows: Vec<&T> = points.iter().step_by(step).collect();
    if (points.len() - 1) % step != 0
        && let Some(last) = points.last()
    {
        rows.push(last);
    }
    rows
}

pub fn render(response: &HistoricalResponse) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Rate ({})", response.target_currency)),
    ]);
    for point in sample_rows(&response.data, MAX_ROWS) {
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m-%d")),
            ui::rate_cell(point.rate),
        ]);
    }

    let mut output = format!(
        "History: {}\n",
        ui::style_text(
            &format!("{} → {}", response.base_currency, response.target_currency),
            ui::StyleType::Title
        )
    );
    output.push_str(&format!(
        "{}\n\n",
        ui::style_text("Simulated series for illustration, not market data", ui::StyleType::Subtle)
    ));
    output.push_str(&table.to_string());

    if let (Some(first), Some(last)) = (response.data.first(), response.data.last())
        && response.data.len() > 1
        && first.rate > 0.0
    {
        let change = (last.rate - first.rate) / first.rate * 100.0;
        let mut summary = ui::new_styled_table();
        summary.set_header(vec![
            ui::header_cell("Low"),
            ui::header_cell("High"),
            ui::header_cell("Change"),
        ]);
        let low = response.data.iter().map(|p| p.rate).fold(f64::INFINITY, f64::min);
        let high = response.data.iter().map(|p| p.rate).fold(f64::NEG_INFINITY, f64::max);
        summary.add_row(vec![ui::rate_cell(low), ui::rate_cell(high), ui::change_cell(change)]);
        output.push_str("\n\n");
        output.push_str(&summary.to_string());
    }
    output
}

pub async fn run(
    hub: &ExchangeHub,
    base: &str,
    target: &str,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let request = HistoricalRequest {
        base_currency: base.to_string(),
        target_currency: target.to_string(),
        days,
    };

    let pb = ui::new_spinner("Building history...");
    let result = hub.historical(&request).await;
    pb.finish_and_clear();
    let response = result?;

    if json {
        return ui::print_json(&response);
    }
    println!("{}", render(&response));
    Ok(())
}
