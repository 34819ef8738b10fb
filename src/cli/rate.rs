use super::ui;
use crate::payload::{DirectRateRequest, DirectRateResponse};
use crate::service::ExchangeHub;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

const SAMPLE_AMOUNTS: [f64; 3] = [1.0, 100.0, 1000.0];

pub fn render(response: &DirectRateResponse) -> String {
    let base = response.base_currency;
    let target = response.target_currency;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("{} {base}", base.info().flag)),
        ui::header_cell(&format!("{} {target}", target.info().flag)),
    ]);
    for amount in SAMPLE_AMOUNTS {
        table.add_row(vec![
            Cell::new(format!("{amount:.2}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", amount * response.rate)).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut output = format!(
        "{}: {}\n\n",
        ui::style_text(&format!("1 {base} in {target}"), ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.4}", response.rate), ui::StyleType::TotalValue)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!("As of {}", response.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle
        )
    ));
    output
}

pub async fn run(hub: &ExchangeHub, base: &str, target: Option<&str>, json: bool) -> Result<()> {
    let request = DirectRateRequest {
        base_currency: Some(base.to_string()),
        target_currency: target.map(str::to_string),
    };

    let pb = ui::new_spinner("Fetching rate...");
    let result = hub.direct_lookup(&request).await;
    pb.finish_and_clear();
    let response = result?;

    if json {
        return ui::print_json(&response);
    }
    println!("{}", render(&response));
    Ok(())
}
