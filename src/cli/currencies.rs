use super::ui;
use crate::core::currency::{HOME_CURRENCY, POPULAR_CURRENCIES};
use crate::payload::CurrencyListResponse;
use crate::service::ExchangeHub;
use anyhow::Result;
use comfy_table::Cell;

pub fn render(listing: &CurrencyListResponse) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
        ui::header_cell("Popular"),
    ]);

    for info in &listing.currencies {
        let popular = POPULAR_CURRENCIES.iter().any(|c| c.code() == info.code);
        table.add_row(vec![
            Cell::new(info.flag),
            Cell::new(info.code),
            Cell::new(info.name),
            Cell::new(info.symbol),
            Cell::new(if popular { "★" } else { "" }),
        ]);
    }

    let mut output = format!(
        "Supported currencies (quoted against {})\n\n",
        ui::style_text(HOME_CURRENCY.code(), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output
}

pub fn run(hub: &ExchangeHub, json: bool) -> Result<()> {
    let listing = hub.currencies();
    if json {
        return ui::print_json(&listing);
    }
    println!("{}", render(&listing));
    Ok(())
}
