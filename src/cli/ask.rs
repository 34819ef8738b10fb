use super::ui;
use crate::payload::{ErrorResponse, NlpAnswer, NlpRequest, NlpResponse};
use crate::service::ExchangeHub;
use anyhow::Result;

fn render_answer(answer: &NlpAnswer) -> String {
    format!(
        "{}\n\n{}: {}\n{}",
        answer.friendly_response,
        ui::style_text(
            &format!("1 {} in {}", answer.base_currency, answer.target_currency),
            ui::StyleType::TotalLabel
        ),
        ui::style_text(
            &format!("{:.4}", answer.target_currency_amount),
            ui::StyleType::TotalValue
        ),
        ui::style_text(
            &format!("As of {}", answer.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle
        )
    )
}

fn render_error(error: &ErrorResponse) -> String {
    let mut output = ui::style_text(&error.message, ui::StyleType::Error);
    if let Some(supported) = &error.supported_currencies {
        let codes = supported
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!("\n\nSupported: {codes}"));
    }
    if let Some(examples) = &error.examples {
        output.push_str("\n\nTry:");
        for example in examples {
            output.push_str(&format!(
                "\n  {}",
                ui::style_text(example, ui::StyleType::Subtle)
            ));
        }
    }
    output
}

pub fn render(response: &NlpResponse) -> String {
    match response {
        NlpResponse::Answer(answer) => render_answer(answer),
        NlpResponse::Error(error) => render_error(error),
    }
}

pub async fn run(hub: &ExchangeHub, query: &str, json: bool) -> Result<()> {
    let request = NlpRequest {
        query: query.to_string(),
    };

    let pb = ui::new_spinner("Thinking...");
    let result = hub.natural_language(&request).await;
    pb.finish_and_clear();
    let response = result?;

    if json {
        return ui::print_json(&response);
    }
    println!("{}", render(&response));
    Ok(())
}
