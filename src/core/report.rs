use crate::domain::model::{ProfitRequest, ProfitResult, ShippingSource};
use crate::domain::ports::ResultConsumer;
use crate::utils::error::{ProfitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = ProfitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(ProfitError::invalid_input(
                "format",
                other,
                "Supported formats: text, json, csv",
            )),
        }
    }
}

pub fn render_report(result: &ProfitResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(result)?),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        ReportFormat::Csv => render_csv(result),
    }
}

fn render_text(result: &ProfitResult) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Gross Revenue: ${:.2}", result.gross_revenue)?;
    writeln!(
        out,
        "Total Marketplace Fees: ${:.2}",
        result.total_marketplace_fees
    )?;
    match result.shipping_source {
        ShippingSource::OutOfRange => writeln!(
            out,
            "Shipping Cost: ${:.2} (no rate for this weight)",
            result.shipping_cost
        )?,
        _ => writeln!(out, "Shipping Cost: ${:.2}", result.shipping_cost)?,
    }
    writeln!(out, "Total Cost: ${:.2}", result.total_cost)?;
    writeln!(out, "Net Profit: ${:.2}", result.net_profit)?;
    writeln!(out, "Profit Margin: {:.2}%", result.profit_margin_percent)?;

    if !result.fee_breakdown.is_empty() {
        writeln!(out, "\nFee Breakdown")?;
        for (fee_id, amount) in &result.fee_breakdown {
            writeln!(out, "  {}: ${:.2}", fee_id, amount)?;
        }
    }

    Ok(out)
}

fn render_csv(result: &ProfitResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["line", "amount"])?;

    let totals = [
        ("gross_revenue", result.gross_revenue),
        ("total_marketplace_fees", result.total_marketplace_fees),
        ("shipping_cost", result.shipping_cost),
        ("total_cost", result.total_cost),
        ("net_profit", result.net_profit),
        ("profit_margin_percent", result.profit_margin_percent),
    ];
    for (line, amount) in totals {
        writer.write_record([line.to_string(), format!("{:.2}", amount)])?;
    }
    for (fee_id, amount) in &result.fee_breakdown {
        writer.write_record([format!("fee:{}", fee_id), format!("{:.2}", amount)])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ProfitError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ProfitError::config(format!("CSV output: {}", e)))
}

/// Writes each rendered report to an output stream.
pub struct WriterConsumer<W: Write> {
    writer: W,
    format: ReportFormat,
}

impl<W: Write> WriterConsumer<W> {
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultConsumer for WriterConsumer<W> {
    fn consume(&mut self, request: &ProfitRequest, result: &ProfitResult) -> Result<()> {
        tracing::debug!(
            "Writing {:?} report for {} x ${:.2}",
            self.format,
            request.quantity,
            request.sale_price
        );
        let report = render_report(result, self.format)?;
        self.writer.write_all(report.as_bytes())?;
        if !report.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
