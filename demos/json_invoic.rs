use invoic::edifact::{EdifactConfig, MessageAssembler};

const INVOICE: &str = include_str!("invoice.json");

fn main() {
    let record = invoic::json::from_json_str(INVOICE).unwrap();

    // Comma decimal mark, advertised in UNA
    let mut config = EdifactConfig::default();
    config.syntax.decimal_mark = ',';

    match MessageAssembler::new(config).and_then(|a| a.assemble(&record)) {
        Ok(message) => print!("{message}"),
        Err(e) => eprintln!("cannot encode {}: {e}", record.invoice_number),
    }
}
