//! `invoic` command-line tool.
//!
//! Reads an invoice record from JSON (or uses a built-in example), prints
//! the INVOIC interchange to stdout and writes it to a file.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use invoic::core::*;
use invoic::edifact::{
    CharacterSet, EdifactConfigBuilder, MessageAssembler, TextEncoding, WriteOptions,
    write_message,
};
use tracing_subscriber::EnvFilter;

/// Generate a UN/EDIFACT INVOIC (D.96A) interchange.
#[derive(Parser, Debug)]
#[command(name = "invoic", version, about)]
struct Cli {
    /// JSON invoice record; the built-in example invoice when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file.
    #[arg(short, long, default_value = "invoic.edi")]
    output: PathBuf,

    /// Overwrite the output file if it exists.
    #[arg(long)]
    force: bool,

    /// Interchange control reference (defaults to the message reference).
    #[arg(long)]
    interchange_ref: Option<String>,

    /// Sender identification in UNB.
    #[arg(long)]
    application_ref: Option<String>,

    /// Character set declared in UNB (UNOA or UNOB).
    #[arg(long, default_value = "UNOA")]
    character_set: CharacterSet,

    /// Byte encoding of the output file.
    #[arg(long, value_enum, default_value_t = EncodingArg::Utf8)]
    encoding: EncodingArg,

    /// Do not release spaces inside data values.
    #[arg(long)]
    no_escape_spaces: bool,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncodingArg {
    Utf8,
    Latin1,
    Ascii,
}

impl From<EncodingArg> for TextEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Latin1 => TextEncoding::Latin1,
            EncodingArg::Ascii => TextEncoding::Ascii,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let record = match &cli.input {
        Some(path) => invoic::json::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            tracing::info!("no input file given, using the example invoice");
            example_record()
        }
    };

    let mut config = EdifactConfigBuilder::new()
        .character_set(cli.character_set)
        .escape_spaces(!cli.no_escape_spaces)
        .prepared_at(chrono::Local::now().naive_local());
    if let Some(reference) = &cli.interchange_ref {
        config = config.interchange_ref(reference);
    }
    if let Some(reference) = &cli.application_ref {
        config = config.application_ref(reference);
    }

    let message = MessageAssembler::new(config.build())?
        .assemble(&record)
        .context("generating INVOIC message")?;
    print!("{message}");

    let options = WriteOptions {
        overwrite: cli.force,
        encoding: cli.encoding.into(),
    };
    write_message(&message, &cli.output, &options)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = derive_level(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("invoic={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))
}

fn derive_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn example_record() -> InvoiceRecord {
    let party = |qualifier: PartyQualifier, id: &str, name: &str, street: &str, city: &str| {
        PartyBuilder::new(qualifier, id)
            .name(name)
            .street(street)
            .city(city)
            .country("US")
            .build()
    };

    InvoiceRecordBuilder::new("INV2025001", "INV2025001", "20250322")
        .currency(Currency::Eur)
        .reference("PO12345")
        .add_party(party(
            PartyQualifier::Buyer,
            "123456789",
            "ACME Corporation",
            "123 Main Street",
            "New York",
        ))
        .add_party(party(
            PartyQualifier::Supplier,
            "987654321",
            "Widgets Inc",
            "456 Supply Avenue",
            "Chicago",
        ))
        .add_party(party(
            PartyQualifier::Invoicee,
            "555666777",
            "Invoice Department",
            "789 Billing Road",
            "Boston",
        ))
        .add_item(
            LineItemBuilder::new("ABC123", "Premium Widget", "10", "25.50")
                .tax_rate("20")
                .unit("PCE")
                .build(),
        )
        .add_item(
            LineItemBuilder::new("XYZ456", "Deluxe Gadget", "5", "40.00")
                .tax_rate("20")
                .unit("PCE")
                .build(),
        )
        .due_date("20250422")
        .payment_method(PaymentMethod::BankTransfer)
        .build_unchecked()
}
