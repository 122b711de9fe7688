use invoic::core::*;
use invoic::edifact::{EdifactConfigBuilder, MessageAssembler};

fn main() {
    // Buyer, supplier and two taxed lines
    let record = InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
        .currency(Currency::Eur)
        .reference("PO12345")
        .add_party(
            PartyBuilder::new(PartyQualifier::Buyer, "123456789")
                .name("ACME Corporation")
                .street("123 Main Street")
                .city("New York")
                .country("US")
                .build(),
        )
        .add_party(
            PartyBuilder::new(PartyQualifier::Supplier, "987654321")
                .name("Widgets Inc")
                .city("Chicago")
                .country("US")
                .build(),
        )
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
        .build()
        .unwrap();

    let config = EdifactConfigBuilder::new().application_ref("DEMO").build();
    let assembler = MessageAssembler::new(config).unwrap();
    let message = assembler.assemble(&record).unwrap();

    println!("{message}");
    println!("{} segments (UNB..UNT)", message.segment_count());
}
