//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `drinklog_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use drinklog_core::contract::drinks_address_table;
use drinklog_core::{ChangeBus, DrinkProvider, DrinkStore, DrinkValues, RecordQuery};

fn main() {
    println!("drinklog_core ping={}", drinklog_core::ping());
    println!("drinklog_core version={}", drinklog_core::core_version());

    if let Err(err) = smoke_insert_and_list() {
        eprintln!("smoke failed: {err}");
        std::process::exit(1);
    }
}

fn smoke_insert_and_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut provider = DrinkProvider::new(
        DrinkStore::in_memory(),
        drinks_address_table(),
        ChangeBus::new(),
    );
    provider.open()?;

    let collection = provider.addresses().collection().clone();
    let created = provider
        .insert(
            &collection,
            &DrinkValues::new().with_kind("water").with_millilitres(250),
        )?
        .ok_or("storage rejected the smoke row")?;
    println!("drinklog_core inserted={created}");

    let records = provider
        .query(&collection, &RecordQuery::default())?
        .into_records()?;
    println!("drinklog_core rows={}", records.len());
    Ok(())
}
