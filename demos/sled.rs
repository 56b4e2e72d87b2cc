//! Walks one deal from creation through release against a local sled db and
//! prints the terminal record plus the events the service published.

use escrow_deal::deal::TimeStamp;
use escrow_deal::event::MemorySink;
use escrow_deal::service::EscrowService;
use escrow_deal::utils;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let db = sled::open("sled")?;

    if !db.is_empty() {
        db.clear()?;
    }

    let sink = Arc::new(MemorySink::new());
    let service = EscrowService::with_sink(Arc::new(db), sink.clone());

    let buyer = utils::new_party_addr()?;
    let seller = utils::new_party_addr()?;
    let arbitrator = utils::new_party_addr()?;

    let deal = service.open_deal(
        seller.clone(),
        25_000,
        None,
        b"two crates of widgets".to_vec(),
        Some(arbitrator),
        buyer,
    )?;

    println!("{:#?}", deal);

    let deal = service.release_deal(deal.id().to_string(), seller, TimeStamp::new())?;

    println!("{:#?}", deal);
    println!("owed: {:?}", deal.payee());

    for event in sink.events() {
        println!("{:?}", event);
    }

    Ok(())
}
