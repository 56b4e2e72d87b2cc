//! Service layer API for deal custody operations
use super::deal::{Deal, TimeStamp};
use super::error::EscrowError;
use super::event::{DealEvent, EventSink, NullSink};
use super::utils;
use chrono::Utc;
use std::sync::{Arc, Mutex};

pub struct EscrowService {
    instance: Arc<sled::Db>,
    sink: Arc<dyn EventSink>,
    // Serializes load-check-save cycles on existing deals. Deals settle at
    // most once; two racing settlements must not both observe Pending.
    write_gate: Mutex<()>,
    // in future we could add a config for deadline policies
}

impl EscrowService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self::with_sink(instance, Arc::new(NullSink))
    }

    pub fn with_sink(instance: Arc<sled::Db>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            instance,
            sink,
            write_gate: Mutex::new(()),
        }
    }

    /// Load a deal from the database
    fn load_deal(&self, deal_id: &str) -> anyhow::Result<Deal> {
        let bytes = self
            .instance
            .get(deal_id.as_bytes())?
            .ok_or_else(|| EscrowError::DealNotFound(deal_id.to_string()))?;

        let deal: Deal = minicbor::decode(&bytes)?;
        Ok(deal)
    }

    fn save_deal(&self, deal: &Deal) -> anyhow::Result<()> {
        self.instance
            .insert(deal.id().as_bytes(), minicbor::to_vec(deal)?)?;
        Ok(())
    }

    /// Open a new deal. The caller address becomes the buyer; the service
    /// mints the deal id, persists the record, and announces the creation.
    pub fn open_deal(
        &self,
        seller: String,
        amount: u64,
        deadline: Option<TimeStamp<Utc>>,
        memo: Vec<u8>,
        arbitrator: Option<String>,
        buyer_addr: String,
    ) -> anyhow::Result<Deal> {
        // Validate parties and amount before anything is written
        let deal_id = utils::new_deal_id()?;
        let deal = Deal::open(deal_id, buyer_addr, seller, amount, deadline, memo, arbitrator)?;

        self.save_deal(&deal)?;

        self.sink.publish(DealEvent::Created {
            deal_id: deal.id().to_string(),
            buyer: deal.buyer().to_string(),
            seller: deal.seller().to_string(),
            amount: deal.amount(),
        });
        tracing::debug!(deal_id = %deal.id(), amount = deal.amount(), "deal opened");

        Ok(deal)
    }

    /// Release a pending deal to its seller. `caller` must be the seller or
    /// the arbitrator, and `now` must still be inside the release window.
    pub fn release_deal(
        &self,
        deal_id: String,
        caller: String,
        now: TimeStamp<Utc>,
    ) -> anyhow::Result<Deal> {
        let _gate = self.write_gate.lock().unwrap_or_else(|e| e.into_inner());

        // Load from DB
        let mut deal = self.load_deal(&deal_id)?;

        // All checks happen here; a failed release leaves the record untouched
        deal.release(&caller, &now)?;

        // Save back to DB
        self.save_deal(&deal)?;

        self.sink.publish(DealEvent::Released {
            deal_id: deal.id().to_string(),
            seller: deal.seller().to_string(),
        });
        tracing::debug!(deal_id = %deal.id(), "deal released");

        Ok(deal)
    }

    /// Refund a pending deal to its buyer. `caller` must be the buyer or the
    /// arbitrator; the deadline never blocks a refund.
    pub fn refund_deal(&self, deal_id: String, caller: String) -> anyhow::Result<Deal> {
        let _gate = self.write_gate.lock().unwrap_or_else(|e| e.into_inner());

        // Load from DB
        let mut deal = self.load_deal(&deal_id)?;

        deal.refund(&caller)?;

        // Save back to DB
        self.save_deal(&deal)?;

        self.sink.publish(DealEvent::Refunded {
            deal_id: deal.id().to_string(),
            buyer: deal.buyer().to_string(),
        });
        tracing::debug!(deal_id = %deal.id(), "deal refunded");

        Ok(deal)
    }

    /// Read a deal by id. Queries take no lock and never mutate.
    pub fn get_deal(&self, deal_id: &str) -> anyhow::Result<Deal> {
        self.load_deal(deal_id)
    }
}
