//! Core deal entity and settlement transitions
use super::error::EscrowError;
use chrono::{DateTime, TimeZone, Utc};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Released,
    #[n(2)]
    Refunded,
}

impl DealStatus {
    /// Stable numeric code for external readers.
    /// 0 = pending, 1 = released, 2 = refunded.
    pub fn as_code(&self) -> u8 {
        match self {
            DealStatus::Pending => 0,
            DealStatus::Released => 1,
            DealStatus::Refunded => 2,
        }
    }
}

/// One custodied deal. The record is written once at creation and only the
/// status ever changes afterwards, exactly once, to one of the two terminal
/// values.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    #[n(0)]
    id: String, // bech32 encoded uuid7, minted by the service
    #[n(1)]
    buyer: String,
    #[n(2)]
    seller: String,
    #[n(3)]
    amount: u64,
    #[n(4)]
    status: DealStatus,
    #[n(5)]
    deadline: Option<TimeStamp<Utc>>, // None means the release window never closes
    #[n(6)]
    #[cbor(with = "minicbor::bytes")]
    memo: Vec<u8>,
    #[n(7)]
    arbitrator: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl PartialOrd for TimeStamp<Utc> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStamp<Utc> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Deal {
    /// Validate the creation inputs and construct a pending deal. The caller
    /// opening the deal becomes its buyer.
    pub fn open(
        id: String,
        buyer: String,
        seller: String,
        amount: u64,
        deadline: Option<TimeStamp<Utc>>,
        memo: Vec<u8>,
        arbitrator: Option<String>,
    ) -> Result<Self, EscrowError> {
        if seller == buyer {
            return Err(EscrowError::InvalidParty);
        }
        if amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }

        Ok(Self {
            id,
            buyer,
            seller,
            amount,
            status: DealStatus::Pending,
            deadline,
            memo,
            arbitrator,
        })
    }

    /// Move a pending deal to `Released`. Only the seller or the arbitrator
    /// may release, and only while the deadline (if any) has not passed.
    ///
    /// The deadline bounds the arbitrator the same way it bounds the seller:
    /// it is a property of the release operation, not of the caller's role.
    /// An overdue deal can still be settled through [`Deal::refund`].
    pub fn release(&mut self, caller: &str, now: &TimeStamp<Utc>) -> Result<(), EscrowError> {
        if self.status != DealStatus::Pending {
            return Err(EscrowError::NotPending);
        }
        if !self.is_seller(caller) && !self.is_arbitrator(caller) {
            return Err(EscrowError::Unauthorized);
        }
        if self.is_expired(now) {
            return Err(EscrowError::DeadlinePassed);
        }

        self.status = DealStatus::Released;
        Ok(())
    }

    /// Move a pending deal to `Refunded`. Available to the buyer or the
    /// arbitrator at any time while pending; the deadline does not apply.
    pub fn refund(&mut self, caller: &str) -> Result<(), EscrowError> {
        if self.status != DealStatus::Pending {
            return Err(EscrowError::NotPending);
        }
        if !self.is_buyer(caller) && !self.is_arbitrator(caller) {
            return Err(EscrowError::Unauthorized);
        }

        self.status = DealStatus::Refunded;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn buyer(&self) -> &str {
        &self.buyer
    }
    pub fn seller(&self) -> &str {
        &self.seller
    }
    pub fn amount(&self) -> u64 {
        self.amount
    }
    pub fn status(&self) -> DealStatus {
        self.status
    }
    pub fn deadline(&self) -> Option<&TimeStamp<Utc>> {
        self.deadline.as_ref()
    }
    pub fn memo(&self) -> &[u8] {
        &self.memo
    }
    pub fn arbitrator(&self) -> Option<&str> {
        self.arbitrator.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == DealStatus::Pending
    }

    /// A deal with no deadline never expires.
    pub fn is_expired(&self, now: &TimeStamp<Utc>) -> bool {
        match &self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// Where the custodied value is owed once the deal settles: the seller
    /// after a release, the buyer after a refund. `None` while pending. The
    /// host's value-transfer capability acts on this fact; the deal itself
    /// never moves value.
    pub fn payee(&self) -> Option<(&str, u64)> {
        match self.status {
            DealStatus::Pending => None,
            DealStatus::Released => Some((&self.seller, self.amount)),
            DealStatus::Refunded => Some((&self.buyer, self.amount)),
        }
    }

    fn is_buyer(&self, caller: &str) -> bool {
        self.buyer == caller
    }
    fn is_seller(&self, caller: &str) -> bool {
        self.seller == caller
    }
    // an absent arbitrator matches no caller
    fn is_arbitrator(&self, caller: &str) -> bool {
        self.arbitrator.as_deref() == Some(caller)
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
