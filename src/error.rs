#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EscrowError {
    #[error("buyer and seller must be different parties")]
    InvalidParty,
    #[error("deal amount must be greater than zero")]
    InvalidAmount,
    #[error("deal has already been settled")]
    NotPending,
    #[error("caller is not authorized for this settlement")]
    Unauthorized,
    #[error("release window closed at the deadline")]
    DeadlinePassed,
    #[error("no deal found for id {0}")]
    DealNotFound(String),
}
