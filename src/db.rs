pub mod deal_repo;
pub use deal_repo::DealRepository;
pub mod party_repo;
pub use party_repo::PartyRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
