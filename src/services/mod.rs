pub mod coin_fetcher;
pub mod supabase_upserter;
pub mod sync_service;

pub use coin_fetcher::CoinFetcher;
pub use supabase_upserter::SupabaseUpserter;
pub use sync_service::SyncService;
