pub mod monitor;
pub mod sanctions;
pub mod watchlist;

pub use monitor::AmlMonitor;
pub use sanctions::{
    ListCheck, MockSanctionsList, SanctionsList, Screener, ScreeningHit, ScreeningProfile,
    ScreeningReport, ScreeningResult, WatchlistSanctionsList,
};
pub use watchlist::Watchlist;
