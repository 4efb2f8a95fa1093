pub mod context;
pub mod decision;
pub mod evidence;
pub mod policy;
pub mod transaction;

pub use context::{Direction, RecentTx, UserContext, UserId};
pub use decision::{Action, Decision, RiskLevel};
pub use evidence::{FlagType, RiskFlag, RuleCategory, RuleViolation, ScoreDimension};
pub use policy::{AmlParams, LevelCuts, RiskPolicy, RuleParams, ScoreWeights};
pub use transaction::{Currency, DeviceId, GeoPoint, Merchant, Transaction, TransactionId};
