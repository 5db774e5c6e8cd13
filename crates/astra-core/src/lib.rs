//! # astra-core -- Domain Types for the AstraMark Intelligence Backend
//!
//! Everything in this crate is pure data and pure functions. No I/O, no
//! async, no HTTP. The API crate composes these types with the clients in
//! `astra-clients` to produce, persist, and serve marketing analyses.
//!
//! ## Modules
//!
//! | Module        | Contents |
//! |---------------|----------|
//! | [`business`]  | `BusinessInput` validation and the persisted `BusinessProfile` |
//! | [`analysis`]  | The analysis document and the LLM draft it is assembled from |
//! | [`market`]    | Competitor, trend, keyword, and market-signal records |
//! | [`signals`]   | Rules that turn trends and competitors into market signals |
//! | [`proof`]     | Ledger proof records attached to analyses |
//! | [`content`]   | Pitch deck, content calendar, email sequence, social posts |
//! | [`prompts`]   | Prompt builders and model-output cleanup |
//! | [`fallback`]  | Offline payloads used when an upstream call fails |
//! | [`plans`]     | Subscription plan catalogue |
//! | [`user`]      | User accounts, sessions, bearer tokens |
//! | [`canonical`] | Sorted-key canonical JSON bytes |
//! | [`digest`]    | SHA-256 digests over canonical bytes |

pub mod analysis;
pub mod business;
pub mod canonical;
pub mod content;
pub mod digest;
pub mod error;
pub mod fallback;
pub mod market;
pub mod plans;
pub mod prompts;
pub mod proof;
pub mod signals;
pub mod user;

pub use analysis::{AnalysisDraft, AnalysisResult};
pub use business::{BusinessInput, BusinessProfile};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, ValidationError};
pub use market::{CompetitorData, CompetitorInsight, MarketSignalRecord, MarketTrends, Severity, SignalType};
pub use proof::{BlockchainProof, ProofRecord};
