//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta-driven movement and timers, wall-clock only for timed effects
//! - Seeded RNG only
//! - Bounded pools with stable (oldest-first) iteration order
//! - No rendering or platform dependencies

pub mod clock;
pub mod combat;
pub mod params;
pub mod pool;
pub mod progression;
pub mod snapshot;
pub mod spatial;
pub mod spawn;
pub mod state;
pub mod summary;
pub mod tick;

pub use clock::SimClock;
pub use params::{EnemyKind, GadgetKind, PowerUpKind, ProjectileBehavior, TargetingStrategy, WeaponKind};
pub use pool::BoundedPool;
pub use snapshot::RenderSnapshot;
pub use spatial::{Bounded, SpatialGrid};
pub use state::{FrameEvent, GamePhase, GameState, Offer, OfferItem, PauseReason};
pub use summary::RunSummary;
pub use tick::{Simulation, TickInput, tick};
