//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod achievements;
mod demo;
mod lifestyle;
pub mod logging;
pub mod migration;
pub mod queue;
pub mod reconcile;
mod reminders;
pub mod state;
mod summary;
pub mod trend;

pub use achievements::{AchievementEngine, AchievementEvent};
pub use demo::DemoService;
pub use lifestyle::LifestyleService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use queue::{Mutation, MutationOutcome, MutationQueue, QueueHandle};
pub use reconcile::{BatchResult, HealthApplyResult, MoodOutcome, Reconciler};
pub use reminders::ReminderPlanner;
pub use state::{LoadReport, StateRepository};
pub use summary::{DaySummary, SummaryService, TodaySummary};
