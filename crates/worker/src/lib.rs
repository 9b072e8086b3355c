//! Background ingestion worker and its lifecycle supervisor.
//!
//! The worker owns the messaging-provider connection exclusively; the HTTP
//! layer talks to it only through the lifecycle manager's signals, never by
//! direct reference.

pub mod gateway;
pub mod ingest;
pub mod lifecycle;
pub mod telegram;

pub use gateway::{InboundUpdate, MessageGateway};
pub use ingest::IngestWorker;
pub use lifecycle::{
    DeploymentMode, LifecycleConfig, Phase, ProcessLifecycleManager, StatusReport, StopOutcome,
};
pub use telegram::{BotConfig, BotGateway};
