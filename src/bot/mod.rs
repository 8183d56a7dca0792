//! Bot runtime: conversation orchestration, message texts, per-chat
//! dispatching and the update polling loop.

mod dispatcher;
mod messages;
mod orchestrator;
mod runner;

pub use dispatcher::Dispatcher;
pub use messages::Messages;
pub use orchestrator::Orchestrator;
pub use runner::run;
