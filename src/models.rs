use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::oneshot;

/// Inbound control surface. One variant per panel action.
pub enum ControlMessage {
    Start,
    Stop,
    SaveLinks,
    GetVisitedLinks {
        respond_to: oneshot::Sender<VisitedSnapshot>,
    },
}

/// Visited set snapshot, in insertion order. Serializes to the
/// `{ "links": [...] }` shape the control surface answers with.
#[derive(Debug, Clone, Serialize)]
pub struct VisitedSnapshot {
    pub links: Vec<String>,
}

/// Status feed consumed by the control panel.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Started,
    AlreadyRunning,
    Stopped,
    Visited(String),
    WentBack(String),
    Redirected(String),
    Failed(String),
    Exported(PathBuf, usize),
}
