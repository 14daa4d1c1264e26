use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::{mpsc, oneshot};

use crate::app::App;
use crate::models::{ControlMessage, SessionEvent};

/// Key bindings for the control panel. Returns true on quit.
pub async fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    control: &mpsc::Sender<ControlMessage>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,

        // --- WALK CONTROLS ---
        KeyCode::Char('s') => {
            let _ = control.send(ControlMessage::Start).await;
        }
        KeyCode::Char('x') => {
            let _ = control.send(ControlMessage::Stop).await;
        }
        KeyCode::Char('e') => {
            let _ = control.send(ControlMessage::SaveLinks).await;
        }

        // --- VISITED LIST ---
        KeyCode::Char('v') => {
            let (respond_to, response) = oneshot::channel();
            let _ = control
                .send(ControlMessage::GetVisitedLinks { respond_to })
                .await;
            if let Ok(snapshot) = response.await {
                app.replace_links(snapshot.links);
            }
        }
        KeyCode::Down => app.scroll_down(),
        KeyCode::Up => app.scroll_up(),
        _ => {}
    }
    false
}

/// Fold a session event into the panel state.
pub fn handle_session_event(app: &mut App, event: SessionEvent) {
    match event {
        SessionEvent::Started => {
            app.running = true;
            app.status_message = String::from("Browsing started...");
        }
        SessionEvent::AlreadyRunning => {
            app.status_message = String::from("Already browsing");
        }
        SessionEvent::Stopped => {
            app.running = false;
            app.status_message = String::from("Browsing stopped.");
        }
        SessionEvent::Visited(url) => {
            app.status_message = format!("Visiting {}", url);
            app.links.push(url);
        }
        SessionEvent::WentBack(reason) => {
            app.status_message = format!("Went back ({})", reason);
        }
        SessionEvent::Redirected(url) => {
            app.status_message = format!("Unscriptable page, redirected to {}", url);
        }
        SessionEvent::Failed(message) => {
            app.status_message = format!("Cycle failed: {}", message);
        }
        SessionEvent::Exported(path, count) => {
            app.status_message = format!("Saved {} links to {}", count, path.display());
        }
    }
}
