use std::time::Duration;

use roam_browser::app::App;
use roam_browser::event_handler::handle_session_event;
use roam_browser::host::{HttpTab, TabHost};
use roam_browser::models::{ControlMessage, SessionEvent, VisitedSnapshot};
use roam_browser::session::{Session, SurfConfig, run_session};
use roam_browser::ui::ui;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tokio::sync::{mpsc, oneshot};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

fn fast_config(seed: &str) -> SurfConfig {
    SurfConfig {
        seed_url: seed.to_string(),
        tick_interval: Duration::from_millis(50),
        reload_settle: Duration::from_millis(10),
        load_wait: Duration::from_millis(10),
        ..SurfConfig::default()
    }
}

async fn snapshot_of(control: &mpsc::Sender<ControlMessage>) -> VisitedSnapshot {
    let (respond_to, response) = oneshot::channel();
    control
        .send(ControlMessage::GetVisitedLinks { respond_to })
        .await
        .expect("session alive");
    response.await.expect("session answers")
}

#[tokio::test]
async fn http_tab_tracks_navigation_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html_page(r#"<a href="/two">next</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html_page("<p>nothing to click</p>"))
        .mount(&server)
        .await;

    let seed = format!("{}/one", server.uri());
    let mut tab = HttpTab::new(&seed, "test-agent", Duration::from_secs(5)).expect("valid seed");

    tab.reload().await.expect("reload");
    assert!(tab.page_ready().await.expect("ready check"));
    let links = tab.page_links().await.expect("links");
    assert_eq!(links, vec![format!("{}/two", server.uri())]);

    tab.navigate(&links[0]).await.expect("navigate");
    assert_eq!(tab.active_url().await.expect("url"), links[0]);
    assert!(tab.page_links().await.expect("links").is_empty());

    tab.go_back().await.expect("back");
    assert_eq!(tab.active_url().await.expect("url"), seed);
}

#[tokio::test]
async fn http_tab_treats_error_status_as_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let seed = format!("{}/missing", server.uri());
    let mut tab = HttpTab::new(&seed, "test-agent", Duration::from_secs(5)).expect("valid seed");
    tab.reload().await.expect("reload completes");
    assert!(!tab.page_ready().await.expect("ready check"));
    assert!(tab.page_links().await.expect("links").is_empty());
}

#[tokio::test]
async fn walk_visits_only_qualifying_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/a">a</a>
               <a href="/skip.pdf">pdf</a>
               <a href="ftp://files.example/">ftp</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/b">b</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("<p>dead end</p>"))
        .mount(&server)
        .await;

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (control_tx, control_rx) = mpsc::channel(8);
    let session = Session::new(fast_config(&server.uri()), event_tx);
    let session_task = tokio::spawn(run_session(session, control_rx));
    tokio::spawn(async move { while event_rx.recv().await.is_some() {} });

    control_tx
        .send(ControlMessage::Start)
        .await
        .expect("session alive");

    // Wait for the walk to record at least one visit
    let mut snapshot = snapshot_of(&control_tx).await;
    for _ in 0..100 {
        if !snapshot.links.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        snapshot = snapshot_of(&control_tx).await;
    }

    control_tx
        .send(ControlMessage::Stop)
        .await
        .expect("session alive");

    assert!(!snapshot.links.is_empty(), "walk never visited a link");
    for link in &snapshot.links {
        assert!(link.starts_with(&server.uri()), "offsite visit: {}", link);
        assert!(!link.ends_with(".pdf"), "denylisted visit: {}", link);
    }
    // First hop can only be /a: the pdf and the ftp link never qualify
    assert_eq!(snapshot.links[0], format!("{}/a", server.uri()));

    drop(control_tx);
    let _ = session_task.await;
}

#[tokio::test]
async fn export_reproduces_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">a</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/b">b</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("<p>dead end</p>"))
        .mount(&server)
        .await;

    let export_dir = tempfile::tempdir().expect("tempdir");
    let config = SurfConfig {
        export_dir: Some(export_dir.path().to_path_buf()),
        ..fast_config(&server.uri())
    };

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (control_tx, control_rx) = mpsc::channel(8);
    let session_task = tokio::spawn(run_session(Session::new(config, event_tx), control_rx));
    tokio::spawn(async move { while event_rx.recv().await.is_some() {} });

    control_tx
        .send(ControlMessage::Start)
        .await
        .expect("session alive");
    let mut snapshot = snapshot_of(&control_tx).await;
    for _ in 0..100 {
        if !snapshot.links.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        snapshot = snapshot_of(&control_tx).await;
    }
    assert!(!snapshot.links.is_empty(), "walk never visited a link");

    control_tx
        .send(ControlMessage::Stop)
        .await
        .expect("session alive");
    // Let any in-flight cycle drain before freezing the snapshot
    tokio::time::sleep(Duration::from_millis(200)).await;

    control_tx
        .send(ControlMessage::SaveLinks)
        .await
        .expect("session alive");
    // Messages are handled in order: once the snapshot answers, the export
    // before it has finished
    let snapshot = snapshot_of(&control_tx).await;

    let content = std::fs::read_to_string(export_dir.path().join("visited_links.txt"))
        .expect("export file written");
    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines, snapshot.links);

    drop(control_tx);
    let _ = session_task.await;
}

#[tokio::test]
async fn privileged_seed_redirects_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/landing">go</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html_page(r#"<a href="/onward">on</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/onward"))
        .respond_with(html_page("<p>dead end</p>"))
        .mount(&server)
        .await;

    let config = SurfConfig {
        seed_url: "about:blank".to_string(),
        fallback_url: server.uri(),
        ..fast_config("about:blank")
    };

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (control_tx, control_rx) = mpsc::channel(8);
    let session_task = tokio::spawn(run_session(Session::new(config, event_tx), control_rx));

    let (redirect_tx, redirect_rx) = oneshot::channel();
    tokio::spawn(async move {
        let mut redirect_tx = Some(redirect_tx);
        while let Some(event) = event_rx.recv().await {
            if matches!(event, SessionEvent::Redirected(_)) {
                if let Some(tx) = redirect_tx.take() {
                    let _ = tx.send(());
                }
            }
        }
    });

    control_tx
        .send(ControlMessage::Start)
        .await
        .expect("session alive");

    tokio::time::timeout(Duration::from_secs(10), redirect_rx)
        .await
        .expect("fallback redirect happened")
        .expect("event listener alive");

    let mut snapshot = snapshot_of(&control_tx).await;
    for _ in 0..100 {
        if !snapshot.links.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        snapshot = snapshot_of(&control_tx).await;
    }
    assert!(
        snapshot
            .links
            .iter()
            .all(|link| link.starts_with(&server.uri())),
        "walk continued from the fallback destination"
    );
    assert!(!snapshot.links.is_empty());

    control_tx
        .send(ControlMessage::Stop)
        .await
        .expect("session alive");
    drop(control_tx);
    let _ = session_task.await;
}

#[test]
fn snapshot_serializes_to_links_object() {
    let snapshot = VisitedSnapshot {
        links: vec!["https://a.example/".to_string()],
    };
    let value = serde_json::to_value(&snapshot).expect("serializable");
    assert_eq!(value, serde_json::json!({ "links": ["https://a.example/"] }));
}

#[test]
fn panel_renders_status_and_links() {
    let mut app = App::new("https://seed.example/".to_string());
    handle_session_event(&mut app, SessionEvent::Started);
    handle_session_event(
        &mut app,
        SessionEvent::Visited("https://a.example/".to_string()),
    );

    let backend = TestBackend::new(80, 12);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|f| ui(f, &app)).expect("draw");

    let buffer_string: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(buffer_string.contains("RUNNING"));
    assert!(buffer_string.contains("Visited Links (1)"));
    assert!(buffer_string.contains("a.example"));
}
