use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::SurfError;
use crate::extractor;
use crate::host::{TabHost, is_web_url};
use crate::models::SessionEvent;
use crate::navigator::{self, Step};
use crate::session::SurfConfig;
use crate::visited::SharedVisited;

/// The RUNNING half of the walk's state machine: one reload-then-navigate
/// cycle per tick until the stop flag flips. Runs as a single spawned task;
/// the session owns the other end of `stop`.
pub async fn run<H>(
    mut host: H,
    visited: SharedVisited,
    config: SurfConfig,
    mut stop: watch::Receiver<bool>,
    events: mpsc::Sender<SessionEvent>,
) where
    H: TabHost,
{
    let mut rng = StdRng::from_os_rng();

    // First tick fires one full period after start, not immediately
    let mut ticker = time::interval_at(
        Instant::now() + config.tick_interval,
        config.tick_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || !*stop.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !*stop.borrow() {
                    break;
                }
                if let Err(err) = run_cycle(&mut host, &visited, &config, &mut stop, &events, &mut rng).await {
                    warn!("walk cycle aborted: {}", err);
                    let _ = events.send(SessionEvent::Failed(err.to_string())).await;
                }
            }
        }
    }
    debug!("driver exited");
}

/// One timer tick: look up the active page, reload it, let it settle, then
/// run the extraction-and-select cycle. Any error ends this cycle only; the
/// next tick starts over from whatever page the host is on.
async fn run_cycle<H>(
    host: &mut H,
    visited: &SharedVisited,
    config: &SurfConfig,
    stop: &mut watch::Receiver<bool>,
    events: &mpsc::Sender<SessionEvent>,
    rng: &mut StdRng,
) -> Result<(), SurfError>
where
    H: TabHost + ?Sized,
{
    host.active_url().await?;
    host.reload().await?;
    if !pause(config.reload_settle, stop).await {
        return Ok(());
    }
    browse_page(host, visited, config, stop, events, rng).await
}

async fn browse_page<H>(
    host: &mut H,
    visited: &SharedVisited,
    config: &SurfConfig,
    stop: &mut watch::Receiver<bool>,
    events: &mpsc::Sender<SessionEvent>,
    rng: &mut StdRng,
) -> Result<(), SurfError>
where
    H: TabHost + ?Sized,
{
    if !*stop.borrow() {
        return Ok(());
    }

    // Pages the host cannot script get swapped for the fallback destination,
    // then extraction is retried after one settle delay
    let url = host.active_url().await?;
    if !is_web_url(&url) {
        info!("cannot script {}, redirecting to {}", url, config.fallback_url);
        host.navigate(&config.fallback_url).await?;
        let _ = events
            .send(SessionEvent::Redirected(config.fallback_url.clone()))
            .await;
        if !pause(config.reload_settle, stop).await {
            return Ok(());
        }
    }

    let hrefs = host.page_links().await?;
    let candidates = extractor::navigable_links(&hrefs, visited.lock().set());

    match navigator::select_and_go(host, &candidates, visited, rng).await? {
        Step::WentBack => {
            let _ = events
                .send(SessionEvent::WentBack("no unvisited links".to_string()))
                .await;
            Ok(())
        }
        Step::Navigated(target) => {
            debug!("visited {}", target);
            let _ = events.send(SessionEvent::Visited(target)).await;
            if !pause(config.load_wait, stop).await {
                return Ok(());
            }
            if !navigator::verify_landing(host).await? {
                let _ = events
                    .send(SessionEvent::WentBack("landing not ready".to_string()))
                    .await;
            }
            Ok(())
        }
    }
}

/// Fixed-duration wait raced against the stop signal. Returns false when
/// the walk was stopped (or the session went away) mid-wait; callers must
/// then issue no further host requests.
async fn pause(duration: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    let outcome = tokio::select! {
        _ = time::sleep(duration) => Ok(()),
        changed = stop.changed() => changed,
    };
    outcome.is_ok() && *stop.borrow()
}
