#![allow(dead_code)]

#[macro_use]
mod macros;
mod host;
mod scripted;
mod simulated_server;

pub use host::RecordingHost;
pub use scripted::{Mode, ScriptedTransport};
pub use simulated_server::{SimulatedPlaylist, SimulatedServer};

use ontheair::{Config, Player};

use tokio::task::LocalSet;
use tokio::time::{sleep, Sleep};

use std::future::Future;
use std::net::Ipv4Addr;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Runs a test body on a [`LocalSet`]. Panics after the timeout.
pub struct Test {
    test: Pin<Box<dyn Future<Output = ()>>>,
    timeout: Pin<Box<Sleep>>,
}

impl Test {
    fn new<Fut: Future<Output = ()> + 'static>(test: Fut, timeout: Duration) -> Self {
        Test {
            test: Box::pin(test),
            timeout: Box::pin(sleep(timeout)),
        }
    }

    /// Serve `server`, connect a [`Player`] to it and run `func`
    pub async fn simulate<F, Fut>(server: SimulatedServer, func: F)
    where
        F: FnOnce(Player, Rc<RecordingHost>, SimulatedServer) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        init_logger();

        let addr = server.serve();
        let host = Rc::new(RecordingHost::default());
        let config = Config::new(Ipv4Addr::LOCALHOST, addr.port()).unwrap();
        let player = Player::new(config, host.clone()).unwrap();

        LocalSet::new()
            .run_until(Test::new(func(player, host, server), Duration::from_secs(5)))
            .await
    }

    /// Run `func` against a [`Player`] over a [`ScriptedTransport`]
    pub async fn scripted<F, Fut>(mode: Mode, func: F)
    where
        F: FnOnce(Player, Rc<RecordingHost>, Rc<ScriptedTransport>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        init_logger();

        let transport = Rc::new(ScriptedTransport::new(mode));
        let host = Rc::new(RecordingHost::default());
        let config = Config::new(Ipv4Addr::new(10, 0, 0, 20), 8081).unwrap();
        let player = Player::with_transport(config, transport.clone(), host.clone());

        LocalSet::new()
            .run_until(Test::new(func(player, host, transport), Duration::from_secs(5)))
            .await
    }
}

impl Future for Test {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.timeout.as_mut().poll(cx).is_ready() {
            panic!("Test took too long");
        }

        self.test.as_mut().poll(cx)
    }
}

pub fn init_logger() {
    if let Err(e) = pretty_env_logger::try_init() {
        log::warn!(target: "test::support", "Logger init() returned '{}'", e);
    }
}

/// Yield until `condition` holds. The surrounding [`Test`] bounds the wait.
pub async fn wait_for<F: Fn() -> bool>(condition: F) {
    while !condition() {
        sleep(Duration::from_millis(10)).await;
    }
}

/// Let spawned local tasks run to completion
pub async fn settle() {
    sleep(Duration::from_millis(50)).await;
}
