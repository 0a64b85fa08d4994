//! Background reconciliation sweeps

pub mod activity;
pub mod expiry;

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use tokio::sync::broadcast;

/// Cooperative shutdown signal shared by the server and the sweep loops.
/// Triggering stops rescheduling; an in-flight sweep batch finishes first.
#[derive(Clone)]
pub struct Shutdown {
  tx: broadcast::Sender<()>,
  fired: Arc<AtomicBool>,
}

impl Shutdown {
  pub fn new() -> Self {
    let (tx, _) = broadcast::channel(1);
    Self { tx, fired: Arc::new(AtomicBool::new(false)) }
  }

  pub fn trigger(&self) {
    if !self.fired.swap(true, Ordering::SeqCst) {
      let _ = self.tx.send(());
    }
  }

  /// Resolves once `trigger` has been called; immediately if it already
  /// was.
  pub async fn wait(&self) {
    // Subscribe before checking the flag so a trigger between the two
    // cannot be missed.
    let mut rx = self.tx.subscribe();
    if self.fired.load(Ordering::SeqCst) {
      return;
    }
    let _ = rx.recv().await;
  }
}

impl Default for Shutdown {
  fn default() -> Self {
    Self::new()
  }
}
