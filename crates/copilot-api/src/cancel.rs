//! Cooperative cancellation for in-flight requests.
//!
//! A screen that starts a request keeps the [`CancelHandle`] and hands
//! the [`CancelToken`] to the request. Tearing the screen down (or
//! superseding the request) drops or fires the handle, and the
//! request resolves as [`ClientError::Cancelled`] instead of hanging
//! around to deliver a stale result.
//!
//! [`ClientError::Cancelled`]: crate::error::ClientError::Cancelled

use tokio::sync::watch;

/// Creates a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Owner side of a cancellation signal.
///
/// Cancels explicitly via [`cancel`](CancelHandle::cancel) and
/// implicitly when dropped, so a forgotten handle can not leave a
/// request running past its screen.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Fires the signal; every linked token observes it.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(true);
    }
}

/// Token observed by an in-flight request. Cloneable so one signal can
/// cover several requests started together.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// True once the linked handle has fired or been dropped.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the linked handle fires or is dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender gone; Drop fires before release, so treat a
                // closed channel as cancelled.
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_starts_uncancelled() {
        let (_handle, token) = cancel_pair();
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_fires_token() {
        let (handle, token) = cancel_pair();

        handle.cancel();

        assert!(token.is_cancelled());
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_drop_fires_token() {
        let (handle, token) = cancel_pair();

        drop(handle);

        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_cloned_tokens_share_signal() {
        let (handle, token) = cancel_pair();
        let clone = token.clone();

        handle.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_pending_waiter() {
        let (handle, token) = cancel_pair();

        let waiter = tokio::spawn(async move { token.cancelled().await });
        handle.cancel();

        waiter.await.unwrap();
    }
}
