/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2025 Josh Kropf <josh@slashdev.ca>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use tokio::sync::watch;

/// Create a linked handle/token pair, firing the handle cancels every clone of the token
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

pub struct CancelHandle {
    tx: watch::Sender<bool>
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>
}

impl CancelToken {
    /// Token that is never cancelled
    pub fn none() -> Self {
        cancel_pair().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled, never resolves if the handle was dropped without firing
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();

        loop {
            if *rx.borrow_and_update() {
                return;
            }

            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn none_is_never_cancelled() {
        assert!(!CancelToken::none().is_cancelled());
    }

    #[tokio::test]
    async fn cancel_wakes_waiter() {
        let (handle, token) = cancel_pair();
        let waiter = token.clone();

        let task = tokio::spawn(async move { waiter.cancelled().await });
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), task).await
            .expect("waiter should wake")
            .unwrap();

        assert!(token.is_cancelled());
    }
}
