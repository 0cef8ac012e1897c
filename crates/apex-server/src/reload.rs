//! Live reload over WebSocket.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// WebSocket endpoint the reload client connects to.
pub const RELOAD_SOCKET_PATH: &str = "/__apex/reload";

/// Messages sent to browser tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Connection established
    Connected,

    /// A rebuild finished; reload the page
    Reload,

    /// A rebuild failed; the previous output is gone or stale
    BuildFailed {
        /// Error message from the builder
        message: String,
    },
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers just means no open tabs.
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side script served at [`apex_static::LIVE_RELOAD_SCRIPT`].
///
/// Connects back to whatever host served the page, so it works on any port.
pub fn reload_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const proto = location.protocol === 'https:' ? 'wss:' : 'ws:';
  const ws = new WebSocket(proto + '//' + location.host + '{}');

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'build_failed':
        console.error('[apex] Build failed:', msg.message);
        break;

      case 'connected':
        console.log('[apex] Live reload connected');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[apex] Disconnected, retrying...');
    setTimeout(function() {{ location.reload(); }}, 1000);
  }};
}})();
"#,
        RELOAD_SOCKET_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn send_without_subscribers_is_ignored() {
        ReloadHub::new().send(ReloadMessage::Connected);
    }

    #[test]
    fn serializes_messages() {
        let msg = ReloadMessage::BuildFailed {
            message: "Landing template not found".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains(r#""type":"build_failed""#));
        assert!(json.contains("Landing template not found"));
    }

    #[test]
    fn client_script_targets_socket_path() {
        let script = reload_client_script();

        assert!(script.contains("/__apex/reload'"));
        assert!(script.contains("location.reload()"));
    }
}
