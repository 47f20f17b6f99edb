use log::{debug, warn};

use crate::api::host::{Host, ListenerId};
use crate::input::viewport::HostEventKind;

/// Listeners registered for one mounted backdrop.
///
/// Acquired together at mount and released together at teardown; the owning
/// backdrop also releases on drop, so no exit path leaves a handler behind.
#[derive(Debug, Default)]
pub struct ListenerSet {
    ids: Vec<(HostEventKind, ListenerId)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self {
            ids: Vec::with_capacity(HostEventKind::ALL.len()),
        }
    }

    /// Subscribe to every host notification kind. Kinds the host refuses are
    /// logged and skipped; the rest still work.
    pub fn register_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for kind in HostEventKind::ALL {
            if self.ids.iter().any(|(k, _)| *k == kind) {
                continue;
            }
            match host.subscribe(kind) {
                Some(id) => self.ids.push((kind, id)),
                None => warn!("host refused {:?} listener", kind),
            }
        }
        debug!("registered {} listeners", self.ids.len());
    }

    /// Remove every registered listener.
    pub fn release<H: Host + ?Sized>(&mut self, host: &mut H) {
        for (_, id) in self.ids.drain(..) {
            host.unsubscribe(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
