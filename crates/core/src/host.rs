//! Frame scheduling and input-listener registration.
//!
//! Engines run on a display-synchronised callback: the host fires one frame,
//! the engine updates once and asks for the next frame. A [`FrameTask`] owns
//! the single pending request of an engine, so cancelling it is one call and
//! calling it again is harmless. [`ListenerSet`] does the same for input
//! listeners. [`ManualHost`] is the headless host: frames fire only when the
//! driver says so, and its counters double as test spies.

use std::fmt;

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Input events an engine can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    Resize,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKind::PointerMove => write!(f, "pointer-move"),
            ListenerKind::Resize => write!(f, "resize"),
        }
    }
}

/// The environment an engine runs in: a frame clock and an event source.
///
/// Object-safe; engines take `&mut dyn Host` on their lifecycle calls and
/// never store it.
pub trait Host {
    /// Requests one callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Registers interest in an input event.
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerHandle;

    /// Deregisters a listener. Unknown handles are ignored.
    fn remove_listener(&mut self, handle: ListenerHandle);
}

/// The at-most-one pending frame request of an engine.
#[derive(Debug, Default)]
pub struct FrameTask {
    pending: Option<FrameHandle>,
}

impl FrameTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the next frame, replacing any request still pending.
    pub fn schedule(&mut self, host: &mut dyn Host) {
        if let Some(old) = self.pending.take() {
            host.cancel_frame(old);
        }
        self.pending = Some(host.request_frame());
    }

    /// Marks the pending request as delivered if `delivered` is the handle
    /// this task is waiting on.
    ///
    /// Returns `false` for a frame belonging to someone else, or when nothing
    /// is scheduled (cancelled or never started); the caller should then skip
    /// its update.
    pub fn fire(&mut self, delivered: FrameHandle) -> bool {
        if self.pending != Some(delivered) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Cancels the pending request, if any. Idempotent.
    pub fn cancel(&mut self, host: &mut dyn Host) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }
}

/// Listeners registered by one engine, removed together.
#[derive(Debug, Default)]
pub struct ListenerSet {
    handles: Vec<ListenerHandle>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one listener per kind.
    pub fn register(&mut self, host: &mut dyn Host, kinds: &[ListenerKind]) {
        self.handles
            .extend(kinds.iter().map(|&kind| host.add_listener(kind)));
    }

    /// Removes every registered listener. Idempotent.
    pub fn clear(&mut self, host: &mut dyn Host) {
        for handle in self.handles.drain(..) {
            host.remove_listener(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Headless host with explicit frame delivery and bookkeeping counters.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    pending: Vec<FrameHandle>,
    listeners: Vec<(ListenerHandle, ListenerKind)>,
    frames_requested: usize,
    frames_cancelled: usize,
    listeners_added: usize,
    listeners_removed: usize,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers the oldest pending frame, as a display refresh would.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Frames requested and neither fired nor cancelled.
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Listeners currently registered.
    pub fn active_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners currently registered for `kind`.
    pub fn listeners_for(&self, kind: ListenerKind) -> usize {
        self.listeners.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn frames_cancelled(&self) -> usize {
        self.frames_cancelled
    }

    pub fn listeners_added(&self) -> usize {
        self.listeners_added
    }

    pub fn listeners_removed(&self) -> usize {
        self.listeners_removed
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.pending.push(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(pos) = self.pending.iter().position(|&h| h == handle) {
            self.pending.remove(pos);
            self.frames_cancelled += 1;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next());
        self.listeners.push((handle, kind));
        self.listeners_added += 1;
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        if let Some(pos) = self.listeners.iter().position(|(h, _)| *h == handle) {
            self.listeners.remove(pos);
            self.listeners_removed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_requests_exactly_one_frame() {
        let mut host = ManualHost::new();
        let mut task = FrameTask::new();
        task.schedule(&mut host);
        task.schedule(&mut host);
        assert_eq!(host.pending_frames(), 1, "rescheduling replaces the request");
        assert_eq!(host.frames_requested(), 2);
        assert_eq!(host.frames_cancelled(), 1);
        assert!(task.is_scheduled());
    }

    #[test]
    fn fire_consumes_the_request() {
        let mut host = ManualHost::new();
        let mut task = FrameTask::new();
        task.schedule(&mut host);
        let frame = host.take_frame().unwrap();
        assert!(task.fire(frame));
        assert!(!task.fire(frame), "a second delivery without reschedule is ignored");
    }

    #[test]
    fn fire_ignores_another_tasks_frame() {
        let mut host = ManualHost::new();
        let mut a = FrameTask::new();
        let mut b = FrameTask::new();
        a.schedule(&mut host);
        b.schedule(&mut host);
        let first = host.take_frame().unwrap();
        assert!(!b.fire(first));
        assert!(b.is_scheduled());
        assert!(a.fire(first));
        let second = host.take_frame().unwrap();
        assert!(b.fire(second));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut host = ManualHost::new();
        let mut task = FrameTask::new();
        task.cancel(&mut host);
        task.schedule(&mut host);
        task.cancel(&mut host);
        task.cancel(&mut host);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.frames_cancelled(), 1);
        assert!(!task.is_scheduled());
    }

    #[test]
    fn listener_set_registers_and_clears() {
        let mut host = ManualHost::new();
        let mut set = ListenerSet::new();
        set.register(&mut host, &[ListenerKind::PointerMove, ListenerKind::Resize]);
        assert_eq!(set.len(), 2);
        assert_eq!(host.listeners_for(ListenerKind::PointerMove), 1);
        assert_eq!(host.listeners_for(ListenerKind::Resize), 1);
        set.clear(&mut host);
        set.clear(&mut host);
        assert!(set.is_empty());
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(host.listeners_removed(), 2);
    }

    #[test]
    fn manual_host_ignores_unknown_handles() {
        let mut host = ManualHost::new();
        host.cancel_frame(FrameHandle(99));
        host.remove_listener(ListenerHandle(99));
        assert_eq!(host.frames_cancelled(), 0);
        assert_eq!(host.listeners_removed(), 0);
    }

    #[test]
    fn take_frame_delivers_in_request_order() {
        let mut host = ManualHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_eq!(host.take_frame(), Some(a));
        assert_eq!(host.take_frame(), Some(b));
        assert_eq!(host.take_frame(), None);
    }

    #[test]
    fn host_is_object_safe() {
        let mut host = ManualHost::new();
        let dyn_host: &mut dyn Host = &mut host;
        let h = dyn_host.request_frame();
        dyn_host.cancel_frame(h);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn listener_kind_display() {
        assert_eq!(ListenerKind::PointerMove.to_string(), "pointer-move");
        assert_eq!(ListenerKind::Resize.to_string(), "resize");
    }
}
