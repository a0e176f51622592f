use serde::Serialize;

use crate::options::ControllerOptions;

/// Notifications raised by a platform media handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    Loaded,
}

impl MediaEvent {
    pub const ALL: [MediaEvent; 4] = [
        MediaEvent::Play,
        MediaEvent::Pause,
        MediaEvent::Ended,
        MediaEvent::Loaded,
    ];

    /// DOM event type the notification is delivered under.
    pub fn dom_name(self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
            MediaEvent::Loaded => "canplaythrough",
        }
    }

    /// Notification to synthesize after the platform rejected a play request.
    /// A rejection leaves the element paused without raising `pause`.
    pub fn after_rejected_play(still_paused: bool) -> Option<MediaEvent> {
        still_paused.then_some(MediaEvent::Pause)
    }
}

/// Window focus notifications the controller follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Blur,
    Focus,
}

impl WindowEvent {
    /// Window events to subscribe to under `options`.
    pub fn followed(options: &ControllerOptions) -> &'static [WindowEvent] {
        if options.pause_all_on_lost_window_focus {
            &[WindowEvent::Blur, WindowEvent::Focus]
        } else {
            &[]
        }
    }

    pub fn dom_name(self) -> &'static str {
        match self {
            WindowEvent::Blur => "blur",
            WindowEvent::Focus => "focus",
        }
    }
}

/// Controller-level notifications, emitted only when a sound actually
/// changes state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    Registered { id: String },
    Loaded { id: String },
    Playing { id: String },
    Paused { id: String, auto: bool },
    Stopped { id: String },
    Ended { id: String },
    MuteChanged { muted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ControllerEvent)>;

/// Registered event callbacks. Listeners run while the controller is
/// borrowed and must not call back into it.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: ControllerEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
