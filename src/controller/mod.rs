//! Sound registry and playback coordinator.
//! Keeps playing / explicitly paused / auto-paused bookkeeping for every
//! registered sound and reacts to platform media notifications.

mod events;
mod sound_set;

use std::collections::HashMap;

use serde::Serialize;

use crate::options::ControllerOptions;
use crate::store::MuteStore;

pub use events::{ControllerEvent, ListenerId, MediaEvent, WindowEvent};
pub(crate) use events::Listeners;
pub use sound_set::SoundSet;

/// Platform media handle the controller drives.
pub trait SoundHandle: Clone {
    /// Identifier the handle is registered under.
    fn id(&self) -> String;
    /// Whether the handle starts playing on its own once loaded.
    fn autoplay(&self) -> bool;
    fn play(&self);
    fn pause(&self);
    fn set_current_time(&self, seconds: f64);
}

/// Resolves identifiers to platform handles at registration time.
pub trait SoundLookup {
    type Handle: SoundHandle;

    fn lookup(&self, id: &str) -> Option<Self::Handle>;
}

/// A sound addressed either by id or by its handle.
#[derive(Debug)]
pub enum SoundRef<'a, H> {
    Id(&'a str),
    Handle(&'a H),
}

impl<H> Clone for SoundRef<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for SoundRef<'_, H> {}

impl<'a, H> From<&'a str> for SoundRef<'a, H> {
    fn from(id: &'a str) -> Self {
        SoundRef::Id(id)
    }
}

impl<'a, H> From<&'a String> for SoundRef<'a, H> {
    fn from(id: &'a String) -> Self {
        SoundRef::Id(id.as_str())
    }
}

/// Where a registered sound currently sits in the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundState {
    Idle,
    Playing,
    Paused,
    AutoPaused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundStatus {
    pub id: String,
    pub state: SoundState,
}

/// Point-in-time view used by UIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub muted: bool,
    pub sounds: Vec<SoundStatus>,
}

/// Coordinates playback of registered sounds.
///
/// Direct calls update the membership sets immediately; the matching
/// platform notifications arriving later are idempotent, so an id is never
/// in more than one set at a time.
pub struct SoundController<L: SoundLookup, S: MuteStore> {
    options: ControllerOptions,
    lookup: L,
    store: S,
    sounds: HashMap<String, L::Handle>,
    order: SoundSet,
    playing: SoundSet,
    paused: SoundSet,
    auto_paused: SoundSet,
    loaded: SoundSet,
    muted: bool,
    listeners: Listeners,
}

impl<L: SoundLookup, S: MuteStore> SoundController<L, S> {
    /// Creates a controller, restoring the persisted mute flag from `store`.
    pub fn new(lookup: L, store: S, options: ControllerOptions) -> Self {
        let muted = match store.load() {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                tracing::warn!("failed to restore mute flag: {e}");
                false
            }
        };
        Self {
            options,
            lookup,
            store,
            sounds: HashMap::new(),
            order: SoundSet::new(),
            playing: SoundSet::new(),
            paused: SoundSet::new(),
            auto_paused: SoundSet::new(),
            loaded: SoundSet::new(),
            muted,
            listeners: Listeners::default(),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.sounds.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn sound_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter()
    }

    pub fn playing(&self) -> &SoundSet {
        &self.playing
    }

    pub fn paused(&self) -> &SoundSet {
        &self.paused
    }

    pub fn auto_paused(&self) -> &SoundSet {
        &self.auto_paused
    }

    /// `None` for ids that were never registered.
    pub fn state_of(&self, id: &str) -> Option<SoundState> {
        if !self.is_registered(id) {
            return None;
        }
        Some(if self.playing.contains(id) {
            SoundState::Playing
        } else if self.paused.contains(id) {
            SoundState::Paused
        } else if self.auto_paused.contains(id) {
            SoundState::AutoPaused
        } else {
            SoundState::Idle
        })
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            muted: self.muted,
            sounds: self
                .order
                .iter()
                .filter_map(|id| {
                    self.state_of(id).map(|state| SoundStatus {
                        id: id.to_string(),
                        state,
                    })
                })
                .collect(),
        }
    }

    pub fn on_event<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Looks `id` up and adds it to the registry. Unknown ids are ignored;
    /// registering an id again only refreshes its handle.
    pub fn register(&mut self, id: &str) -> &mut Self {
        self.register_new(id);
        self
    }

    /// Registers `id` and hands back its handle only the first time, so
    /// platform listeners get attached once per id.
    pub fn register_new(&mut self, id: &str) -> Option<L::Handle> {
        let Some(handle) = self.lookup.lookup(id) else {
            tracing::debug!(sound = id, "register skipped, no such element");
            return None;
        };
        if self.sounds.insert(id.to_string(), handle.clone()).is_some() {
            return None;
        }
        let autoplay = handle.autoplay();
        self.order.insert(id);
        tracing::info!(sound = id, autoplay, "registered sound");
        self.listeners.emit(ControllerEvent::Registered { id: id.to_string() });

        if autoplay && !self.muted && self.playing.insert(id) {
            self.listeners.emit(ControllerEvent::Playing { id: id.to_string() });
        }
        Some(handle)
    }

    /// Returns the registered handle for `target`.
    pub fn resolve<'a>(&self, target: impl Into<SoundRef<'a, L::Handle>>) -> Option<&L::Handle>
    where
        L::Handle: 'a,
    {
        let id = self.resolve_id(target.into())?;
        self.sounds.get(&id)
    }

    fn resolve_id(&self, target: SoundRef<'_, L::Handle>) -> Option<String> {
        let id = match target {
            SoundRef::Id(id) => id.to_string(),
            SoundRef::Handle(handle) => handle.id(),
        };
        if self.sounds.contains_key(&id) {
            Some(id)
        } else {
            tracing::debug!(sound = %id, "ignoring unregistered sound");
            None
        }
    }

    /// Starts playback. While muted the sound is parked in the auto-paused
    /// set instead, so unmuting starts it.
    pub fn play<'a>(&mut self, target: impl Into<SoundRef<'a, L::Handle>>) -> &mut Self
    where
        L::Handle: 'a,
    {
        let Some(id) = self.resolve_id(target.into()) else {
            return self;
        };
        self.paused.remove(&id);
        if self.muted {
            self.auto_paused.insert(&id);
            tracing::debug!(sound = %id, "muted, deferring playback");
            return self;
        }
        if let Some(handle) = self.sounds.get(&id) {
            handle.play();
        }
        self.auto_paused.remove(&id);
        if self.playing.insert(&id) {
            self.listeners.emit(ControllerEvent::Playing { id });
        }
        self
    }

    /// Pauses and rewinds. A stopped sound is not resumed automatically.
    pub fn stop<'a>(&mut self, target: impl Into<SoundRef<'a, L::Handle>>) -> &mut Self
    where
        L::Handle: 'a,
    {
        let Some(id) = self.resolve_id(target.into()) else {
            return self;
        };
        if let Some(handle) = self.sounds.get(&id) {
            handle.pause();
            handle.set_current_time(0.0);
        }
        let was_playing = self.playing.remove(&id);
        let was_paused = self.paused.remove(&id);
        let was_auto_paused = self.auto_paused.remove(&id);
        if was_playing || was_paused || was_auto_paused {
            self.listeners.emit(ControllerEvent::Stopped { id });
        }
        self
    }

    /// Pauses on behalf of the user. Use [`stop`](Self::stop) to also rewind.
    pub fn pause<'a>(&mut self, target: impl Into<SoundRef<'a, L::Handle>>) -> &mut Self
    where
        L::Handle: 'a,
    {
        let Some(id) = self.resolve_id(target.into()) else {
            return self;
        };
        if let Some(handle) = self.sounds.get(&id) {
            handle.pause();
        }
        self.playing.remove(&id);
        self.auto_paused.remove(&id);
        if self.paused.insert(&id) {
            self.listeners.emit(ControllerEvent::Paused { id, auto: false });
        }
        self
    }

    /// Pauses every playing sound and marks it for [`resume_all_paused`](Self::resume_all_paused).
    /// Explicitly paused sounds are left alone.
    pub fn pause_all(&mut self) -> &mut Self {
        for id in self.playing.take() {
            if let Some(handle) = self.sounds.get(&id) {
                handle.pause();
            }
            self.auto_paused.insert(&id);
            self.listeners.emit(ControllerEvent::Paused { id, auto: true });
        }
        self
    }

    /// Restarts every auto-paused sound. Does nothing while muted.
    pub fn resume_all_paused(&mut self) -> &mut Self {
        if self.muted {
            return self;
        }
        for id in self.auto_paused.take() {
            self.play(id.as_str());
        }
        self
    }

    /// Sets and persists the mute flag, then pauses or resumes accordingly.
    pub fn set_muted(&mut self, muted: bool) -> &mut Self {
        let changed = self.muted != muted;
        self.muted = muted;
        if let Err(e) = self.store.save(muted) {
            tracing::warn!("failed to persist mute flag: {e}");
        }
        if changed {
            tracing::info!(muted, "mute changed");
            self.listeners.emit(ControllerEvent::MuteChanged { muted });
        }
        if muted {
            self.pause_all()
        } else {
            self.resume_all_paused()
        }
    }

    pub fn toggle_muted(&mut self) -> &mut Self {
        self.set_muted(!self.muted)
    }

    /// Blur pauses everything playing; focus resumes what blur paused.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> &mut Self {
        match event {
            WindowEvent::Blur => self.pause_all(),
            WindowEvent::Focus => self.resume_all_paused(),
        }
    }

    /// Applies a notification raised by the handle registered under `id`.
    pub fn handle_media_event(&mut self, id: &str, event: MediaEvent) -> &mut Self {
        if !self.is_registered(id) {
            return self;
        }
        let id = id.to_string();
        match event {
            MediaEvent::Ended => {
                self.playing.remove(&id);
                self.paused.remove(&id);
                self.auto_paused.remove(&id);
                self.listeners.emit(ControllerEvent::Ended { id });
            }
            MediaEvent::Pause => {
                if self.playing.remove(&id) {
                    self.listeners.emit(ControllerEvent::Paused { id, auto: false });
                }
            }
            MediaEvent::Play if self.muted => {
                if let Some(handle) = self.sounds.get(&id) {
                    handle.pause();
                    handle.set_current_time(0.0);
                }
                self.playing.remove(&id);
                self.paused.remove(&id);
                if self.auto_paused.insert(&id) {
                    tracing::debug!(sound = %id, "muted, stopped platform playback");
                    self.listeners.emit(ControllerEvent::Paused { id, auto: true });
                }
            }
            MediaEvent::Play => {
                self.paused.remove(&id);
                self.auto_paused.remove(&id);
                if self.playing.insert(&id) {
                    self.listeners.emit(ControllerEvent::Playing { id });
                }
            }
            MediaEvent::Loaded => {
                if self.loaded.insert(&id) {
                    self.listeners.emit(ControllerEvent::Loaded { id });
                }
            }
        }
        self
    }
}

impl<L: SoundLookup, S: MuteStore> std::fmt::Debug for SoundController<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundController")
            .field("options", &self.options)
            .field("sounds", &self.order)
            .field("playing", &self.playing)
            .field("paused", &self.paused)
            .field("auto_paused", &self.auto_paused)
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryMuteStore, StoreError};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play,
        Pause,
        Seek(f64),
    }

    #[derive(Debug, Clone)]
    struct FakeSound {
        id: String,
        autoplay: bool,
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl SoundHandle for FakeSound {
        fn id(&self) -> String {
            self.id.clone()
        }
        fn autoplay(&self) -> bool {
            self.autoplay
        }
        fn play(&self) {
            self.calls.borrow_mut().push(Call::Play);
        }
        fn pause(&self) {
            self.calls.borrow_mut().push(Call::Pause);
        }
        fn set_current_time(&self, seconds: f64) {
            self.calls.borrow_mut().push(Call::Seek(seconds));
        }
    }

    impl<'a> From<&'a FakeSound> for SoundRef<'a, FakeSound> {
        fn from(sound: &'a FakeSound) -> Self {
            SoundRef::Handle(sound)
        }
    }

    #[derive(Default)]
    struct FakePage {
        sounds: HashMap<String, FakeSound>,
    }

    impl FakePage {
        fn with(mut self, id: &str, autoplay: bool) -> Self {
            self.sounds.insert(
                id.to_string(),
                FakeSound {
                    id: id.to_string(),
                    autoplay,
                    calls: Rc::default(),
                },
            );
            self
        }

        fn calls(&self, id: &str) -> Vec<Call> {
            self.sounds[id].calls.borrow().clone()
        }
    }

    impl SoundLookup for Rc<FakePage> {
        type Handle = FakeSound;

        fn lookup(&self, id: &str) -> Option<FakeSound> {
            self.sounds.get(id).cloned()
        }
    }

    struct FailingStore;

    impl MuteStore for FailingStore {
        fn load(&self) -> Result<Option<bool>, StoreError> {
            Err(StoreError::NoDocument)
        }
        fn save(&mut self, _muted: bool) -> Result<(), StoreError> {
            Err(StoreError::Cookie("blocked".to_string()))
        }
    }

    fn controller(
        page: &Rc<FakePage>,
        store: MemoryMuteStore,
    ) -> SoundController<Rc<FakePage>, MemoryMuteStore> {
        SoundController::new(page.clone(), store, ControllerOptions::default())
    }

    #[test]
    fn construction_restores_persisted_mute() {
        let page = Rc::new(FakePage::default());
        assert!(controller(&page, MemoryMuteStore::with_value(true)).is_muted());
        assert!(!controller(&page, MemoryMuteStore::new()).is_muted());
    }

    #[test]
    fn store_failures_fall_back_to_unmuted_and_do_not_block_muting() {
        let page = Rc::new(FakePage::default().with("music", false));
        let mut c = SoundController::new(page.clone(), FailingStore, ControllerOptions::default());
        assert!(!c.is_muted());

        c.register("music").play("music").set_muted(true);
        assert!(c.is_muted());
        assert_eq!(c.state_of("music"), Some(SoundState::AutoPaused));
    }

    #[test]
    fn autoplay_registration_skipped_while_muted() {
        let page = Rc::new(FakePage::default().with("intro", true));
        let mut c = controller(&page, MemoryMuteStore::with_value(true));
        c.register("intro");
        assert!(c.playing().is_empty());
        assert_eq!(c.state_of("intro"), Some(SoundState::Idle));
    }

    #[test]
    fn play_event_while_muted_stops_platform_playback() {
        let page = Rc::new(FakePage::default().with("intro", true));
        let mut c = controller(&page, MemoryMuteStore::with_value(true));
        c.register("intro").handle_media_event("intro", MediaEvent::Play);

        assert_eq!(page.calls("intro"), vec![Call::Pause, Call::Seek(0.0)]);
        assert_eq!(c.state_of("intro"), Some(SoundState::AutoPaused));

        c.set_muted(false);
        assert_eq!(c.state_of("intro"), Some(SoundState::Playing));
        assert!(c.auto_paused().is_empty());
    }

    #[test]
    fn play_while_muted_defers_until_unmuted() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::with_value(true));
        c.register("click").play("click");

        assert!(page.calls("click").is_empty());
        assert_eq!(c.state_of("click"), Some(SoundState::AutoPaused));

        c.set_muted(false);
        assert_eq!(page.calls("click"), vec![Call::Play]);
        assert_eq!(c.state_of("click"), Some(SoundState::Playing));
    }

    #[test]
    fn play_event_confirmation_does_not_duplicate() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("click")
            .play("click")
            .handle_media_event("click", MediaEvent::Play);
        assert_eq!(c.playing().len(), 1);
    }

    #[test]
    fn stop_rewinds_and_is_not_resumed() {
        let page = Rc::new(FakePage::default().with("loop", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("loop").play("loop").stop("loop");

        assert_eq!(
            page.calls("loop"),
            vec![Call::Play, Call::Pause, Call::Seek(0.0)]
        );
        c.resume_all_paused();
        assert_eq!(c.state_of("loop"), Some(SoundState::Idle));
    }

    #[test]
    fn handle_reference_resolves_to_registered_sound() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("click");

        let handle = page.sounds["click"].clone();
        c.play(&handle);
        assert_eq!(c.state_of("click"), Some(SoundState::Playing));
        assert_eq!(c.resolve(&handle).map(|h| h.id()), Some("click".to_string()));
        assert!(c.resolve("missing").is_none());
    }

    #[test]
    fn external_pause_event_leaves_sound_idle() {
        let page = Rc::new(FakePage::default().with("music", true));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("music")
            .handle_media_event("music", MediaEvent::Pause);
        assert_eq!(c.state_of("music"), Some(SoundState::Idle));

        c.resume_all_paused();
        assert_eq!(c.state_of("music"), Some(SoundState::Idle));
    }

    #[test]
    fn explicit_pause_of_auto_paused_sound_cancels_resume() {
        let page = Rc::new(FakePage::default().with("music", true));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("music").pause_all().pause("music").resume_all_paused();
        assert_eq!(c.state_of("music"), Some(SoundState::Paused));
    }

    #[test]
    fn events_follow_transitions() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        c.on_event(move |event| sink.borrow_mut().push(event.clone()));

        c.register("click")
            .register("click")
            .handle_media_event("click", MediaEvent::Loaded)
            .play("click")
            .handle_media_event("click", MediaEvent::Play)
            .set_muted(true)
            .handle_media_event("click", MediaEvent::Pause);

        let id = || "click".to_string();
        assert_eq!(
            *seen.borrow(),
            vec![
                ControllerEvent::Registered { id: id() },
                ControllerEvent::Loaded { id: id() },
                ControllerEvent::Playing { id: id() },
                ControllerEvent::MuteChanged { muted: true },
                ControllerEvent::Paused { id: id(), auto: true },
            ]
        );
    }

    #[test]
    fn re_registering_keeps_explicit_pause() {
        let page = Rc::new(FakePage::default().with("music", true));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("music").pause("music").register("music");
        assert_eq!(c.state_of("music"), Some(SoundState::Paused));

        c.handle_window_event(WindowEvent::Blur)
            .handle_window_event(WindowEvent::Focus);
        assert_eq!(c.state_of("music"), Some(SoundState::Paused));
        assert_eq!(page.calls("music"), vec![Call::Pause]);
    }

    #[test]
    fn register_new_hands_out_handle_once() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        assert_eq!(c.register_new("click").map(|h| h.id()), Some("click".to_string()));
        assert!(c.register_new("click").is_none());
        assert!(c.register_new("missing").is_none());
        assert!(c.is_registered("click"));
    }

    #[test]
    fn window_blur_and_focus_round_trip_playing_sounds() {
        let page = Rc::new(FakePage::default().with("music", true));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("music").handle_window_event(WindowEvent::Blur);
        assert_eq!(c.state_of("music"), Some(SoundState::AutoPaused));

        c.handle_window_event(WindowEvent::Focus);
        assert_eq!(c.state_of("music"), Some(SoundState::Playing));
        assert_eq!(page.calls("music"), vec![Call::Pause, Call::Play]);
    }

    #[test]
    fn rejected_play_follow_up_drops_sound_from_playing() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("click").play("click");
        if let Some(event) = MediaEvent::after_rejected_play(true) {
            c.handle_media_event("click", event);
        }
        assert_eq!(c.state_of("click"), Some(SoundState::Idle));
    }

    #[test]
    fn stop_and_loaded_emit_once() {
        let page = Rc::new(FakePage::default().with("click", false));
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("click");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        c.on_event(move |event| sink.borrow_mut().push(event.clone()));

        c.stop("click")
            .handle_media_event("click", MediaEvent::Loaded)
            .handle_media_event("click", MediaEvent::Loaded)
            .play("click")
            .stop("click")
            .stop("click");

        let id = || "click".to_string();
        assert_eq!(
            *seen.borrow(),
            vec![
                ControllerEvent::Loaded { id: id() },
                ControllerEvent::Playing { id: id() },
                ControllerEvent::Stopped { id: id() },
            ]
        );
    }

    #[test]
    fn snapshot_lists_sounds_in_registration_order() {
        let page = Rc::new(
            FakePage::default()
                .with("b", true)
                .with("a", false)
                .with("c", false),
        );
        let mut c = controller(&page, MemoryMuteStore::new());
        c.register("b").register("a").register("c").pause("a");

        let snapshot = c.snapshot();
        assert!(!snapshot.muted);
        assert_eq!(
            snapshot.sounds,
            vec![
                SoundStatus { id: "b".into(), state: SoundState::Playing },
                SoundStatus { id: "a".into(), state: SoundState::Paused },
                SoundStatus { id: "c".into(), state: SoundState::Idle },
            ]
        );
    }
}
