use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;

use super::{DocumentLookup, WebSound};
use crate::controller::{
    ControllerEvent, ControllerSnapshot, ListenerId, MediaEvent, SoundController, SoundRef,
    SoundState, WindowEvent,
};
use crate::options::ControllerOptions;
use crate::store::WebMuteStore;

type Controller = SoundController<DocumentLookup, WebMuteStore>;

/// Browser-facing controller. Owns the shared coordinator and the DOM
/// listeners feeding it; window listeners are detached on drop.
pub struct WebAudioController {
    inner: Rc<RefCell<Controller>>,
    window_listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl WebAudioController {
    pub fn new(options: ControllerOptions) -> Self {
        let store = WebMuteStore::from_options(&options);
        let window_events = WindowEvent::followed(&options);
        let mut controller = Self {
            inner: Rc::new(RefCell::new(SoundController::new(
                DocumentLookup,
                store,
                options,
            ))),
            window_listeners: Vec::new(),
        };
        controller.listen_to_window(window_events);
        controller
    }

    fn listen_to_window(&mut self, events: &[WindowEvent]) {
        let Some(win) = window() else {
            return;
        };
        for &event in events {
            let weak = Rc::downgrade(&self.inner);
            let cb = Closure::wrap(Box::new(move || {
                with_controller(&weak, |c| {
                    c.handle_window_event(event);
                })
            }) as Box<dyn FnMut()>);
            let name = event.dom_name();
            match win.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref()) {
                Ok(()) => self.window_listeners.push((name, cb)),
                Err(e) => tracing::warn!("failed to listen for window {name}: {e:?}"),
            }
        }
    }

    /// Registers the `<audio>` element with `id` and subscribes to its media
    /// events. Listeners are attached once per id.
    pub fn register(&self, id: &str) -> &Self {
        let Some(sound) = self.inner.borrow_mut().register_new(id) else {
            return self;
        };

        for event in MediaEvent::ALL {
            let weak = Rc::downgrade(&self.inner);
            let sound_id = id.to_string();
            let cb = Closure::wrap(Box::new(move || {
                with_controller(&weak, |c| {
                    c.handle_media_event(&sound_id, event);
                })
            }) as Box<dyn FnMut()>);
            if let Err(e) = sound
                .element()
                .add_event_listener_with_callback(event.dom_name(), cb.as_ref().unchecked_ref())
            {
                tracing::warn!(sound = id, "failed to listen for {}: {e:?}", event.dom_name());
            }
            cb.forget();
        }
        self
    }

    pub fn play<'a>(&self, target: impl Into<SoundRef<'a, WebSound>>) -> &Self {
        self.inner.borrow_mut().play(target);
        self
    }

    pub fn stop<'a>(&self, target: impl Into<SoundRef<'a, WebSound>>) -> &Self {
        self.inner.borrow_mut().stop(target);
        self
    }

    pub fn pause<'a>(&self, target: impl Into<SoundRef<'a, WebSound>>) -> &Self {
        self.inner.borrow_mut().pause(target);
        self
    }

    pub fn pause_all(&self) -> &Self {
        self.inner.borrow_mut().pause_all();
        self
    }

    pub fn resume_all_paused(&self) -> &Self {
        self.inner.borrow_mut().resume_all_paused();
        self
    }

    pub fn set_muted(&self, muted: bool) -> &Self {
        self.inner.borrow_mut().set_muted(muted);
        self
    }

    pub fn toggle_muted(&self) -> &Self {
        self.inner.borrow_mut().toggle_muted();
        self
    }

    pub fn is_muted(&self) -> bool {
        self.inner.borrow().is_muted()
    }

    pub fn state_of(&self, id: &str) -> Option<SoundState> {
        self.inner.borrow().state_of(id)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.inner.borrow().snapshot()
    }

    /// The listener runs while the controller is borrowed and must not call
    /// back into it.
    pub fn on_event<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.inner.borrow_mut().on_event(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().remove_listener(id)
    }
}

impl Drop for WebAudioController {
    fn drop(&mut self) {
        let Some(win) = window() else {
            return;
        };
        for (name, cb) in &self.window_listeners {
            let _ = win.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
        }
    }
}

fn with_controller(weak: &Weak<RefCell<Controller>>, f: impl FnOnce(&mut Controller)) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let borrowed = inner.try_borrow_mut();
    match borrowed {
        Ok(mut controller) => f(&mut *controller),
        Err(_) => tracing::warn!("controller busy, dropping DOM notification"),
    }
}
