//! Push-Channel Listener
//!
//! Reconnecting WebSocket subscription for rental event notifications. Frame
//! classification is a pure function; the socket glue around it keeps a
//! liveness flag so no callback runs after teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use serde::Deserialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::config::PUSH_ENDPOINT;

/// Connection lifecycle, driven by socket callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    RentalCreated,
    RentalReturned,
}

/// A recognized push event. Absent payload fields fall back to placeholder
/// text so the notification always reads as a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    pub kind: PushKind,
    pub item_name: String,
    pub renter_name: String,
}

impl PushEvent {
    pub fn message(&self) -> String {
        match self.kind {
            PushKind::RentalCreated => {
                format!("{} rented by {}", self.item_name, self.renter_name)
            }
            PushKind::RentalReturned => {
                format!("{} returned by {}", self.item_name, self.renter_name)
            }
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Outcome of classifying one raw frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Event(PushEvent),
    /// Well-formed envelope with an unrecognized type; forward-compatible
    /// no-op.
    Unknown(String),
    /// Not a valid envelope; dropped without touching the connection.
    Malformed,
}

pub fn classify_frame(raw: &str) -> Frame {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(_) => return Frame::Malformed,
    };
    let kind = match envelope.kind.as_str() {
        "RENTAL_CREATED" => PushKind::RentalCreated,
        "RENTAL_RETURNED" => PushKind::RentalReturned,
        _ => return Frame::Unknown(envelope.kind),
    };
    Frame::Event(PushEvent {
        kind,
        item_name: field_or(&envelope.data, "itemName", "an item"),
        renter_name: field_or(&envelope.data, "renterName", "someone"),
    })
}

fn field_or(data: &serde_json::Value, field: &str, fallback: &str) -> String {
    data.get(field)
        .and_then(|value| value.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_owned())
}

/// `ws(s)://` URL for the push endpoint on the page's own host.
pub fn push_url() -> String {
    let location = web_sys::window().map(|w| w.location());
    let (protocol, host) = match &location {
        Some(location) => (
            location.protocol().unwrap_or_else(|_| "http:".to_string()),
            location.host().unwrap_or_else(|_| "localhost".to_string()),
        ),
        None => ("http:".to_string(), "localhost".to_string()),
    };
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}{PUSH_ENDPOINT}")
}

// ========================
// Socket Glue
// ========================

struct Callbacks {
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(ErrorEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

struct ListenerInner {
    state: ConnState,
    socket: Option<(WebSocket, Callbacks)>,
    /// Pending reconnect timer; replacing or dropping it cancels the timer.
    reconnect: Option<Timeout>,
}

struct ListenerShared {
    inner: RefCell<ListenerInner>,
    alive: Cell<bool>,
    url: String,
    delay_ms: u32,
    on_event: Box<dyn Fn(PushEvent)>,
    on_state: Box<dyn Fn(ConnState)>,
}

/// Owns the reconnect loop. Dropping the listener tears everything down:
/// pending timer cancelled, socket closed, late callbacks ignored.
pub struct PushListener {
    shared: Rc<ListenerShared>,
}

impl PushListener {
    pub fn start(
        url: String,
        delay_ms: u32,
        on_event: impl Fn(PushEvent) + 'static,
        on_state: impl Fn(ConnState) + 'static,
    ) -> Self {
        let shared = Rc::new(ListenerShared {
            inner: RefCell::new(ListenerInner {
                state: ConnState::Closed,
                socket: None,
                reconnect: None,
            }),
            alive: Cell::new(true),
            url,
            delay_ms,
            on_event: Box::new(on_event),
            on_state: Box::new(on_state),
        });
        connect(&shared);
        PushListener { shared }
    }

}

impl Drop for PushListener {
    fn drop(&mut self) {
        teardown(&self.shared);
    }
}

fn set_state(shared: &Rc<ListenerShared>, state: ConnState) {
    shared.inner.borrow_mut().state = state;
    (shared.on_state)(state);
}

fn connect(shared: &Rc<ListenerShared>) {
    if !shared.alive.get() {
        return;
    }
    set_state(shared, ConnState::Connecting);
    web_sys::console::log_1(&format!("[WS] connecting to {}", shared.url).into());

    let socket = match WebSocket::new(&shared.url) {
        Ok(socket) => socket,
        Err(err) => {
            web_sys::console::warn_1(&format!("[WS] connect failed: {err:?}").into());
            set_state(shared, ConnState::Closed);
            schedule_reconnect(shared);
            return;
        }
    };

    let on_open = {
        let shared = Rc::clone(shared);
        Closure::<dyn FnMut()>::new(move || {
            if shared.alive.get() {
                web_sys::console::log_1(&"[WS] connected".into());
                set_state(&shared, ConnState::Open);
            }
        })
    };
    let on_message = {
        let shared = Rc::clone(shared);
        Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            if !shared.alive.get() {
                return;
            }
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match classify_frame(&text) {
                Frame::Event(event) => (shared.on_event)(event),
                Frame::Unknown(kind) => {
                    web_sys::console::log_1(&format!("[WS] ignoring event type {kind}").into());
                }
                Frame::Malformed => {
                    web_sys::console::warn_1(&format!("[WS] dropping malformed frame: {text}").into());
                }
            }
        })
    };
    let on_error = Closure::<dyn FnMut(ErrorEvent)>::new(move |_: ErrorEvent| {
        // The browser fires close right after error; reconnection is driven
        // from the close handler.
        web_sys::console::warn_1(&"[WS] socket error".into());
    });
    let on_close = {
        let shared = Rc::clone(shared);
        Closure::<dyn FnMut(CloseEvent)>::new(move |_: CloseEvent| {
            if !shared.alive.get() {
                return;
            }
            web_sys::console::log_1(&"[WS] connection closed".into());
            set_state(&shared, ConnState::Closed);
            schedule_reconnect(&shared);
        })
    };

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    shared.inner.borrow_mut().socket = Some((
        socket,
        Callbacks {
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        },
    ));
}

fn schedule_reconnect(shared: &Rc<ListenerShared>) {
    if !shared.alive.get() {
        return;
    }
    let delay = shared.delay_ms;
    let timer = {
        let shared = Rc::clone(shared);
        // The fired timer stays in its slot until the next schedule or
        // teardown replaces it; dropping it then is a no-op.
        Timeout::new(delay, move || {
            if shared.alive.get() {
                web_sys::console::log_1(&"[WS] reconnecting".into());
                connect(&shared);
            }
        })
    };
    shared.inner.borrow_mut().reconnect = Some(timer);
}

fn teardown(shared: &Rc<ListenerShared>) {
    if !shared.alive.get() {
        return;
    }
    shared.alive.set(false);
    let mut inner = shared.inner.borrow_mut();
    inner.reconnect = None;
    if let Some((socket, _callbacks)) = inner.socket.take() {
        socket.set_onopen(None);
        socket.set_onmessage(None);
        socket.set_onerror(None);
        socket.set_onclose(None);
        let _ = socket.close();
    }
    inner.state = ConnState::Closed;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;
    use crate::cache::{EntityKind, QueryCache, QueryKey};

    #[test]
    fn test_recognized_frames_carry_payload_names() {
        let frame = classify_frame(
            r#"{"type":"RENTAL_RETURNED","data":{"itemName":"Umbrella","renterName":"Kim"}}"#,
        );
        let Frame::Event(event) = frame else {
            panic!("expected a recognized event");
        };
        assert_eq!(event.kind, PushKind::RentalReturned);
        assert_eq!(event.item_name, "Umbrella");
        assert_eq!(event.renter_name, "Kim");
        assert_eq!(event.message(), "Umbrella returned by Kim");
    }

    #[test]
    fn test_absent_payload_fields_fall_back_to_placeholders() {
        let frame = classify_frame(r#"{"type":"RENTAL_CREATED","data":{}}"#);
        let Frame::Event(event) = frame else {
            panic!("expected a recognized event");
        };
        assert_eq!(event.item_name, "an item");
        assert_eq!(event.renter_name, "someone");

        // Missing data object entirely is still a valid envelope.
        let frame = classify_frame(r#"{"type":"RENTAL_CREATED"}"#);
        assert!(matches!(frame, Frame::Event(_)));
    }

    #[test]
    fn test_unknown_type_is_ignored_not_an_error() {
        let frame = classify_frame(r#"{"type":"STOCK_ADJUSTED","data":{}}"#);
        assert_eq!(frame, Frame::Unknown("STOCK_ADJUSTED".to_string()));
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        assert_eq!(classify_frame("not json"), Frame::Malformed);
        assert_eq!(classify_frame(r#"{"data":{}}"#), Frame::Malformed);
    }

    #[test]
    fn test_returned_event_invalidates_both_collections_and_notifies_once() {
        let clock: crate::cache::Clock = Rc::new(|| 0.0);
        let cache = QueryCache::new(clock);
        let rental_loads = Rc::new(Cell::new(0u32));
        let item_loads = Rc::new(Cell::new(0u32));
        let mut notices: Vec<String> = Vec::new();

        let seed = |counter: &Rc<Cell<u32>>| {
            let counter = Rc::clone(counter);
            move || {
                counter.set(counter.get() + 1);
                futures::future::ready(Ok::<Vec<u32>, crate::api::ApiError>(vec![1]))
            }
        };

        block_on(async {
            cache
                .fetch(QueryKey::all(EntityKind::Rentals), seed(&rental_loads))
                .await
                .expect("seed rentals");
            cache
                .fetch(QueryKey::all(EntityKind::Items), seed(&item_loads))
                .await
                .expect("seed items");

            // The listener's event path: classify, invalidate, notify.
            let raw = r#"{"type":"RENTAL_RETURNED","data":{"itemName":"Umbrella","renterName":"Kim"}}"#;
            if let Frame::Event(event) = classify_frame(raw) {
                cache.invalidate_after_mutation();
                notices.push(event.message());
            }

            cache
                .fetch(QueryKey::all(EntityKind::Rentals), seed(&rental_loads))
                .await
                .expect("rentals reload");
            cache
                .fetch(QueryKey::all(EntityKind::Items), seed(&item_loads))
                .await
                .expect("items reload");
        });

        assert_eq!(rental_loads.get(), 2);
        assert_eq!(item_loads.get(), 2);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("Umbrella"));
        assert!(notices[0].contains("Kim"));
    }
}
