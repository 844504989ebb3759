// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stopping propagation.
//!
//! Shows the difference between `stop_propagation` (the current node finishes,
//! ancestors are skipped) and `stop_immediate_propagation` (nothing further
//! runs), and a listener that removes itself after its first call.
//!
//! Run:
//! - `cargo run -p perch_examples --example stop_propagation`

use std::cell::RefCell;
use std::rc::Rc;

use perch_event::{Event, EventDispatcher, ListenerKey};

type Trace = Rc<RefCell<Vec<&'static str>>>;

fn record(trace: &Trace, label: &'static str) -> impl Fn(&mut Event) + 'static {
    let trace = Rc::clone(trace);
    move |_: &mut Event| trace.borrow_mut().push(label)
}

fn run(title: &str, leaf: &EventDispatcher, trace: &Trace) {
    leaf.dispatch(&mut Event::new("triggered", true).unwrap());
    println!("{title}: {:?}", trace.borrow());
    trace.borrow_mut().clear();
}

fn main() {
    let leaf = EventDispatcher::new();
    let parent = EventDispatcher::new();
    leaf.set_parent(Some(&parent));
    let trace: Trace = Rc::default();

    let stopper = {
        let trace = Rc::clone(&trace);
        move |e: &mut Event| {
            trace.borrow_mut().push("leaf/stop");
            e.stop_propagation();
        }
    };
    let stop_key = leaf.add_event_listener("triggered", stopper).unwrap();
    leaf.add_event_listener("triggered", record(&trace, "leaf/after")).unwrap();
    parent.add_event_listener("triggered", record(&trace, "parent")).unwrap();
    run("stop_propagation", &leaf, &trace);

    leaf.remove_listener("triggered", stop_key);
    let immediate = {
        let trace = Rc::clone(&trace);
        move |e: &mut Event| {
            trace.borrow_mut().push("leaf/immediate");
            e.stop_immediate_propagation();
        }
    };
    let immediate_key = ListenerKey::unique();
    leaf.add_listener("triggered", immediate_key, immediate).unwrap();
    run("stop_immediate_propagation (registered last)", &leaf, &trace);

    leaf.remove_listener("triggered", immediate_key);
    let once_key = ListenerKey::unique();
    let weak_leaf = leaf.downgrade();
    let once_trace = Rc::clone(&trace);
    leaf.add_listener("triggered", once_key, move |_| {
        once_trace.borrow_mut().push("leaf/once");
        if let Some(leaf) = weak_leaf.upgrade() {
            leaf.remove_listener("triggered", once_key);
        }
    })
    .unwrap();
    run("self-removing, first", &leaf, &trace);
    run("self-removing, second", &leaf, &trace);
}
