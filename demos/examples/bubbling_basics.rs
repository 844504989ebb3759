// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubbling basics.
//!
//! Chain three dispatchers, register listeners along the chain, and dispatch
//! a bubbling and a non-bubbling event from the leaf.
//!
//! Run:
//! - `cargo run -p perch_examples --example bubbling_basics`

use std::cell::RefCell;
use std::rc::Rc;

use perch_event::{Event, EventDispatcher, EventType};

#[derive(Debug)]
struct Press {
    x: f32,
    y: f32,
}

fn main() {
    let button = EventDispatcher::new();
    let panel = EventDispatcher::new();
    let stage = EventDispatcher::new();
    button.set_parent(Some(&panel));
    panel.set_parent(Some(&stage));

    let trace = Rc::new(RefCell::new(Vec::new()));
    for (name, node) in [("button", &button), ("panel", &panel), ("stage", &stage)] {
        let trace = Rc::clone(&trace);
        node.add_event_listener(EventType::PRESS, move |e| {
            let at = e.data_as::<Press>().map(|p| (p.x, p.y));
            let origin = e.current_target().is_some_and(|c| e.is_target(&c));
            trace.borrow_mut().push(format!("{name}: at={at:?} at_origin={origin}"));
        })
        .unwrap();
    }

    println!("== Bubbling press ==");
    let mut press = Event::new(EventType::PRESS, true)
        .unwrap()
        .with_data(Press { x: 4.0, y: 2.5 });
    button.dispatch(&mut press);
    for line in trace.borrow_mut().drain(..) {
        println!("  {line}");
    }

    println!("== Non-bubbling press ==");
    button.dispatch_event_with(EventType::PRESS, false, None).unwrap();
    for line in trace.borrow_mut().drain(..) {
        println!("  {line}");
    }

    println!("== Listener types at stage ==");
    for ty in stage.event_types() {
        println!("  {ty}: {} listener(s)", stage.listener_count(&ty));
    }
}
