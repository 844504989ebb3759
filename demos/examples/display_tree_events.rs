// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree events.
//!
//! Assemble a subtree off-stage, attach it to the stage, reparent a node, and
//! broadcast a per-frame event. Every membership event is printed as it
//! arrives.
//!
//! Run:
//! - `cargo run -p perch_examples --example display_tree_events`

use perch_display::DisplayNode;
use perch_event::{EventType, KnownEvent};

fn announce(node: &DisplayNode) {
    let name = node.name().unwrap_or_else(|| String::from("?"));
    for known in [
        KnownEvent::Added,
        KnownEvent::AddedToRoot,
        KnownEvent::Removed,
        KnownEvent::RemovedFromRoot,
        KnownEvent::Render,
    ] {
        let name = name.clone();
        node.dispatcher()
            .add_event_listener(known, move |e| {
                let origin = e.current_target().is_some_and(|c| e.is_target(&c));
                let at = if origin { "origin" } else { "bubbled" };
                println!("  {name:>8} <- {} ({at})", e.event_type());
            })
            .unwrap();
    }
}

fn main() {
    let stage = DisplayNode::new_root();
    stage.set_name(Some(String::from("stage")));
    let menu = DisplayNode::named("menu");
    let play = DisplayNode::named("play");
    let quit = DisplayNode::named("quit");
    for node in [&stage, &menu, &play, &quit] {
        announce(node);
    }

    println!("== Assemble menu off-stage ==");
    menu.add_child(&play).unwrap();
    menu.add_child(&quit).unwrap();

    println!("== Attach menu to stage ==");
    stage.add_child(&menu).unwrap();

    println!("== Move quit to stage ==");
    stage.add_child(&quit).unwrap();

    println!("== Broadcast render ==");
    stage.broadcast_event_with(EventType::RENDER, None).unwrap();

    println!("== Detach menu ==");
    menu.remove_from_parent();
    println!(
        "stage children: {:?}",
        stage.children().iter().map(DisplayNode::name).collect::<Vec<_>>()
    );
}
